use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::debounce::{Debouncer, RequestSequencer};
use super::selection::{AddOutcome, IngredientEntry, SelectedIngredientSet};
use crate::api_connection::{ApiConnectionError, Recipe, RecipeSource, SuggestionSource};

/// Queries shorter than this (in characters, after trimming) never reach the
/// network.
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum SearchError {
    NoIngredients,
    Api(ApiConnectionError),
}

impl SearchError {
    /// Text suitable for showing inline in place of results.
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::NoIngredients => "Please add at least one ingredient",
            SearchError::Api(_) => "Error loading recipes. Please try again.",
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoIngredients => f.write_str(self.user_message()),
            SearchError::Api(err) => write!(f, "Recipe search failed: {}", err),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchError::Api(err) => Some(err),
            SearchError::NoIngredients => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeSearchOutcome {
    NoMatches,
    Found(Vec<Recipe>),
}

/// Owns the ingredient selection and the autocomplete suggestion list.
pub struct IngredientSelector {
    selection: SelectedIngredientSet,
    suggestion_source: Arc<dyn SuggestionSource>,
    recipe_source: Arc<dyn RecipeSource>,
    debouncer: Debouncer,
    sequencer: Arc<RequestSequencer>,
    suggestions: Arc<watch::Sender<Vec<String>>>,
}

impl IngredientSelector {
    pub fn new<C>(client: Arc<C>) -> Self
    where
        C: SuggestionSource + RecipeSource + 'static,
    {
        Self::with_sources(client.clone(), client)
    }

    pub fn with_sources(
        suggestion_source: Arc<dyn SuggestionSource>,
        recipe_source: Arc<dyn RecipeSource>,
    ) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        Self {
            selection: SelectedIngredientSet::new(),
            suggestion_source,
            recipe_source,
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
            sequencer: Arc::new(RequestSequencer::new()),
            suggestions: Arc::new(suggestions),
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    pub fn add(&mut self, raw: &str) -> AddOutcome {
        let outcome = self.selection.add(raw);
        tracing::debug!(ingredient = raw.trim(), ?outcome, "add ingredient");
        outcome
    }

    pub fn remove(&mut self, normalized: &str) -> bool {
        self.selection.remove(normalized)
    }

    pub fn list(&self) -> Vec<String> {
        self.selection.list()
    }

    pub fn entries(&self) -> &[IngredientEntry] {
        self.selection.entries()
    }

    pub fn selection(&self) -> &SelectedIngredientSet {
        &self.selection
    }

    /// Adds a clicked suggestion and hides the suggestion list.
    pub fn accept_suggestion(&mut self, name: &str) -> AddOutcome {
        let outcome = self.add(name);
        self.dismiss_suggestions();
        outcome
    }

    /// Debounced autocomplete. Short queries clear the list immediately;
    /// otherwise the latest query of a burst is sent once the input has been
    /// quiet for the debounce window. Responses that were overtaken by a newer
    /// query or a dismiss are discarded and failures keep the current list.
    pub fn request_suggestions(&self, query: &str) {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.dismiss_suggestions();
            return;
        }

        // Issued here rather than inside the task: a dismiss or newer query
        // that returns after this call must always see the ticket as stale.
        let ticket = self.sequencer.issue();
        let query = query.to_string();
        let source = Arc::clone(&self.suggestion_source);
        let sequencer = Arc::clone(&self.sequencer);
        let visible = Arc::clone(&self.suggestions);
        self.debouncer.schedule(async move {
            match source.suggest(&query).await {
                Ok(names) if sequencer.is_current(ticket) => {
                    tracing::debug!(query = %query, count = names.len(), "suggestions updated");
                    visible.send_replace(names);
                }
                Ok(_) => {
                    tracing::debug!(query = %query, ?ticket, "discarding stale suggestions");
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "suggestion request failed");
                }
            }
        });
    }

    /// Hides the suggestion list and makes any in-flight response stale.
    pub fn dismiss_suggestions(&self) {
        self.debouncer.cancel();
        self.sequencer.invalidate();
        // Subscribers are only woken when a visible list actually disappears.
        self.suggestions.send_if_modified(|current| {
            let had_any = !current.is_empty();
            current.clear();
            had_any
        });
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.suggestions.subscribe()
    }

    pub async fn search_recipes(&self) -> Result<RecipeSearchOutcome, SearchError> {
        if self.selection.is_empty() {
            return Err(SearchError::NoIngredients);
        }
        let ingredients = self.selection.list();
        let recipes = self
            .recipe_source
            .recipes_with_ingredients(&ingredients)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "recipe search failed");
                SearchError::Api(err)
            })?;

        if recipes.is_empty() {
            Ok(RecipeSearchOutcome::NoMatches)
        } else {
            Ok(RecipeSearchOutcome::Found(recipes))
        }
    }
}
