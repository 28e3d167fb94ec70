use anyhow::{Context, Result};
use std::sync::Arc;

use meal_mate::api_connection::{Recipe, RecipeApiClient};
use meal_mate::cli::{parse_args, Command, ProfileCommand};
use meal_mate::config::AppConfig;
use meal_mate::ingredients::{AddOutcome, IngredientSelector, RecipeSearchOutcome, MIN_QUERY_CHARS};
use meal_mate::legacy::display_ingredient_line;
use meal_mate::logging::init_logging;
use meal_mate::nutrition::{
    current_targets, save_profile, JsonFileProfileStore, ProfileError, ProfileForm, ProfileStore,
};


fn print_recipe_card(recipe: &Recipe) {
    println!("\n{}  ({})", recipe.name, recipe.detail_path());
    println!("Serves: {}", recipe.servings);
    println!("Key ingredients:");
    for ingredient in recipe.key_ingredients() {
        println!("  - {}", display_ingredient_line(ingredient));
    }
    let n = &recipe.nutrition;
    println!("Nutrition facts:");
    println!("  Calories: {} kcal", n.calories);
    println!("  Total fat: {} g (saturated {} g)", n.total_fat, n.saturated_fat);
    println!("  Sodium: {} mg", n.sodium);
    println!("  Total carbohydrate: {} g (sugars {} g)", n.carbohydrate, n.sugar);
    println!("  Protein: {} g", n.protein);
}

async fn run_suggest(client: Arc<RecipeApiClient>, config: &AppConfig, query: &str) -> Result<()> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        println!("Type at least {} characters to get suggestions.", MIN_QUERY_CHARS);
        return Ok(());
    }

    let selector = IngredientSelector::new(client).with_debounce(config.debounce);
    let mut updates = selector.subscribe();
    selector.request_suggestions(query);

    // Failures are swallowed by the selector, so a timeout means "nothing to show".
    match tokio::time::timeout(config.suggestion_wait(), updates.changed()).await {
        Ok(Ok(())) => {
            let suggestions = updates.borrow().clone();
            if suggestions.is_empty() {
                println!("No suggestions for '{}'.", query.trim());
            }
            for name in suggestions {
                println!("{}", name);
            }
        }
        _ => println!("No suggestions for '{}'.", query.trim()),
    }
    Ok(())
}

async fn run_search(client: Arc<RecipeApiClient>, ingredients: &[String]) -> Result<()> {
    let mut selector = IngredientSelector::new(client);
    for raw in ingredients {
        if selector.add(raw) == AddOutcome::Duplicate {
            println!("'{}' is already in the list, skipping.", raw.trim());
        }
    }
    println!("Searching recipes with: {}", selector.list().join(", "));

    match selector.search_recipes().await {
        Ok(RecipeSearchOutcome::NoMatches) => println!("No recipes found with these ingredients."),
        Ok(RecipeSearchOutcome::Found(recipes)) => {
            println!("Found {} recipes", recipes.len());
            for recipe in &recipes {
                print_recipe_card(recipe);
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "search failed");
            eprintln!("{}", err.user_message());
        }
    }
    Ok(())
}

fn run_profile(store: &JsonFileProfileStore, command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Save(args) => {
            let form = ProfileForm::from(args);
            match save_profile(store, &form, chrono::Utc::now()) {
                Ok(_) => println!("Profile saved successfully!"),
                Err(ProfileError::Validation(err)) => eprintln!("{}", err),
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to save profile to {:?}", store.path()))
                }
            }
        }
        ProfileCommand::Show => {
            let profile = store
                .load()
                .with_context(|| format!("Failed to load profile from {:?}", store.path()))?;
            match profile {
                Some(profile) => {
                    let form = ProfileForm::from(&profile);
                    println!("Gender:   {}", form.gender);
                    println!("Age:      {}", form.age);
                    println!("Weight:   {} lbs", form.weight);
                    println!("Height:   {} in", form.height);
                    println!("Activity: {}", form.activity);
                    println!("Goal:     {}", form.goal);
                    println!("Updated:  {}", profile.last_updated.to_rfc3339());
                }
                None => println!("No profile saved yet."),
            }
        }
    }
    Ok(())
}

fn run_targets(store: &JsonFileProfileStore) -> Result<()> {
    match current_targets(store) {
        Ok(Some(targets)) => println!("{}", targets),
        Ok(None) => println!("No profile saved yet. Run `meal-mate profile save` first."),
        Err(ProfileError::Validation(err)) => eprintln!("Stored profile is out of range: {}", err),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to load profile from {:?}", store.path()))
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli_args = parse_args();
    let (mut config, rejected) = AppConfig::from_env();
    if let Some(base_url) = cli_args.base_url {
        config.base_url = base_url;
    }
    if let Some(profile_path) = cli_args.profile_path {
        config.profile_path = profile_path;
    }
    init_logging(&config.log_level, config.log_format)?;
    for setting in &rejected {
        tracing::warn!(key = setting.key, value = %setting.value, "not a whole number, using the default");
    }
    tracing::debug!(?config, "configuration loaded");

    match cli_args.command {
        Command::Suggest { query } => {
            let client = RecipeApiClient::new(&config.base_url, config.request_timeout)
                .context("Failed to create recipe API client")?;
            run_suggest(Arc::new(client), &config, &query).await
        }
        Command::Search { ingredients } => {
            let client = RecipeApiClient::new(&config.base_url, config.request_timeout)
                .context("Failed to create recipe API client")?;
            run_search(Arc::new(client), &ingredients).await
        }
        Command::Profile(command) => run_profile(&JsonFileProfileStore::new(&config.profile_path), command),
        Command::Targets => run_targets(&JsonFileProfileStore::new(&config.profile_path)),
    }
}
