pub mod debounce;
pub mod selection;
pub mod selector;

pub use debounce::{Debouncer, RequestSequencer, RequestTicket};
pub use selection::{normalize_ingredient, AddOutcome, IngredientEntry, SelectedIngredientSet};
pub use selector::{IngredientSelector, RecipeSearchOutcome, SearchError, DEFAULT_DEBOUNCE, MIN_QUERY_CHARS};
