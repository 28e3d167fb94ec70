pub mod profile;
pub mod store;
pub mod targets;

pub use profile::{ActivityLevel, Gender, Goal, Profile, ProfileForm, ValidationError};
pub use store::{
    current_targets, save_profile, JsonFileProfileStore, MemoryProfileStore, ProfileError, ProfileStore,
    ProfileStoreError,
};
pub use targets::{calculate_nutrition_targets, NutritionTargets};
