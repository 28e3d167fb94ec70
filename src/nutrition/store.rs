use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::profile::{Profile, ProfileForm, ValidationError};
use super::targets::{calculate_nutrition_targets, NutritionTargets};

#[derive(Debug)]
pub enum ProfileStoreError {
    Io(io::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for ProfileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileStoreError::Io(err) => write!(f, "Profile storage error: {}", err),
            ProfileStoreError::Serialization(err) => write!(f, "Profile record is not valid: {}", err),
        }
    }
}

impl Error for ProfileStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProfileStoreError::Io(err) => Some(err),
            ProfileStoreError::Serialization(err) => Some(err),
        }
    }
}

impl From<io::Error> for ProfileStoreError {
    fn from(err: io::Error) -> Self {
        ProfileStoreError::Io(err)
    }
}

impl From<serde_json::Error> for ProfileStoreError {
    fn from(err: serde_json::Error) -> Self {
        ProfileStoreError::Serialization(err)
    }
}

#[derive(Debug)]
pub enum ProfileError {
    Validation(ValidationError),
    Store(ProfileStoreError),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::Validation(err) => write!(f, "{}", err),
            ProfileError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProfileError::Validation(err) => Some(err),
            ProfileError::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ProfileError {
    fn from(err: ValidationError) -> Self {
        ProfileError::Validation(err)
    }
}

impl From<ProfileStoreError> for ProfileError {
    fn from(err: ProfileStoreError) -> Self {
        ProfileError::Store(err)
    }
}

/// Holds at most one profile; `save` overwrites it.
pub trait ProfileStore {
    fn load(&self) -> Result<Option<Profile>, ProfileStoreError>;
    fn save(&self, profile: &Profile) -> Result<(), ProfileStoreError>;
}

/// Profile kept as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileProfileStore {
    path: PathBuf,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn load(&self) -> Result<Option<Profile>, ProfileStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, profile: &Profile) -> Result<(), ProfileStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(profile)?;
        // Write beside the target and rename so a failed write never leaves
        // a truncated record behind.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    record: Mutex<Option<Profile>>,
    saves: Mutex<usize>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self {
            record: Mutex::new(Some(profile)),
            saves: Mutex::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<Profile>, ProfileStoreError> {
        Ok(lock(&self.record).clone())
    }

    fn save(&self, profile: &Profile) -> Result<(), ProfileStoreError> {
        *lock(&self.record) = Some(profile.clone());
        *lock(&self.saves) += 1;
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validates the form and persists the resulting profile. Nothing is written
/// when validation fails.
pub fn save_profile<S>(store: &S, form: &ProfileForm, now: DateTime<Utc>) -> Result<Profile, ProfileError>
where
    S: ProfileStore + ?Sized,
{
    let profile = form.validate(now)?;
    store.save(&profile)?;
    tracing::info!(
        gender = profile.gender.as_str(),
        activity = profile.activity_level.as_str(),
        goal = profile.goal.as_str(),
        "profile saved"
    );
    Ok(profile)
}

/// Loads the stored profile and recomputes its targets. A record that no
/// longer passes validation is reported instead of being computed.
pub fn current_targets<S>(store: &S) -> Result<Option<NutritionTargets>, ProfileError>
where
    S: ProfileStore + ?Sized,
{
    match store.load()? {
        Some(profile) => {
            profile.validate()?;
            Ok(Some(calculate_nutrition_targets(&profile)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::profile::{ActivityLevel, Gender, Goal};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 8, 30, 0).unwrap()
    }

    fn form() -> ProfileForm {
        ProfileForm {
            gender: "male".to_string(),
            age: "30".to_string(),
            weight: "180".to_string(),
            height: "70".to_string(),
            activity: "moderate".to_string(),
            goal: "maintain".to_string(),
        }
    }

    #[test]
    fn test_invalid_form_never_reaches_store() {
        let existing = form().validate(now()).unwrap();
        let store = MemoryProfileStore::with_profile(existing.clone());

        let bad = ProfileForm { age: "200".to_string(), ..form() };
        let result = save_profile(&store, &bad, now());

        assert!(matches!(result, Err(ProfileError::Validation(ValidationError::InvalidAge))));
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.load().unwrap(), Some(existing));
    }

    #[test]
    fn test_save_then_targets() {
        let store = MemoryProfileStore::new();
        assert_eq!(current_targets(&store).unwrap(), None);

        let saved = save_profile(&store, &form(), now()).unwrap();
        assert_eq!(saved.last_updated, now());
        assert_eq!(store.save_count(), 1);

        let targets = current_targets(&store).unwrap().unwrap();
        assert_eq!(targets.calories, 2763);
    }

    #[test]
    fn test_save_overwrites_single_record() {
        let store = MemoryProfileStore::new();
        save_profile(&store, &form(), now()).unwrap();
        let heavier = ProfileForm { weight: "200".to_string(), ..form() };
        save_profile(&store, &heavier, now()).unwrap();

        assert_eq!(store.load().unwrap().unwrap().weight_lbs, 200.0);
    }

    #[test]
    fn test_out_of_range_stored_record_is_not_computed() {
        let mut profile = form().validate(now()).unwrap();
        profile.height_in = 300.0;
        let store = MemoryProfileStore::with_profile(profile);

        let result = current_targets(&store);
        assert!(matches!(result, Err(ProfileError::Validation(ValidationError::InvalidHeight))));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileProfileStore::new(dir.path().join("nested").join("profile.json"));
        assert_eq!(store.load().unwrap(), None);

        let saved = save_profile(&store, &form(), now()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.gender, Gender::Male);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_reads_page_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(
            &path,
            r#"{"gender":"female","age":41,"weight":160.5,"height":66,"activity":"active","goal":"gain","lastUpdated":"2024-11-02T17:45:10.123Z"}"#,
        )
        .unwrap();

        let profile = JsonFileProfileStore::new(&path).load().unwrap().unwrap();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.activity_level, ActivityLevel::Active);
        assert_eq!(profile.goal, Goal::Gain);
        assert_eq!(profile.height_in, 66.0);
    }

    #[test]
    fn test_file_store_corrupt_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, "{not json").unwrap();

        let result = JsonFileProfileStore::new(&path).load();
        assert!(matches!(result, Err(ProfileStoreError::Serialization(_))));
    }
}
