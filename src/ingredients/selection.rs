use serde::{Deserialize, Serialize};

/// Trims and lower-cases an ingredient name. Two names are the same
/// ingredient when their normalized forms are equal.
pub fn normalize_ingredient(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    /// Trimmed text as first entered, casing preserved.
    pub display: String,
    pub normalized: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended; the caller should clear its input field.
    Accepted,
    /// An entry with the same normalized form already exists.
    Duplicate,
    /// Nothing left after trimming.
    Empty,
}

impl AddOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, AddOutcome::Accepted)
    }
}

/// Insertion-ordered set of ingredients, unique by normalized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedIngredientSet {
    entries: Vec<IngredientEntry>,
}

impl SelectedIngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, raw: &str) -> AddOutcome {
        let normalized = normalize_ingredient(raw);
        if normalized.is_empty() {
            return AddOutcome::Empty;
        }
        if self.contains(&normalized) {
            return AddOutcome::Duplicate;
        }
        self.entries.push(IngredientEntry {
            display: raw.trim().to_string(),
            normalized,
        });
        AddOutcome::Accepted
    }

    /// Returns whether an entry was removed. Absent keys are not an error.
    pub fn remove(&mut self, key: &str) -> bool {
        let normalized = normalize_ingredient(key);
        match self.entries.iter().position(|entry| entry.normalized == normalized) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        let normalized = normalize_ingredient(key);
        self.entries.iter().any(|entry| entry.normalized == normalized)
    }

    /// Normalized names in insertion order; the recipe search payload.
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.normalized.clone()).collect()
    }

    pub fn entries(&self) -> &[IngredientEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent_under_case() {
        let mut set = SelectedIngredientSet::new();
        assert_eq!(set.add("Tomato"), AddOutcome::Accepted);
        assert_eq!(set.add("tOMATO"), AddOutcome::Duplicate);
        assert_eq!(set.add("  tomato  "), AddOutcome::Duplicate);
        assert_eq!(set.len(), 1);
        assert_eq!(set.entries()[0].display, "Tomato");
        assert_eq!(set.list(), vec!["tomato"]);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut set = SelectedIngredientSet::new();
        for name in ["Garlic", "onion", "Olive Oil"] {
            assert!(set.add(name).is_accepted());
        }
        assert_eq!(set.list(), vec!["garlic", "onion", "olive oil"]);
    }

    #[test]
    fn test_remove_after_add_restores_previous_state() {
        let mut set = SelectedIngredientSet::new();
        set.add("rice");
        set.add("egg");
        let before = set.clone();

        assert!(set.add("Scallion").is_accepted());
        assert!(set.remove("scallion"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = SelectedIngredientSet::new();
        set.add("rice");
        assert!(!set.remove("quinoa"));
        assert_eq!(set.list(), vec!["rice"]);
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut set = SelectedIngredientSet::new();
        assert_eq!(set.add("   "), AddOutcome::Empty);
        assert_eq!(set.add(""), AddOutcome::Empty);
        assert!(set.is_empty());
    }

    #[test]
    fn test_display_is_trimmed() {
        let mut set = SelectedIngredientSet::new();
        set.add("  Basil ");
        assert_eq!(
            set.entries(),
            [IngredientEntry {
                display: "Basil".to_string(),
                normalized: "basil".to_string(),
            }]
        );
        assert!(set.contains("BASIL"));
    }
}
