use serde::{Deserialize, Serialize};

/// Images produced by the generator during this session, newest first.
///
/// No size cap is enforced. Removing an entry never touches the card's current
/// selection; see [`crate::Editor::delete_generated`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationHistory {
    entries: Vec<String>,
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert as the newest entry.
    pub fn prepend(&mut self, image_ref: String) {
        self.entries.insert(0, image_ref);
    }

    /// Remove the entry at `index`, returning it if the index was in range.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn contains(&self, image_ref: &str) -> bool {
        self.entries.iter().any(|entry| entry == image_ref)
    }

    pub fn entries(&self) -> &[String] {
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
    fn prepend_orders_newest_first() {
        let mut history = GenerationHistory::new();
        history.prepend("a".into());
        history.prepend("b".into());
        history.prepend("c".into());
        assert_eq!(history.entries(), ["c", "b", "a"]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut history = GenerationHistory::new();
        history.prepend("a".into());
        assert_eq!(history.remove(3), None);
        assert_eq!(history.len(), 1);
        assert_eq!(history.remove(0).as_deref(), Some("a"));
        assert!(history.is_empty());
    }
}
