//! Editor-side change tracking for loaded rows.

use serde::{Deserialize, Serialize};

/// A loaded item plus whether the caller has modified it since loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracked<T> {
    item: T,
    changed: bool,
}

impl<T> Tracked<T> {
    /// Wraps a freshly loaded item.
    pub fn unmodified(item: T) -> Self {
        Self {
            item,
            changed: false,
        }
    }

    pub fn get(&self) -> &T {
        &self.item
    }

    /// Returns a mutable handle and marks the item changed.
    pub fn edit(&mut self) -> &mut T {
        self.changed = true;
        &mut self.item
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn into_inner(self) -> T {
        self.item
    }
}

/// Wraps every item of a freshly loaded list as unmodified.
pub fn track_all<T>(items: Vec<T>) -> Vec<Tracked<T>> {
    items.into_iter().map(Tracked::unmodified).collect()
}

#[cfg(test)]
mod tests {
    use super::{track_all, Tracked};

    #[test]
    fn edit_marks_changed() {
        let mut tracked = Tracked::unmodified(1);
        assert!(!tracked.is_changed());
        *tracked.edit() += 1;
        assert!(tracked.is_changed());
        assert_eq!(tracked.into_inner(), 2);
    }

    #[test]
    fn track_all_starts_unmodified() {
        let items = track_all(vec!["a", "b"]);
        assert!(items.iter().all(|item| !item.is_changed()));
    }
}
