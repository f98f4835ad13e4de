//! Per-level start indices, kept apart from the stored values
//!
//! The states form a tree mirroring the nesting of the containers. They live
//! in a flat arena and refer to their children by position.

// standard library
use std::collections::BTreeMap;

// external crates
use log::trace;

/// Start index of one nesting level, `None` until first accessed
#[derive(Debug, Default, Clone)]
struct ShiftState {
    start_index: Option<i64>,
    children: BTreeMap<i64, usize>,
}

/// Arena of shift states for every variable in a store
#[derive(Debug, Default, Clone)]
pub(crate) struct ShiftTree {
    states: Vec<ShiftState>,
}

impl ShiftTree {
    /// New unaccessed level, returning its id
    pub(crate) fn add(&mut self) -> usize {
        self.states.push(ShiftState::default());
        self.states.len() - 1
    }

    /// Shift an index, fixing the start index if this is the first access
    pub(crate) fn shift(&mut self, level: usize, index: i64) -> i64 {
        let state = &mut self.states[level];
        let start = *state.start_index.get_or_insert_with(|| {
            trace!("Start index of level {level} fixed at {index}");
            index
        });
        index - start
    }

    /// Shift an index without changing any state
    pub(crate) fn peek(&self, level: usize, index: i64) -> Option<i64> {
        self.states[level].start_index.map(|start| index - start)
    }

    /// Level below the given shifted index, created on demand
    pub(crate) fn child(&mut self, level: usize, key: i64) -> usize {
        if let Some(&id) = self.states[level].children.get(&key) {
            return id;
        }
        let id = self.add();
        self.states[level].children.insert(key, id);
        id
    }

    /// Level below the given shifted index, if it was ever created
    pub(crate) fn peek_child(&self, level: usize, key: i64) -> Option<usize> {
        self.states[level].children.get(&key).copied()
    }
}

#[cfg(test)]
mod shift_tests {
    use super::*;

    #[test]
    fn first_index_is_start() {
        let mut tree = ShiftTree::default();
        let root = tree.add();
        assert_eq!(tree.peek(root, 12), None);
        assert_eq!(tree.shift(root, 12), 0);
        assert_eq!(tree.shift(root, 13), 1);
        assert_eq!(tree.shift(root, 10), -2);
        assert_eq!(tree.peek(root, 14), Some(2));
    }

    #[test]
    fn children_are_independent() {
        let mut tree = ShiftTree::default();
        let root = tree.add();
        let a = tree.child(root, 0);
        let b = tree.child(root, 1);
        assert_ne!(a, b);
        assert_eq!(tree.child(root, 0), a);
        assert_eq!(tree.peek_child(root, 2), None);

        assert_eq!(tree.shift(a, 5), 0);
        assert_eq!(tree.shift(b, 1), 0);
        assert_eq!(tree.shift(a, 6), 1);
        assert_eq!(tree.shift(b, 3), 2);
    }
}
