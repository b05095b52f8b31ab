//! Q-value lookup table.
use crate::{error::QtabError, Action, State};
use std::collections::HashMap;

/// In-memory table of Q-values keyed by `(state name, action name)`.
///
/// Keys compare by name, so any two [`State`]s sharing a name address the
/// same row. A lookup on a key that was never [`set`](LookupTable::set) is a
/// setup bug and fails with [`QtabError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct LookupTable(HashMap<String, HashMap<String, f64>>);

impl LookupTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for the pair, overwriting any previous value.
    pub fn set(&mut self, state: &State, action: &Action, value: f64) {
        self.set_by_name(state.name(), action.name(), value)
    }

    /// Returns the value stored for the pair.
    pub fn get(&self, state: &State, action: &Action) -> Result<f64, QtabError> {
        self.get_by_name(state.name(), action.name())
    }

    /// Same as [`LookupTable::set`], addressing the pair by names.
    pub fn set_by_name(&mut self, state: &str, action: &str, value: f64) {
        self.0
            .entry(state.to_string())
            .or_default()
            .insert(action.to_string(), value);
    }

    /// Same as [`LookupTable::get`], addressing the pair by names.
    pub fn get_by_name(&self, state: &str, action: &str) -> Result<f64, QtabError> {
        self.0
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .ok_or_else(|| QtabError::NotFound {
                state: state.to_string(),
                action: Some(action.to_string()),
            })
    }

    /// The number of stored pairs.
    pub fn len(&self) -> usize {
        self.0.values().map(|row| row.len()).sum()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over `(state name, action name, value)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.0.iter().flat_map(|(s, row)| {
            row.iter()
                .map(move |(a, v)| (s.as_str(), a.as_str(), *v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StateSpace, Transition};

    fn noop(name: &str) -> Action {
        Action::new(name, |_: &State, _: &StateSpace| Ok(Transition::Blocked))
    }

    #[test]
    fn test_set_then_get() {
        let mut table = LookupTable::new();
        let (s, a) = (State::new("s"), noop("a"));
        table.set(&s, &a, 1.5);
        assert_eq!(table.get(&s, &a).unwrap(), 1.5);

        table.set(&s, &a, -2.0);
        assert_eq!(table.get(&s, &a).unwrap(), -2.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_get_missing_key() {
        let mut table = LookupTable::new();
        let (s, a, b) = (State::new("s"), noop("a"), noop("b"));
        table.set(&s, &a, 0.0);
        assert_eq!(
            table.get(&s, &b),
            Err(QtabError::NotFound {
                state: "s".to_string(),
                action: Some("b".to_string()),
            })
        );
        assert!(table.get(&State::new("t"), &a).is_err());
    }

    #[test]
    fn test_keys_compare_by_name() {
        let mut table = LookupTable::new();
        let a = noop("a");
        table.set(&State::new("s"), &a, 3.0);
        // A different instance with the same name hits the same key.
        let twin = State::new("s");
        assert_eq!(table.get(&twin, &a).unwrap(), 3.0);
    }

    #[test]
    fn test_len_counts_pairs() {
        let mut table = LookupTable::new();
        for s in ["x", "y", "z"] {
            for a in ["l", "r"] {
                table.set_by_name(s, a, 0.0);
            }
        }
        assert_eq!(table.len(), 6);
        assert_eq!(table.iter().count(), 6);
    }
}
