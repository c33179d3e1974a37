//! Per-node transition tables.
//!
//! A table maps transition names to target nodes. Lookups are exact and
//! local; bubbling to ancestors is done by the manager.

use crate::tree::NodeId;

/// One named transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub name: String,
    pub target: NodeId,
}

/// Ordered set of transitions declared on a node.
///
/// Names are unique within one table; re-declaring a name retargets it
/// in place and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    entries: Vec<Transition>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` → `target`.
    pub fn insert(&mut self, name: impl Into<String>, target: NodeId) {
        let name = name.into();
        match self.entries.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.target = target,
            None => self.entries.push(Transition { name, target }),
        }
    }

    /// Exact-match lookup. No partial matches.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.target)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|t| t.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter()
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
    fn table_exact_lookup() {
        let mut table = TransitionTable::new();
        table.insert("next", NodeId::from_index(2));
        table.insert("back", NodeId::from_index(1));

        assert_eq!(table.get("next"), Some(NodeId::from_index(2)));
        assert_eq!(table.get("back"), Some(NodeId::from_index(1)));
        assert_eq!(table.get("nex"), None);
        assert_eq!(table.get("Next"), None);
        assert!(!table.contains("nextt"));
    }

    #[test]
    fn table_keeps_declaration_order() {
        let mut table = TransitionTable::new();
        table.insert("b", NodeId::from_index(1));
        table.insert("a", NodeId::from_index(2));
        table.insert("c", NodeId::from_index(3));

        let names: Vec<_> = table.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn table_redeclare_retargets() {
        let mut table = TransitionTable::new();
        table.insert("go", NodeId::from_index(1));
        table.insert("other", NodeId::from_index(2));
        table.insert("go", NodeId::from_index(5));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("go"), Some(NodeId::from_index(5)));
        assert_eq!(table.names().next(), Some("go"));
    }
}
