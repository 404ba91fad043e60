// WHY: Sub-units (departments, hospitals, campuses) share names with their parents in the registry;
// resolving each id to its topmost parent is what lets duplicate names collapse to one id

use std::collections::{HashMap, HashSet};

use crate::error::BuildError;

/// Identifier -> declared parent identifier (self when no parent is declared)
#[derive(Debug, Clone, Default)]
pub struct ParentMap {
    parents: HashMap<String, String>,
}

impl ParentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier's parent, self-mapping when none is declared
    pub fn insert(&mut self, id: &str, parent: Option<&str>) {
        let parent = parent.unwrap_or(id);
        self.parents.insert(id.to_string(), parent.to_string());
    }

    /// Immediate parent; identifiers never inserted are their own parent
    pub fn parent_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.parents.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Follow parent links until a fixed point
    ///
    /// A link to an identifier absent from the map ends the walk there. Revisiting
    /// an identifier before reaching a fixed point fails with the chain walked so far.
    pub fn resolve_top_parent(&self, id: &str) -> Result<String, BuildError> {
        let mut chain: Vec<&str> = vec![id];
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut current = id;

        loop {
            let parent = self.parent_of(current);
            if parent == current {
                return Ok(current.to_string());
            }

            chain.push(parent);
            if !visited.insert(parent) {
                return Err(BuildError::CycleDetected {
                    chain: chain.into_iter().map(str::to_string).collect(),
                });
            }
            current = parent;
        }
    }

    /// Resolve every identifier once so any cycle surfaces at build time
    pub fn validate(&self) -> Result<(), BuildError> {
        let mut ids: Vec<&String> = self.parents.keys().collect();
        // Sorted so the reported chain is reproducible across runs
        ids.sort();
        for id in ids {
            self.resolve_top_parent(id)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
