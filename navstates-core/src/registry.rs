//! Registry of named navigation spaces.
//!
//! Spaces are independent trees, each with its own manager. A space
//! either ticks with the registry (`update_self`) or is driven by a
//! [`SpaceController`](crate::behaviours::SpaceController) hook in
//! another space.

use crate::error::NavError;
use crate::manager::NavigationManager;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared handle to a registered space.
pub type SpaceHandle = Rc<RefCell<NavigationManager>>;

struct SpaceEntry {
    handle: SpaceHandle,
    update_self: bool,
}

/// Owns named spaces and ticks the self-updating ones.
#[derive(Default)]
pub struct SpaceRegistry {
    spaces: BTreeMap<String, SpaceEntry>,
}

impl SpaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a space under its configured name.
    pub fn register(&mut self, manager: NavigationManager) -> Result<SpaceHandle, NavError> {
        let name = manager.name().to_string();
        if self.spaces.contains_key(&name) {
            return Err(NavError::DuplicateSpace(name));
        }

        let update_self = manager.config().update_self;
        let handle = Rc::new(RefCell::new(manager));
        tracing::debug!(space = %name, update_self, "navigation space registered");
        self.spaces.insert(
            name,
            SpaceEntry {
                handle: handle.clone(),
                update_self,
            },
        );
        Ok(handle)
    }

    pub fn unregister(&mut self, name: &str) -> Option<SpaceHandle> {
        let entry = self.spaces.remove(name)?;
        tracing::debug!(space = %name, "navigation space unregistered");
        Some(entry.handle)
    }

    pub fn get(&self, name: &str) -> Option<SpaceHandle> {
        self.spaces.get(name).map(|e| e.handle.clone())
    }

    /// Like [`get`](Self::get), but a missing space is an error.
    pub fn require(&self, name: &str) -> Result<SpaceHandle, NavError> {
        self.get(name)
            .ok_or_else(|| NavError::UnknownSpace(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.spaces.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.spaces.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// Snapshot of every handle, keyed by name.
    pub fn handles(&self) -> BTreeMap<String, SpaceHandle> {
        self.spaces
            .iter()
            .map(|(name, e)| (name.clone(), e.handle.clone()))
            .collect()
    }

    /// Tick every space registered with `update_self`.
    pub fn tick(&self, dt: f32) {
        for (name, entry) in &self.spaces {
            if !entry.update_self {
                continue;
            }
            match entry.handle.try_borrow_mut() {
                Ok(mut manager) => manager.tick(dt),
                Err(_) => tracing::warn!(space = %name, "space is already borrowed, tick skipped"),
            }
        }
    }
}

impl std::fmt::Debug for SpaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceRegistry")
            .field("spaces", &self.spaces.keys().collect::<Vec<_>>())
            .finish()
    }
}
