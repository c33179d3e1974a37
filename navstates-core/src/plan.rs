//! Navigation plan.
//!
//! Holds the nodes one navigation exits and enters, plus a cursor over
//! each list. The exit list is ordered leaf → root and the enter list
//! root → leaf.
//!
//! The two cursors are consumed differently by the navigator: every
//! exiting node starts unloading at once and the unload cursor only
//! decides polling order, while the load cursor gates which single node
//! is loading.

use crate::tree::NodeId;

/// One in-flight navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlan {
    to_enter: Vec<NodeId>,
    to_leave: Vec<NodeId>,
    load_cursor: usize,
    unload_cursor: usize,
    complete: bool,
    origin: Option<NodeId>,
}

impl Default for NavigationPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationPlan {
    /// An idle plan: empty and complete.
    pub fn new() -> Self {
        Self {
            to_enter: Vec::new(),
            to_leave: Vec::new(),
            load_cursor: 0,
            unload_cursor: 0,
            complete: true,
            origin: None,
        }
    }

    /// Clear both lists and return to idle.
    pub fn reset(&mut self) {
        self.complete = true;
        self.to_enter.clear();
        self.to_leave.clear();
        self.load_cursor = 0;
        self.unload_cursor = 0;
        self.origin = None;
    }

    pub fn set_origin(&mut self, origin: NodeId) {
        self.origin = Some(origin);
    }

    /// Active leaf at the moment the plan was built.
    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    pub fn add_to_enter(&mut self, id: NodeId) {
        self.to_enter.push(id);
    }

    pub fn add_to_leave(&mut self, id: NodeId) {
        self.to_leave.push(id);
    }

    /// Nodes to enter, root → leaf.
    pub fn to_enter(&self) -> &[NodeId] {
        &self.to_enter
    }

    /// Nodes to leave, leaf → root.
    pub fn to_leave(&self) -> &[NodeId] {
        &self.to_leave
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Mark the plan in flight and rewind both cursors.
    pub fn navigation_started(&mut self) {
        self.complete = false;
        self.load_cursor = 0;
        self.unload_cursor = 0;
    }

    /// Mark the plan done and hand back the batch to enter.
    pub fn navigation_ended(&mut self) -> Vec<NodeId> {
        self.complete = true;
        self.to_enter.clone()
    }

    /// Node the load cursor points at, if any remain.
    pub fn current_to_load(&self) -> Option<NodeId> {
        self.to_enter.get(self.load_cursor).copied()
    }

    /// Node the unload cursor points at, if any remain.
    pub fn current_to_unload(&self) -> Option<NodeId> {
        self.to_leave.get(self.unload_cursor).copied()
    }

    pub fn state_loaded(&mut self) {
        if self.load_cursor < self.to_enter.len() {
            self.load_cursor += 1;
        }
    }

    pub fn state_unloaded(&mut self) {
        if self.unload_cursor < self.to_leave.len() {
            self.unload_cursor += 1;
        }
    }

    /// Whether every exiting node has been acknowledged.
    pub fn unloading_finished(&self) -> bool {
        self.unload_cursor >= self.to_leave.len()
    }

    pub fn loading_finished(&self) -> bool {
        self.load_cursor >= self.to_enter.len()
    }
}
