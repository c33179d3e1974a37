//! Lifecycle hooks attached to navigation nodes.
//!
//! A node carries an ordered list of hooks. Every lifecycle step of the
//! node is forwarded to each hook in attachment order. All methods have
//! no-op defaults, so a hook only implements what it cares about.
//!
//! Hooks cannot call back into the manager while it is ticking them.
//! Instead they keep the [`NavContext`] handed to them in
//! [`LifecycleHook::initialize`] and queue requests through it; the
//! manager drains the queue at the end of the tick. Requests made while
//! a navigation is in flight stay queued until it finishes.

use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Event dispatched through the active chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl NavEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Per-node lifecycle capability.
///
/// Readiness defaults to `true`, so a hook that does no asynchronous
/// work never holds up a navigation.
pub trait LifecycleHook {
    /// Called once when the owning manager is constructed.
    fn initialize(&mut self, _context: &NavContext, _owner: NodeId) {}

    fn on_state_start_loading(&mut self) {}

    fn on_state_loading_update(&mut self, _dt: f32) {}

    /// The node is done loading when every hook is.
    fn is_done_loading(&self) -> bool {
        true
    }

    /// Called once, as soon as every hook on the node is done loading.
    fn on_state_loading_complete(&mut self) {}

    /// Called after all nodes of a navigation finished loading.
    fn on_state_enter(&mut self) {}

    fn on_state_active_update(&mut self, _dt: f32) {}

    fn on_state_start_unloading(&mut self) {}

    fn on_state_unloading_update(&mut self, _dt: f32) {}

    fn is_done_unloading(&self) -> bool {
        true
    }

    /// Called after all exiting nodes finished unloading.
    fn on_state_leave(&mut self) {}

    /// Return `true` to consume the event.
    fn on_handle_event(&mut self, _event: &NavEvent) -> bool {
        false
    }
}

/// Request queued by a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    /// Resolve a transition name from the active leaf upward.
    Transition(String),
    /// Navigate to an explicit node.
    TransitionTo(NodeId),
}

/// Shared handle between a manager and the hooks it owns.
///
/// Single-threaded: clones share one request queue.
#[derive(Clone)]
pub struct NavContext {
    space: Rc<str>,
    requests: Rc<RefCell<VecDeque<PendingRequest>>>,
}

impl NavContext {
    pub fn new(space: &str) -> Self {
        Self {
            space: Rc::from(space),
            requests: Rc::default(),
        }
    }

    /// Name of the navigation space this context belongs to.
    pub fn space(&self) -> &str {
        &self.space
    }

    pub fn request_transition(&self, name: impl Into<String>) {
        self.requests
            .borrow_mut()
            .push_back(PendingRequest::Transition(name.into()));
    }

    pub fn request_transition_to(&self, node: NodeId) {
        self.requests
            .borrow_mut()
            .push_back(PendingRequest::TransitionTo(node));
    }

    pub fn has_pending(&self) -> bool {
        !self.requests.borrow().is_empty()
    }

    /// Take everything queued so far, oldest first.
    pub(crate) fn take_requests(&self) -> Vec<PendingRequest> {
        self.requests.borrow_mut().drain(..).collect()
    }

    /// Put requests back ahead of anything queued since, keeping their
    /// order.
    pub(crate) fn hold_requests(&self, held: Vec<PendingRequest>) {
        let mut queue = self.requests.borrow_mut();
        for request in held.into_iter().rev() {
            queue.push_front(request);
        }
    }
}

impl fmt::Debug for NavContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavContext")
            .field("space", &self.space)
            .field("pending", &self.requests.borrow().len())
            .finish()
    }
}
