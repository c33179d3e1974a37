//! Navigation manager - the host-facing facade.
//!
//! Owns one tree, its navigator and the diagnostic sink. Routes named
//! transitions and events from the active leaf up through its ancestors.
//!
//! # Example
//!
//! ```
//! use navstates_core::{NavTree, NavigationManager, SpaceConfig};
//!
//! let mut b = NavTree::builder("root");
//! let root = b.root();
//! let menu = b.add_leaf(root, "menu").unwrap();
//! let game = b.add_leaf(root, "game").unwrap();
//! b.set_default(root, menu).unwrap();
//! b.add_transition(root, "play", game).unwrap();
//!
//! let mut manager = NavigationManager::new(b.build(), SpaceConfig::new("main")).unwrap();
//! assert_eq!(manager.active_leaf(), menu);
//!
//! manager.request_transition("play").unwrap();
//! manager.tick(0.016);
//! assert_eq!(manager.active_leaf(), game);
//! ```

use crate::config::SpaceConfig;
use crate::diagnostics::{NavDiagnostics, TracingDiagnostics};
use crate::error::NavError;
use crate::hook::{NavContext, NavEvent, PendingRequest};
use crate::navigator::Navigator;
use crate::tree::{NavTree, NodeId, NodeSnapshot};

/// Result of dispatching an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A hook on this node consumed the event.
    Handled(NodeId),
    /// No node from the active leaf to the root consumed it.
    Unhandled,
}

impl EventOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventOutcome::Handled(_))
    }
}

/// Facade over one navigation tree.
pub struct NavigationManager {
    config: SpaceConfig,
    tree: NavTree,
    navigator: Navigator,
    context: NavContext,
    diagnostics: Box<dyn NavDiagnostics>,
    last_active: Option<NodeId>,
}

impl NavigationManager {
    /// Build a manager logging through `tracing`, and enter the root.
    pub fn new(tree: NavTree, config: SpaceConfig) -> Result<Self, NavError> {
        let diagnostics = TracingDiagnostics::new(config.debug_logging);
        Self::with_diagnostics(tree, config, Box::new(diagnostics))
    }

    /// Build a manager with a custom diagnostic sink, and enter the root.
    ///
    /// Every hook is initialized with the manager's context before the
    /// root starts loading.
    pub fn with_diagnostics(
        mut tree: NavTree,
        config: SpaceConfig,
        mut diagnostics: Box<dyn NavDiagnostics>,
    ) -> Result<Self, NavError> {
        let context = NavContext::new(&config.name);
        tree.initialize_hooks(&context);

        let mut navigator = Navigator::new();
        navigator.initialize(&mut tree, diagnostics.as_mut())?;

        let mut manager = Self {
            config,
            tree,
            navigator,
            context,
            diagnostics,
            last_active: None,
        };
        manager.process_requests();
        Ok(manager)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Context shared with this manager's hooks.
    pub fn context(&self) -> &NavContext {
        &self.context
    }

    /// Deepest node on the active-child chain.
    pub fn active_leaf(&self) -> NodeId {
        self.tree.resolve_active_leaf(self.tree.root())
    }

    /// Active leaf when the latest navigation was requested.
    pub fn last_active(&self) -> Option<NodeId> {
        self.last_active
    }

    pub fn is_transitioning(&self) -> bool {
        self.navigator.is_transitioning()
    }

    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.tree.snapshot()
    }

    /// Advance everything by one host frame.
    ///
    /// Polls the in-flight plan, runs the lifecycle updates along the
    /// active chain, then services requests queued by hooks.
    pub fn tick(&mut self, dt: f32) {
        self.navigator
            .update(&mut self.tree, self.diagnostics.as_mut());
        self.tree.tick(dt);
        self.process_requests();
    }

    /// Find the target of `name`, trying the active leaf first and then
    /// each ancestor up to the root.
    pub fn resolve_transition(&self, name: &str) -> Option<NodeId> {
        let leaf = self.active_leaf();
        std::iter::once(leaf)
            .chain(self.tree.ancestors(leaf))
            .find_map(|id| self.tree.get(id).resolve_local_transition(name))
    }

    /// Whether `request_transition(name)` would start a navigation now.
    pub fn can_process_transition(&self, name: &str) -> bool {
        !self.is_transitioning() && self.resolve_transition(name).is_some()
    }

    /// Navigate along the named transition, bubbling from the active leaf.
    pub fn request_transition(&mut self, name: &str) -> Result<(), NavError> {
        match self.resolve_transition(name) {
            Some(target) => self.request_transition_to(target),
            None => {
                let err = NavError::TransitionNotFound {
                    name: name.to_string(),
                    from: self.tree.path(self.active_leaf()),
                };
                self.diagnostics.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Navigate to an explicit node. Targeting the active leaf reloads it.
    pub fn request_transition_to(&mut self, node: NodeId) -> Result<(), NavError> {
        if !self.tree.contains(node) {
            let err = NavError::UnknownNode(node);
            self.diagnostics.error(&err.to_string());
            return Err(err);
        }

        let previous = self.active_leaf();
        self.navigator
            .navigate(&mut self.tree, node, self.diagnostics.as_mut())?;
        self.last_active = Some(previous);
        Ok(())
    }

    /// Offer `event` to the active leaf, then to each ancestor in turn.
    pub fn dispatch_event(&mut self, event: &NavEvent) -> EventOutcome {
        let leaf = self.active_leaf();
        let chain: Vec<NodeId> = std::iter::once(leaf)
            .chain(self.tree.ancestors(leaf))
            .collect();

        for id in chain {
            if self.tree.get_mut(id).handle_event(event) {
                return EventOutcome::Handled(id);
            }
        }

        tracing::debug!(space = %self.config.name, event = %event.name, "event unhandled");
        EventOutcome::Unhandled
    }

    /// Every transition name declared from the active leaf up to the
    /// root, nearest first. Duplicates are kept.
    pub fn collect_valid_transition_names(&self) -> Vec<String> {
        let leaf = self.active_leaf();
        std::iter::once(leaf)
            .chain(self.tree.ancestors(leaf))
            .flat_map(|id| self.tree.get(id).transitions().names())
            .map(str::to_string)
            .collect()
    }

    /// Service what hooks queued so far. Requests queued while doing so
    /// wait for the next tick, and so does everything left once a
    /// request starts a navigation that does not finish on the spot.
    fn process_requests(&mut self) {
        let mut requests = self.context.take_requests().into_iter();
        while let Some(request) = requests.next() {
            if self.is_transitioning() {
                let held: Vec<PendingRequest> =
                    std::iter::once(request).chain(requests.by_ref()).collect();
                tracing::debug!(
                    space = %self.config.name,
                    held = held.len(),
                    "hook requests held until navigation finishes"
                );
                self.context.hold_requests(held);
                return;
            }
            let result = match &request {
                PendingRequest::Transition(name) => self.request_transition(name),
                PendingRequest::TransitionTo(node) => self.request_transition_to(*node),
            };
            if let Err(err) = result {
                tracing::debug!(space = %self.config.name, ?request, %err, "hook request dropped");
            }
        }
    }
}

impl std::fmt::Debug for NavigationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationManager")
            .field("config", &self.config)
            .field("active_leaf", &self.tree.path(self.active_leaf()))
            .field("transitioning", &self.is_transitioning())
            .finish()
    }
}
