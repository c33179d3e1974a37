//! Navigator - computes and drives navigation plans.
//!
//! Given the active leaf and a destination, [`plan_navigation`] finds
//! the smallest set of nodes to exit and enter:
//!
//! 1. Walk the destination's ancestors top-down (root excluded) and find
//!    the first Inactive one, the *entry root*. It and everything below
//!    it down to the destination get entered.
//! 2. Drill through default children until a leaf is reached.
//! 3. Exit from the active leaf upward, stopping below the *exit
//!    boundary*: the entry root's parent, or the destination's parent
//!    when no ancestor needs entering.
//!
//! Driving the plan then works in two phases:
//!
//! ```text
//! exit:   start_unloading(all) ──► poll leaf→root ──► leave(all)
//! enter:  start_loading(n0) ──► done? ──► start_loading(n1) ──► … ──► enter(all)
//! ```
//!
//! Unloading is concurrent, loading strictly sequential. Nodes only
//! change to Active/Inactive as a batch once their whole phase is done.

use crate::diagnostics::NavDiagnostics;
use crate::error::NavError;
use crate::mode::Mode;
use crate::plan::NavigationPlan;
use crate::tree::{NavTree, NodeId};

/// Compute the plan for moving from `origin` (the active leaf) to
/// `destination`, without touching any node.
///
/// Transitioning a leaf to itself is not a no-op: it yields exit and
/// enter lists of exactly that leaf, forcing a full reload.
pub fn plan_navigation(
    tree: &NavTree,
    origin: NodeId,
    destination: NodeId,
) -> Result<NavigationPlan, NavError> {
    for id in [origin, destination] {
        if !tree.contains(id) {
            return Err(NavError::UnknownNode(id));
        }
    }

    let mut plan = NavigationPlan::new();
    plan.set_origin(origin);

    let mut entry_root = None;
    for parent in tree.parents_top_down(destination) {
        if entry_root.is_none() && tree.mode(parent) == Mode::Inactive {
            entry_root = Some(parent);
        }
        if entry_root.is_some() {
            plan.add_to_enter(parent);
        }
    }
    plan.add_to_enter(destination);
    add_default_states_to_enter(tree, destination, &mut plan)?;

    let exit_boundary = match entry_root {
        Some(entry_root) => tree.parent(entry_root),
        None => tree.parent(destination),
    };

    let mut cursor = Some(origin);
    while let Some(id) = cursor {
        if Some(id) == exit_boundary {
            break;
        }
        plan.add_to_leave(id);
        cursor = tree.parent(id);
    }

    Ok(plan)
}

/// Append default children below `from` until a leaf is reached.
fn add_default_states_to_enter(
    tree: &NavTree,
    from: NodeId,
    plan: &mut NavigationPlan,
) -> Result<(), NavError> {
    let mut cursor = from;
    while tree.get(cursor).is_composite() {
        let Some(default_child) = tree.get(cursor).default_child() else {
            return Err(NavError::MissingDefaultChild {
                path: tree.path(cursor),
            });
        };
        plan.add_to_enter(default_child);
        cursor = default_child;
    }
    Ok(())
}

/// Owns the single in-flight [`NavigationPlan`] and advances it.
#[derive(Debug, Default)]
pub struct Navigator {
    plan: NavigationPlan,
    /// Node whose readiness is being polled; the active leaf once the
    /// plan completes.
    current: Option<NodeId>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> &NavigationPlan {
        &self.plan
    }

    pub fn current_state(&self) -> Option<NodeId> {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        !self.plan.is_complete()
    }

    /// Enter the root and its default chain. Only allowed once.
    pub fn initialize(
        &mut self,
        tree: &mut NavTree,
        diag: &mut dyn NavDiagnostics,
    ) -> Result<(), NavError> {
        if self.is_transitioning() {
            return Err(NavError::NavigationInFlight);
        }
        if self.current.is_some() {
            diag.error(&NavError::AlreadyInitialized.to_string());
            return Err(NavError::AlreadyInitialized);
        }

        let root = tree.root();
        self.plan.reset();
        self.plan.add_to_enter(root);
        if let Err(err) = add_default_states_to_enter(tree, root, &mut self.plan) {
            self.plan.reset();
            diag.error(&err.to_string());
            return Err(err);
        }

        self.plan.navigation_started();
        self.begin_loading(tree, root, diag);
        self.advance(tree, diag);
        Ok(())
    }

    /// Start navigating to `destination`.
    ///
    /// A configuration error leaves every node untouched and the plan
    /// idle, so the next request can proceed.
    pub fn navigate(
        &mut self,
        tree: &mut NavTree,
        destination: NodeId,
        diag: &mut dyn NavDiagnostics,
    ) -> Result<(), NavError> {
        if self.is_transitioning() {
            diag.error("Navigation was requested before navigation finished!");
            return Err(NavError::NavigationInFlight);
        }
        let Some(origin) = self.current else {
            return Err(NavError::NotInitialized);
        };

        let plan = match plan_navigation(tree, origin, destination) {
            Ok(plan) => plan,
            Err(err) => {
                self.plan.reset();
                diag.error(&err.to_string());
                return Err(err);
            }
        };

        tracing::debug!(
            from = %tree.path(origin),
            to = %tree.path(destination),
            leave = ?paths(tree, plan.to_leave()),
            enter = ?paths(tree, plan.to_enter()),
            "navigation planned"
        );

        self.plan = plan;
        self.plan.navigation_started();

        for &id in self.plan.to_leave() {
            tree.get_mut(id).start_unloading(diag);
        }

        match self.plan.current_to_unload() {
            Some(first) => self.current = Some(first),
            None => self.begin_next_load(tree, diag),
        }

        self.advance(tree, diag);
        Ok(())
    }

    /// Poll the plan once per host tick.
    pub fn update(&mut self, tree: &mut NavTree, diag: &mut dyn NavDiagnostics) {
        self.advance(tree, diag);
    }

    /// Keep stepping while nodes report done on the spot.
    fn advance(&mut self, tree: &mut NavTree, diag: &mut dyn NavDiagnostics) {
        while self.step(tree, diag) {}
    }

    /// Returns true if the plan moved forward.
    fn step(&mut self, tree: &mut NavTree, diag: &mut dyn NavDiagnostics) -> bool {
        if self.plan.is_complete() {
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };

        match tree.mode(current) {
            Mode::Inactive | Mode::Active => false,
            Mode::Loading => {
                if !tree.get(current).is_done_loading(diag) {
                    return false;
                }
                tree.get_mut(current).loading_complete();
                self.plan.state_loaded();
                self.begin_next_load(tree, diag);
                true
            }
            Mode::Unloading => {
                if !tree.get(current).is_done_unloading(diag) {
                    return false;
                }
                self.plan.state_unloaded();
                match self.plan.current_to_unload() {
                    Some(next) => self.current = Some(next),
                    None => {
                        self.leave_states(tree, diag);
                        self.begin_next_load(tree, diag);
                    }
                }
                true
            }
        }
    }

    /// Start loading whatever the load cursor points at, or enter the
    /// whole batch once the enter list is exhausted.
    fn begin_next_load(&mut self, tree: &mut NavTree, diag: &mut dyn NavDiagnostics) {
        match self.plan.current_to_load() {
            Some(next) => self.begin_loading(tree, next, diag),
            None => {
                let batch = self.plan.navigation_ended();
                self.enter_states(tree, &batch, diag);
            }
        }
    }

    fn begin_loading(&mut self, tree: &mut NavTree, id: NodeId, diag: &mut dyn NavDiagnostics) {
        self.current = Some(id);
        tree.set_active_child(id);
        tree.get_mut(id).start_loading(diag);
    }

    fn enter_states(&mut self, tree: &mut NavTree, batch: &[NodeId], diag: &mut dyn NavDiagnostics) {
        tracing::debug!(enter = ?paths(tree, batch), "entering batch");
        for &id in batch {
            tree.get_mut(id).enter(diag);
        }
    }

    fn leave_states(&mut self, tree: &mut NavTree, diag: &mut dyn NavDiagnostics) {
        tracing::debug!(leave = ?paths(tree, self.plan.to_leave()), "leaving batch");
        for &id in self.plan.to_leave() {
            tree.leave(id, diag);
        }
    }
}

fn paths(tree: &NavTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|id| tree.path(*id)).collect()
}
