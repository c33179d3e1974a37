//! Navigation tree.
//!
//! Nodes live in an arena owned by [`NavTree`] and refer to each other
//! through [`NodeId`] handles: a node stores its parent handle (none for
//! the root) and a composite stores its children plus default-child and
//! active-child handles. No node owns another.
//!
//! The tree is built once with [`TreeBuilder`] and its shape never
//! changes afterwards; only modes and active-child pointers move.

use crate::diagnostics::NavDiagnostics;
use crate::error::NavError;
use crate::hook::{LifecycleHook, NavContext, NavEvent};
use crate::mode::Mode;
use crate::transition::TransitionTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used in node paths (`root/menu/options`).
pub const PATH_SEPARATOR: char = '/';

/// Opaque handle to a node of a [`NavTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Highest arena index a handle can address.
    pub const MAX_INDEX: usize = u32::MAX as usize;

    /// Handle for an arena slot. `index` must not exceed `MAX_INDEX`;
    /// the builder never issues larger ones.
    pub fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    /// Checked variant of [`from_index`](Self::from_index).
    pub fn try_from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(NodeId)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf or composite payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Composite {
        children: Vec<NodeId>,
        default_child: Option<NodeId>,
        /// Child currently Loading, Active or Unloading.
        active_child: Option<NodeId>,
    },
}

/// A tree element with a mode and attached lifecycle hooks.
pub struct Node {
    name: String,
    path: String,
    parent: Option<NodeId>,
    mode: Mode,
    /// Set once every hook reported done loading during the current
    /// Loading phase. The mode itself only flips on batch enter.
    load_complete: bool,
    hooks: Vec<Box<dyn LifecycleHook>>,
    transitions: TransitionTable,
    kind: NodeKind,
}

impl Node {
    fn new(name: &str, path: String, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            path,
            parent,
            mode: Mode::Inactive,
            load_complete: false,
            hooks: Vec::new(),
            transitions: TransitionTable::new(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `/`-joined names from the root down to this node.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Composite { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Composite { children, .. } => children,
            NodeKind::Leaf => &[],
        }
    }

    pub fn default_child(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Composite { default_child, .. } => *default_child,
            NodeKind::Leaf => None,
        }
    }

    pub fn active_child(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Composite { active_child, .. } => *active_child,
            NodeKind::Leaf => None,
        }
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the loading-complete notification already fired.
    pub fn is_load_complete(&self) -> bool {
        self.load_complete
    }

    /// Exact-match lookup in this node's own table. No bubbling.
    pub fn resolve_local_transition(&self, name: &str) -> Option<NodeId> {
        self.transitions.get(name)
    }

    fn advance_mode(&mut self, to: Mode, diag: &mut dyn NavDiagnostics) -> bool {
        if !self.mode.can_move_to(to) {
            diag.error(&format!(
                "Illegal mode change {} -> {to} on {}",
                self.mode, self.path
            ));
            return false;
        }
        self.mode = to;
        diag.mode_changed(&self.path, to);
        true
    }

    /// Inactive → Loading.
    pub(crate) fn start_loading(&mut self, diag: &mut dyn NavDiagnostics) {
        if !self.advance_mode(Mode::Loading, diag) {
            return;
        }
        self.load_complete = false;
        for hook in &mut self.hooks {
            hook.on_state_start_loading();
        }
    }

    pub(crate) fn tick_loading(&mut self, dt: f32) {
        for hook in &mut self.hooks {
            hook.on_state_loading_update(dt);
        }
    }

    /// True iff every hook is done loading. Asking outside of Loading is
    /// misuse: reported and answered with `false`.
    pub(crate) fn is_done_loading(&self, diag: &mut dyn NavDiagnostics) -> bool {
        if self.mode != Mode::Loading {
            diag.warning(&format!(
                "is_done_loading() was called while not in the loading mode. State: {}",
                self.path
            ));
            return false;
        }
        self.hooks.iter().all(|h| h.is_done_loading())
    }

    /// Fires `on_state_loading_complete` once per Loading phase.
    pub(crate) fn loading_complete(&mut self) {
        if self.load_complete {
            return;
        }
        for hook in &mut self.hooks {
            hook.on_state_loading_complete();
        }
        self.load_complete = true;
    }

    /// Active → Unloading.
    pub(crate) fn start_unloading(&mut self, diag: &mut dyn NavDiagnostics) {
        if !self.advance_mode(Mode::Unloading, diag) {
            return;
        }
        for hook in &mut self.hooks {
            hook.on_state_start_unloading();
        }
    }

    pub(crate) fn tick_unloading(&mut self, dt: f32) {
        for hook in &mut self.hooks {
            hook.on_state_unloading_update(dt);
        }
    }

    pub(crate) fn is_done_unloading(&self, diag: &mut dyn NavDiagnostics) -> bool {
        if self.mode != Mode::Unloading {
            diag.warning(&format!(
                "is_done_unloading() was called while not in the unloading mode. State: {}",
                self.path
            ));
            return false;
        }
        self.hooks.iter().all(|h| h.is_done_unloading())
    }

    /// Loading → Active. Only called during batch activation.
    pub(crate) fn enter(&mut self, diag: &mut dyn NavDiagnostics) {
        if !self.advance_mode(Mode::Active, diag) {
            return;
        }
        for hook in &mut self.hooks {
            hook.on_state_enter();
        }
    }

    /// Unloading → Inactive. Only called during batch deactivation.
    fn leave(&mut self, diag: &mut dyn NavDiagnostics) {
        if !self.advance_mode(Mode::Inactive, diag) {
            return;
        }
        self.load_complete = false;
        for hook in &mut self.hooks {
            hook.on_state_leave();
        }
    }

    pub(crate) fn tick_active(&mut self, dt: f32) {
        for hook in &mut self.hooks {
            hook.on_state_active_update(dt);
        }
    }

    /// Offer the event to each hook in order; the first one that
    /// handles it stops dispatch at this node.
    pub(crate) fn handle_event(&mut self, event: &NavEvent) -> bool {
        self.hooks.iter_mut().any(|h| h.on_handle_event(event))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("hooks", &self.hooks.len())
            .field("transitions", &self.transitions)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Inspection record for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub path: String,
    pub mode: Mode,
    pub composite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_child: Option<String>,
}

/// Arena of navigation nodes.
#[derive(Debug)]
pub struct NavTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl NavTree {
    /// Start building a tree whose root is a composite named `root_name`.
    pub fn builder(root_name: &str) -> TreeBuilder {
        TreeBuilder::new(root_name)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node that is known to belong to this tree.
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Mode of `id`, or `Inactive` for a foreign handle.
    pub fn mode(&self, id: NodeId) -> Mode {
        self.node(id).map(Node::mode).unwrap_or_default()
    }

    /// Path of `id`, or its handle display for a foreign handle.
    pub fn path(&self, id: NodeId) -> String {
        self.node(id)
            .map(|n| n.path.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.path == path)
            .map(NodeId::from_index)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Strict ancestors of `id`, nearest first, root last.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Ancestors of `id` excluding the root, ordered top-down
    /// (nearest-to-root first).
    pub fn parents_top_down(&self, id: NodeId) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = self.ancestors(id).filter(|a| *a != self.root).collect();
        parents.reverse();
        parents
    }

    pub fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        self.ancestors(of).any(|a| a == ancestor)
    }

    /// Follow active-child pointers down from `from`.
    ///
    /// A composite that is Loading or Unloading resolves to itself.
    pub fn resolve_active_leaf(&self, from: NodeId) -> NodeId {
        let mut id = from;
        while let Some(node) = self.node(id) {
            if node.mode.is_transitional() {
                break;
            }
            match node.active_child() {
                Some(child) => id = child,
                None => break,
            }
        }
        id
    }

    /// Point the parent of `child` at it.
    pub(crate) fn set_active_child(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let NodeKind::Composite { active_child, .. } = &mut self.get_mut(parent).kind {
            *active_child = Some(child);
        }
    }

    /// Batch-deactivate one node and detach it from its parent.
    pub(crate) fn leave(&mut self, id: NodeId, diag: &mut dyn NavDiagnostics) {
        self.get_mut(id).leave(diag);
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let NodeKind::Composite { active_child, .. } = &mut self.get_mut(parent).kind {
            if *active_child == Some(id) {
                *active_child = None;
            }
        }
    }

    /// Per-tick lifecycle walk from the root along active children.
    ///
    /// Each visited node gets the update matching its mode. Inactive
    /// branches get nothing.
    pub(crate) fn tick(&mut self, dt: f32) {
        let mut cursor = Some(self.root);
        while let Some(id) = cursor {
            let node = self.get_mut(id);
            match node.mode {
                Mode::Inactive => break,
                Mode::Loading => node.tick_loading(dt),
                Mode::Active => node.tick_active(dt),
                Mode::Unloading => node.tick_unloading(dt),
            }
            cursor = node.active_child();
        }
    }

    /// Hand every hook its context and owning node.
    pub(crate) fn initialize_hooks(&mut self, context: &NavContext) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let owner = NodeId::from_index(index);
            for hook in &mut node.hooks {
                hook.initialize(context, owner);
            }
        }
    }

    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.nodes
            .iter()
            .map(|n| NodeSnapshot {
                path: n.path.clone(),
                mode: n.mode,
                composite: n.is_composite(),
                active_child: n.active_child().map(|c| self.get(c).path.clone()),
            })
            .collect()
    }
}

/// Iterator over strict ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a NavTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Builds a [`NavTree`].
///
/// Defaults are checked to be direct children when declared, but a
/// composite without a default is accepted; that is only detected when
/// a navigation first needs to drill through it.
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new(root_name: &str) -> Self {
        let root = Node::new(
            root_name,
            root_name.to_string(),
            None,
            NodeKind::Composite {
                children: Vec::new(),
                default_child: None,
                active_child: None,
            },
        );
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::from_index(0)
    }

    pub fn add_leaf(&mut self, parent: NodeId, name: &str) -> Result<NodeId, NavError> {
        self.add_node(parent, name, NodeKind::Leaf)
    }

    pub fn add_composite(&mut self, parent: NodeId, name: &str) -> Result<NodeId, NavError> {
        self.add_node(
            parent,
            name,
            NodeKind::Composite {
                children: Vec::new(),
                default_child: None,
                active_child: None,
            },
        )
    }

    fn add_node(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> Result<NodeId, NavError> {
        let parent_node = self.node(parent)?;
        let NodeKind::Composite { children, .. } = &parent_node.kind else {
            return Err(NavError::NotComposite {
                path: parent_node.path.clone(),
            });
        };
        if children.iter().any(|c| self.nodes[c.index()].name == name) {
            return Err(NavError::DuplicateChild {
                parent: parent_node.path.clone(),
                name: name.to_string(),
            });
        }

        let path = format!("{}{PATH_SEPARATOR}{name}", parent_node.path);
        let id = next_slot(self.nodes.len())?;
        self.nodes.push(Node::new(name, path, Some(parent), kind));
        if let NodeKind::Composite { children, .. } = &mut self.nodes[parent.index()].kind {
            children.push(id);
        }
        Ok(id)
    }

    /// Declare `child` as the default of `composite`.
    pub fn set_default(&mut self, composite: NodeId, child: NodeId) -> Result<(), NavError> {
        let child_path = self.node(child)?.path.clone();
        let node = self.node_mut(composite)?;
        let path = node.path.clone();
        match &mut node.kind {
            NodeKind::Leaf => Err(NavError::NotComposite { path }),
            NodeKind::Composite {
                children,
                default_child,
                ..
            } => {
                if !children.contains(&child) {
                    return Err(NavError::NotAChild {
                        parent: path,
                        child: child_path,
                    });
                }
                *default_child = Some(child);
                Ok(())
            }
        }
    }

    /// Declare a named transition on `from` targeting `target`.
    pub fn add_transition(
        &mut self,
        from: NodeId,
        name: &str,
        target: NodeId,
    ) -> Result<(), NavError> {
        self.node(target)?;
        self.node_mut(from)?.transitions.insert(name, target);
        Ok(())
    }

    /// Attach a hook; hooks run in attachment order.
    pub fn attach_hook(
        &mut self,
        node: NodeId,
        hook: Box<dyn LifecycleHook>,
    ) -> Result<(), NavError> {
        self.node_mut(node)?.hooks.push(hook);
        Ok(())
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.path == path)
            .map(NodeId::from_index)
    }

    pub fn path(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.path.as_str())
    }

    pub fn build(self) -> NavTree {
        NavTree {
            nodes: self.nodes,
            root: NodeId::from_index(0),
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, NavError> {
        self.nodes.get(id.index()).ok_or(NavError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, NavError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(NavError::UnknownNode(id))
    }
}

/// Handle for the slot after `len` existing nodes.
fn next_slot(len: usize) -> Result<NodeId, NavError> {
    NodeId::try_from_index(len).ok_or(NavError::TreeFull {
        max_index: NodeId::MAX_INDEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct LogHook {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        handles: bool,
    }

    impl LogHook {
        fn boxed(tag: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<Self> {
            Box::new(Self {
                tag,
                log: log.clone(),
                handles: false,
            })
        }

        fn push(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{what}", self.tag));
        }
    }

    impl LifecycleHook for LogHook {
        fn on_state_start_loading(&mut self) {
            self.push("start_loading");
        }
        fn on_state_loading_update(&mut self, _dt: f32) {
            self.push("loading_update");
        }
        fn on_state_loading_complete(&mut self) {
            self.push("loading_complete");
        }
        fn on_state_enter(&mut self) {
            self.push("enter");
        }
        fn on_state_active_update(&mut self, _dt: f32) {
            self.push("active_update");
        }
        fn on_state_start_unloading(&mut self) {
            self.push("start_unloading");
        }
        fn on_state_unloading_update(&mut self, _dt: f32) {
            self.push("unloading_update");
        }
        fn on_state_leave(&mut self) {
            self.push("leave");
        }
        fn on_handle_event(&mut self, _event: &NavEvent) -> bool {
            self.push("event");
            self.handles
        }
    }

    fn sample() -> (NavTree, NodeId, NodeId, NodeId) {
        let mut b = NavTree::builder("root");
        let root = b.root();
        let a = b.add_composite(root, "a").unwrap();
        let a1 = b.add_leaf(a, "a1").unwrap();
        let bn = b.add_leaf(a, "b").unwrap();
        b.set_default(root, a).unwrap();
        b.set_default(a, a1).unwrap();
        (b.build(), a, a1, bn)
    }

    #[test]
    fn builder_paths_and_lookup() {
        let (tree, a, a1, bn) = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.path(tree.root()), "root");
        assert_eq!(tree.path(a), "root/a");
        assert_eq!(tree.path(a1), "root/a/a1");
        assert_eq!(tree.find("root/a/b"), Some(bn));
        assert_eq!(tree.find("root/z"), None);
        assert!(tree.node(tree.root()).unwrap().is_root());
        assert_eq!(tree.node(a).unwrap().children(), &[a1, bn]);
        assert_eq!(tree.node(a).unwrap().default_child(), Some(a1));
    }

    #[test]
    fn builder_rejects_bad_shapes() {
        let mut b = NavTree::builder("root");
        let root = b.root();
        let leaf = b.add_leaf(root, "leaf").unwrap();
        let other = b.add_composite(root, "other").unwrap();

        assert!(matches!(
            b.add_leaf(leaf, "x"),
            Err(NavError::NotComposite { .. })
        ));
        assert!(matches!(
            b.add_leaf(root, "leaf"),
            Err(NavError::DuplicateChild { .. })
        ));
        assert!(matches!(
            b.set_default(other, leaf),
            Err(NavError::NotAChild { .. })
        ));
        assert!(matches!(
            b.set_default(leaf, leaf),
            Err(NavError::NotComposite { .. })
        ));
        let ghost = NodeId::from_index(99);
        assert_eq!(
            b.add_transition(leaf, "go", ghost),
            Err(NavError::UnknownNode(ghost))
        );
    }

    #[test]
    fn node_handles_never_truncate() {
        assert_eq!(next_slot(3), Ok(NodeId::from_index(3)));
        assert_eq!(
            NodeId::try_from_index(NodeId::MAX_INDEX).map(NodeId::index),
            Some(NodeId::MAX_INDEX)
        );
        if let Some(past_end) = NodeId::MAX_INDEX.checked_add(1) {
            assert_eq!(NodeId::try_from_index(past_end), None);
            let err = next_slot(past_end).unwrap_err();
            assert_eq!(
                err,
                NavError::TreeFull {
                    max_index: NodeId::MAX_INDEX
                }
            );
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn builder_accepts_missing_default() {
        let mut b = NavTree::builder("root");
        let root = b.root();
        b.add_composite(root, "empty").unwrap();
        let tree = b.build();
        assert_eq!(tree.node(tree.root()).unwrap().default_child(), None);
    }

    #[test]
    fn ancestors_and_parents() {
        let (tree, a, a1, _) = sample();
        let root = tree.root();

        assert_eq!(tree.ancestors(a1).collect::<Vec<_>>(), vec![a, root]);
        assert_eq!(tree.ancestors(root).count(), 0);
        assert_eq!(tree.parents_top_down(a1), vec![a]);
        assert!(tree.parents_top_down(a).is_empty());
        assert!(tree.is_ancestor(root, a1));
        assert!(tree.is_ancestor(a, a1));
        assert!(!tree.is_ancestor(a1, a));
    }

    #[test]
    fn node_lifecycle_cycles_modes_and_hooks_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut b = NavTree::builder("root");
        let root = b.root();
        let leaf = b.add_leaf(root, "leaf").unwrap();
        b.attach_hook(leaf, LogHook::boxed("h1", &log)).unwrap();
        b.attach_hook(leaf, LogHook::boxed("h2", &log)).unwrap();
        let mut tree = b.build();
        let recorder = RecordingDiagnostics::new();
        let mut diag = recorder.clone();

        let node = tree.get_mut(leaf);
        node.start_loading(&mut diag);
        assert!(node.is_done_loading(&mut diag));
        node.loading_complete();
        node.loading_complete();
        node.enter(&mut diag);
        node.start_unloading(&mut diag);
        assert!(node.is_done_unloading(&mut diag));
        tree.leave(leaf, &mut diag);

        assert_eq!(
            recorder.modes_of("root/leaf"),
            vec![Mode::Loading, Mode::Active, Mode::Unloading, Mode::Inactive]
        );
        assert_eq!(
            *log.borrow(),
            vec![
                "h1:start_loading",
                "h2:start_loading",
                "h1:loading_complete",
                "h2:loading_complete",
                "h1:enter",
                "h2:enter",
                "h1:start_unloading",
                "h2:start_unloading",
                "h1:leave",
                "h2:leave",
            ]
        );
    }

    #[test]
    fn readiness_outside_mode_is_warned() {
        let (mut tree, _, a1, _) = sample();
        let recorder = RecordingDiagnostics::new();
        let mut diag = recorder.clone();

        assert!(!tree.get(a1).is_done_loading(&mut diag));
        assert!(!tree.get(a1).is_done_unloading(&mut diag));
        assert_eq!(tree.mode(a1), Mode::Inactive);
        assert_eq!(recorder.warnings().len(), 2);
        assert!(recorder.warnings()[0].contains("root/a/a1"));

        // no side effect
        tree.get_mut(a1).start_loading(&mut diag);
        assert_eq!(tree.mode(a1), Mode::Loading);
    }

    #[test]
    fn illegal_mode_change_is_refused() {
        let (mut tree, _, a1, _) = sample();
        let recorder = RecordingDiagnostics::new();
        let mut diag = recorder.clone();

        tree.get_mut(a1).enter(&mut diag);
        assert_eq!(tree.mode(a1), Mode::Inactive);
        assert_eq!(recorder.errors().len(), 1);
    }

    #[test]
    fn leave_clears_parent_pointer() {
        let (mut tree, a, a1, _) = sample();
        let mut diag = RecordingDiagnostics::new();

        tree.set_active_child(a1);
        assert_eq!(tree.get(a).active_child(), Some(a1));

        let node = tree.get_mut(a1);
        node.start_loading(&mut diag);
        node.enter(&mut diag);
        node.start_unloading(&mut diag);
        tree.leave(a1, &mut diag);

        assert_eq!(tree.get(a).active_child(), None);
    }

    #[test]
    fn resolve_active_leaf_stops_at_transitional_composite() {
        let (mut tree, a, a1, _) = sample();
        let root = tree.root();
        let mut diag = RecordingDiagnostics::new();

        assert_eq!(tree.resolve_active_leaf(root), root);

        tree.set_active_child(a);
        tree.set_active_child(a1);
        for id in [root, a, a1] {
            tree.get_mut(id).start_loading(&mut diag);
        }
        assert_eq!(tree.resolve_active_leaf(root), root);

        for id in [root, a, a1] {
            tree.get_mut(id).enter(&mut diag);
        }
        assert_eq!(tree.resolve_active_leaf(root), a1);

        tree.get_mut(a).start_unloading(&mut diag);
        assert_eq!(tree.resolve_active_leaf(root), a);
    }

    #[test]
    fn tick_routes_by_mode_along_active_chain() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut b = NavTree::builder("root");
        let root = b.root();
        let a = b.add_composite(root, "a").unwrap();
        let a1 = b.add_leaf(a, "a1").unwrap();
        let other = b.add_leaf(root, "other").unwrap();
        b.attach_hook(root, LogHook::boxed("root", &log)).unwrap();
        b.attach_hook(a, LogHook::boxed("a", &log)).unwrap();
        b.attach_hook(a1, LogHook::boxed("a1", &log)).unwrap();
        b.attach_hook(other, LogHook::boxed("other", &log)).unwrap();
        let mut tree = b.build();
        let mut diag = RecordingDiagnostics::new();

        tree.tick(0.1);
        assert!(log.borrow().is_empty());

        tree.get_mut(root).start_loading(&mut diag);
        tree.get_mut(root).enter(&mut diag);
        tree.set_active_child(a);
        tree.get_mut(a).start_loading(&mut diag);
        tree.get_mut(a).enter(&mut diag);
        tree.set_active_child(a1);
        tree.get_mut(a1).start_loading(&mut diag);
        log.borrow_mut().clear();

        tree.tick(0.1);
        assert_eq!(
            *log.borrow(),
            vec!["root:active_update", "a:active_update", "a1:loading_update"]
        );
    }

    #[test]
    fn handle_event_stops_at_first_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut b = NavTree::builder("root");
        let root = b.root();
        let leaf = b.add_leaf(root, "leaf").unwrap();
        b.attach_hook(leaf, LogHook::boxed("first", &log)).unwrap();
        b.attach_hook(
            leaf,
            Box::new(LogHook {
                tag: "second",
                log: log.clone(),
                handles: true,
            }),
        )
        .unwrap();
        b.attach_hook(leaf, LogHook::boxed("third", &log)).unwrap();
        let mut tree = b.build();

        assert!(tree.get_mut(leaf).handle_event(&NavEvent::new("back")));
        assert_eq!(*log.borrow(), vec!["first:event", "second:event"]);
    }

    #[test]
    fn snapshot_reports_modes_and_active_children() {
        let (mut tree, a, _, _) = sample();
        let mut diag = RecordingDiagnostics::new();
        tree.set_active_child(a);
        tree.get_mut(a).start_loading(&mut diag);

        let snapshot = tree.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0].path, "root");
        assert_eq!(snapshot[0].active_child.as_deref(), Some("root/a"));
        assert_eq!(snapshot[1].mode, Mode::Loading);
        assert!(snapshot[1].composite);
        assert!(!snapshot[2].composite);

        let json = serde_json::to_value(&snapshot[1]).unwrap();
        assert_eq!(json["mode"], "Loading");
    }
}
