//! Declarative navigation spaces.
//!
//! A space is described in YAML and turned into a [`NavTree`] in two
//! passes: nodes, defaults and hooks first, then transitions, since a
//! transition may target any node by absolute path.
//!
//! ```yaml
//! name: main
//! root:
//!   name: root
//!   default: menu
//!   children:
//!     - name: menu
//!       transitions:
//!         - { name: play, target: root/game }
//!       hooks:
//!         - kind: minimum_load_time
//!           seconds: 0.5
//!     - name: game
//! ```
//!
//! A node is a composite when it has a `children` key, even an empty
//! one. Hooks are created through a [`HookFactory`] keyed by `kind`;
//! the rest of the hook mapping is handed to the constructor.

use crate::behaviours::{
    AutoTransition, AutoTransitionParams, DelayedTransition, MinimumLoadTime, SpaceController,
};
use crate::config::SpaceConfig;
use crate::error::{DefinitionError, NavError};
use crate::hook::LifecycleHook;
use crate::manager::NavigationManager;
use crate::registry::SpaceRegistry;
use crate::tree::{NavTree, NodeId, TreeBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ── DTOs ──

/// Top-level space document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceDefinition {
    #[serde(flatten)]
    pub config: SpaceConfig,
    pub root: NodeDefinition,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeDefinition>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<TransitionDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<HookDefinition>,
}

impl NodeDefinition {
    pub fn is_composite(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub name: String,
    /// Absolute node path, e.g. `root/game`.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDefinition {
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_yaml::Value>,
}

impl HookDefinition {
    /// Parameters as one YAML mapping.
    pub fn params_value(&self) -> serde_yaml::Value {
        let mapping = self
            .params
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
            .collect::<serde_yaml::Mapping>();
        serde_yaml::Value::Mapping(mapping)
    }
}

/// Parse a YAML string into a [`SpaceDefinition`].
///
/// Only the document shape is checked here. Names and paths are
/// resolved by [`SpaceDefinition::build_tree`].
pub fn parse_space_yaml(yaml: &str) -> Result<SpaceDefinition, DefinitionError> {
    let def: SpaceDefinition = serde_yaml::from_str(yaml)?;
    Ok(def)
}

// ── Hook factory ──

/// Builds a hook from its YAML parameters.
pub type HookConstructor =
    Box<dyn Fn(&serde_yaml::Value) -> Result<Box<dyn LifecycleHook>, DefinitionError>>;

/// Hook constructors keyed by `kind`.
pub struct HookFactory {
    constructors: HashMap<String, HookConstructor>,
}

impl Default for HookFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl HookFactory {
    /// Factory with the built-in kinds registered.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register("minimum_load_time", |v| {
            let hook: MinimumLoadTime = hook_params("minimum_load_time", v)?;
            Ok(Box::new(hook))
        });
        factory.register("delayed_transition", |v| {
            let hook: DelayedTransition = hook_params("delayed_transition", v)?;
            Ok(Box::new(hook))
        });
        factory.register("auto_transition", |v| {
            let params: AutoTransitionParams = hook_params("auto_transition", v)?;
            Ok(Box::new(AutoTransition::from(params)))
        });
        factory
    }

    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: &str, constructor: F)
    where
        F: Fn(&serde_yaml::Value) -> Result<Box<dyn LifecycleHook>, DefinitionError> + 'static,
    {
        self.constructors
            .insert(kind.to_string(), Box::new(constructor));
    }

    /// Register `space_controller`, resolving `space: <name>` against the
    /// spaces registered right now.
    pub fn register_space_controllers(&mut self, registry: &SpaceRegistry) {
        let spaces = registry.handles();
        self.register("space_controller", move |v| {
            let params: SpaceControllerParams = hook_params("space_controller", v)?;
            let handle = spaces
                .get(&params.space)
                .cloned()
                .ok_or(NavError::UnknownSpace(params.space))?;
            Ok(Box::new(SpaceController::new(handle)))
        });
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    fn create(&self, path: &str, hook: &HookDefinition) -> Result<Box<dyn LifecycleHook>, DefinitionError> {
        let constructor = self
            .constructors
            .get(&hook.kind)
            .ok_or_else(|| DefinitionError::UnknownHookKind {
                path: path.to_string(),
                kind: hook.kind.clone(),
            })?;
        constructor(&hook.params_value())
    }
}

impl std::fmt::Debug for HookFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SpaceControllerParams {
    space: String,
}

/// Deserialize hook parameters, reporting failures against `kind`.
pub fn hook_params<T: DeserializeOwned>(
    kind: &str,
    value: &serde_yaml::Value,
) -> Result<T, DefinitionError> {
    serde_yaml::from_value(value.clone()).map_err(|e| DefinitionError::InvalidHookParams {
        kind: kind.to_string(),
        message: e.to_string(),
    })
}

// ── Build ──

struct PendingTransition {
    from: NodeId,
    path: String,
    name: String,
    target: String,
}

impl SpaceDefinition {
    /// Resolve names and paths into a tree with hooks attached.
    pub fn build_tree(&self, hooks: &HookFactory) -> Result<NavTree, DefinitionError> {
        let mut builder = NavTree::builder(&self.root.name);
        let root = builder.root();
        let mut pending = Vec::new();

        add_node_contents(&mut builder, root, &self.root, hooks, &mut pending)?;

        for t in pending {
            let target = builder
                .find(&t.target)
                .ok_or_else(|| DefinitionError::UnknownTarget {
                    path: t.path.clone(),
                    name: t.name.clone(),
                    target: t.target.clone(),
                })?;
            builder.add_transition(t.from, &t.name, target)?;
        }

        Ok(builder.build())
    }

    /// Build the tree and a manager for it, entering the root.
    pub fn build(&self, hooks: &HookFactory) -> Result<NavigationManager, DefinitionError> {
        let tree = self.build_tree(hooks)?;
        Ok(NavigationManager::new(tree, self.config.clone())?)
    }
}

/// First pass for one node: children (recursively), default, hooks,
/// and its transitions queued for the second pass.
fn add_node_contents(
    builder: &mut TreeBuilder,
    id: NodeId,
    def: &NodeDefinition,
    hooks: &HookFactory,
    pending: &mut Vec<PendingTransition>,
) -> Result<(), DefinitionError> {
    let path = builder.path(id).unwrap_or_default().to_string();

    let mut children = Vec::new();
    for child in def.children.iter().flatten() {
        let child_id = if child.is_composite() {
            builder.add_composite(id, &child.name)?
        } else {
            builder.add_leaf(id, &child.name)?
        };
        add_node_contents(builder, child_id, child, hooks, pending)?;
        children.push((child.name.as_str(), child_id));
    }

    if let Some(default) = &def.default {
        let (_, child_id) = children
            .iter()
            .find(|(name, _)| name == default)
            .ok_or_else(|| DefinitionError::UnknownDefault {
                path: path.clone(),
                default: default.clone(),
            })?;
        builder.set_default(id, *child_id)?;
    }

    for hook in &def.hooks {
        builder.attach_hook(id, hooks.create(&path, hook)?)?;
    }

    pending.extend(def.transitions.iter().map(|t| PendingTransition {
        from: id,
        path: path.clone(),
        name: t.name.clone(),
        target: t.target.clone(),
    }));
    Ok(())
}
