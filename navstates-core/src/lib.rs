//! Hierarchical navigation states.
//!
//! An application screen flow is modelled as a tree of nodes. Exactly one
//! chain from the root down to a leaf is active; moving to another node
//! unloads the nodes being left and loads the nodes being entered, each
//! through hooks that may take several ticks to finish. The design
//! ensures:
//!
//! 1. **Minimal change** - only nodes off the shared ancestor chain are
//!    exited and entered
//! 2. **Batch activation** - nodes become Active (or Inactive) together,
//!    once their whole phase is done
//! 3. **Bubbling** - transition names and events resolve from the active
//!    leaf up to the root
//! 4. **Declarative** - spaces can be loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! host ──tick(dt)──► NavigationManager ──► Navigator ──► NavigationPlan
//!                        │    ▲                │
//!                        │    │ requests       ▼
//!                        │  NavContext      NavTree (arena of Nodes)
//!                        ▼                     │
//!                   NavDiagnostics         LifecycleHook*
//!
//! SpaceRegistry ──► many NavigationManagers (one per named space)
//! ```
//!
//! # Example
//!
//! ```
//! use navstates_core::{parse_space_yaml, HookFactory};
//!
//! let def = parse_space_yaml(r#"
//! name: main
//! root:
//!   name: root
//!   default: menu
//!   children:
//!     - name: menu
//!       transitions:
//!         - { name: play, target: root/game }
//!     - name: game
//! "#).unwrap();
//!
//! let mut manager = def.build(&HookFactory::new()).unwrap();
//! manager.request_transition("play").unwrap();
//! manager.tick(0.016);
//! assert_eq!(manager.tree().path(manager.active_leaf()), "root/game");
//! ```

mod behaviours;
mod config;
mod definition;
mod diagnostics;
mod error;
mod hook;
mod manager;
mod mode;
mod navigator;
mod plan;
mod registry;
mod transition;
mod tree;

pub use behaviours::{
    AutoTransition, AutoTransitionParams, DelayedTransition, MinimumLoadTime, SpaceController,
};
pub use config::SpaceConfig;
pub use definition::{
    hook_params, parse_space_yaml, HookConstructor, HookDefinition, HookFactory, NodeDefinition,
    SpaceDefinition, TransitionDefinition,
};
pub use diagnostics::{DiagnosticRecord, NavDiagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use error::{DefinitionError, NavError};
pub use hook::{LifecycleHook, NavContext, NavEvent, PendingRequest};
pub use manager::{EventOutcome, NavigationManager};
pub use mode::Mode;
pub use navigator::{plan_navigation, Navigator};
pub use plan::NavigationPlan;
pub use registry::{SpaceHandle, SpaceRegistry};
pub use transition::{Transition, TransitionTable};
pub use tree::{Ancestors, NavTree, Node, NodeId, NodeKind, NodeSnapshot, TreeBuilder, PATH_SEPARATOR};

/// Name used by `SpaceConfig::default()`.
pub const DEFAULT_SPACE_NAME: &str = "main";
