//! Navigation space configuration.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_false(v: &bool) -> bool {
    !v
}

/// Settings for one navigation space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Name the space is registered under.
    pub name: String,

    /// Ticked by the registry itself. Turn off when a controller hook in
    /// another space drives it instead.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub update_self: bool,

    /// Log every mode change.
    #[serde(default, skip_serializing_if = "is_false")]
    pub debug_logging: bool,
}

impl SpaceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            update_self: true,
            debug_logging: false,
        }
    }

    pub fn with_update_self(mut self, update_self: bool) -> Self {
        self.update_self = update_self;
        self
    }

    pub fn with_debug_logging(mut self, debug_logging: bool) -> Self {
        self.debug_logging = debug_logging;
        self
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SPACE_NAME)
    }
}
