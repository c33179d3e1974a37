//! Node modes.
//!
//! Every node cycles through exactly four modes:
//!
//! ```text
//! Inactive ──► Loading ──► Active ──► Unloading ──┐
//!    ▲                                            │
//!    └────────────────────────────────────────────┘
//! ```
//!
//! No other edges exist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle mode of a navigation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Not part of the active chain. Initial mode.
    #[default]
    Inactive,
    /// Being entered; hooks may still be loading.
    Loading,
    /// Entered and receiving active updates.
    Active,
    /// Being exited; hooks may still be unloading.
    Unloading,
}

impl Mode {
    /// The only mode this one may move to.
    pub fn next(self) -> Mode {
        match self {
            Mode::Inactive => Mode::Loading,
            Mode::Loading => Mode::Active,
            Mode::Active => Mode::Unloading,
            Mode::Unloading => Mode::Inactive,
        }
    }

    /// Check if `to` is a legal successor of this mode.
    pub fn can_move_to(self, to: Mode) -> bool {
        self.next() == to
    }

    /// Loading or Unloading.
    pub fn is_transitional(self) -> bool {
        matches!(self, Mode::Loading | Mode::Unloading)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Inactive => "Inactive",
            Mode::Loading => "Loading",
            Mode::Active => "Active",
            Mode::Unloading => "Unloading",
        };
        f.write_str(name)
    }
}
