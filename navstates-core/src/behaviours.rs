//! Built-in hooks.
//!
//! | Hook                 | YAML kind            | Effect                                      |
//! |----------------------|----------------------|---------------------------------------------|
//! | [`MinimumLoadTime`]  | `minimum_load_time`  | holds loading for a number of seconds       |
//! | [`DelayedTransition`]| `delayed_transition` | requests a transition after being active    |
//! | [`AutoTransition`]   | `auto_transition`    | both of the above on one node               |
//! | [`SpaceController`]  | `space_controller`   | ticks a nested space while active           |
//!
//! Timers only advance on the ticks the manager routes to the node, so
//! time spent Inactive never counts.

use crate::hook::{LifecycleHook, NavContext};
use crate::registry::SpaceHandle;
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};

/// Countdown advanced by tick deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Countdown {
    remaining: f32,
}

impl Countdown {
    fn start(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    fn advance(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    fn expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

// ── MinimumLoadTime ──

/// Not done loading until `seconds` of loading ticks have elapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumLoadTime {
    pub seconds: f32,
    #[serde(skip)]
    timer: Countdown,
}

impl MinimumLoadTime {
    pub fn new(seconds: f32) -> Self {
        Self {
            seconds,
            timer: Countdown::default(),
        }
    }
}

impl LifecycleHook for MinimumLoadTime {
    fn on_state_start_loading(&mut self) {
        self.timer.start(self.seconds);
    }

    fn on_state_loading_update(&mut self, dt: f32) {
        self.timer.advance(dt);
    }

    fn is_done_loading(&self) -> bool {
        self.timer.expired()
    }
}

// ── DelayedTransition ──

/// Requests `transition` once the node has been active for `delay`
/// seconds. Fires at most once per entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayedTransition {
    pub delay: f32,
    pub transition: String,
    #[serde(skip)]
    timer: Countdown,
    #[serde(skip)]
    fired: bool,
    #[serde(skip)]
    context: Option<NavContext>,
}

impl DelayedTransition {
    pub fn new(delay: f32, transition: impl Into<String>) -> Self {
        Self {
            delay,
            transition: transition.into(),
            timer: Countdown::default(),
            fired: false,
            context: None,
        }
    }

    fn rearm(&mut self) {
        self.timer.start(self.delay);
        self.fired = false;
    }

    /// Advance the timer and queue the transition when it runs out.
    fn tick(&mut self, dt: f32) {
        if self.fired {
            return;
        }
        self.timer.advance(dt);
        if !self.timer.expired() {
            return;
        }
        self.fired = true;
        match &self.context {
            Some(context) => context.request_transition(self.transition.as_str()),
            None => tracing::warn!(
                transition = %self.transition,
                "delayed transition fired before the hook was initialized"
            ),
        }
    }
}

impl LifecycleHook for DelayedTransition {
    fn initialize(&mut self, context: &NavContext, _owner: NodeId) {
        self.context = Some(context.clone());
    }

    fn on_state_enter(&mut self) {
        self.rearm();
    }

    fn on_state_active_update(&mut self, dt: f32) {
        self.tick(dt);
    }
}

// ── AutoTransition ──

/// Minimum load time followed by a delayed transition.
///
/// An empty transition name is logged as an error at initialization
/// and the hook then never fires.
#[derive(Debug, Clone)]
pub struct AutoTransition {
    load: MinimumLoadTime,
    wait: DelayedTransition,
}

/// YAML parameters of [`AutoTransition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoTransitionParams {
    pub transition: String,
    #[serde(default)]
    pub seconds_to_wait: f32,
    #[serde(default)]
    pub minimum_load_time: f32,
}

impl AutoTransition {
    pub fn new(transition: impl Into<String>, seconds_to_wait: f32, minimum_load_time: f32) -> Self {
        Self {
            load: MinimumLoadTime::new(minimum_load_time),
            wait: DelayedTransition::new(seconds_to_wait, transition),
        }
    }

    pub fn transition(&self) -> &str {
        &self.wait.transition
    }

    fn has_transition(&self) -> bool {
        !self.wait.transition.is_empty()
    }
}

impl From<AutoTransitionParams> for AutoTransition {
    fn from(p: AutoTransitionParams) -> Self {
        Self::new(p.transition, p.seconds_to_wait, p.minimum_load_time)
    }
}

impl LifecycleHook for AutoTransition {
    fn initialize(&mut self, context: &NavContext, owner: NodeId) {
        if !self.has_transition() {
            tracing::error!(space = %context.space(), node = %owner, "AutoTransition has empty transition");
        }
        self.wait.initialize(context, owner);
    }

    fn on_state_start_loading(&mut self) {
        self.load.on_state_start_loading();
    }

    fn on_state_loading_update(&mut self, dt: f32) {
        self.load.on_state_loading_update(dt);
    }

    fn is_done_loading(&self) -> bool {
        self.load.is_done_loading()
    }

    fn on_state_enter(&mut self) {
        self.wait.on_state_enter();
    }

    fn on_state_active_update(&mut self, dt: f32) {
        if self.has_transition() {
            self.wait.on_state_active_update(dt);
        }
    }
}

// ── SpaceController ──

/// Ticks another navigation space while the owning node is active.
///
/// The controlled space should be registered with `update_self` off,
/// otherwise it advances twice per frame.
pub struct SpaceController {
    space: SpaceHandle,
}

impl SpaceController {
    pub fn new(space: SpaceHandle) -> Self {
        if let Ok(controlled) = space.try_borrow() {
            if controlled.config().update_self {
                tracing::error!(
                    space = %controlled.name(),
                    "SpaceController is updating a space that has update_self enabled"
                );
            }
        }
        Self { space }
    }

    pub fn space(&self) -> &SpaceHandle {
        &self.space
    }
}

impl LifecycleHook for SpaceController {
    fn on_state_active_update(&mut self, dt: f32) {
        match self.space.try_borrow_mut() {
            Ok(mut manager) => manager.tick(dt),
            Err(_) => tracing::warn!("SpaceController skipped a space that is already updating"),
        }
    }
}

impl std::fmt::Debug for SpaceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self
            .space
            .try_borrow()
            .map(|m| m.name().to_string())
            .unwrap_or_default();
        f.debug_struct("SpaceController").field("space", &name).finish()
    }
}
