//! Shared test helpers: a hook that records every call into a shared
//! log and whose readiness the test controls.

#![allow(dead_code)]

use navstates_core::{LifecycleHook, NavEvent};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test-side switches for one [`RecordingHook`].
#[derive(Clone, Default)]
pub struct Gate {
    loaded: Rc<Cell<bool>>,
    unloaded: Rc<Cell<bool>>,
    active_ticks: Rc<Cell<u32>>,
    unloading_ticks: Rc<Cell<u32>>,
}

impl Gate {
    pub fn open() -> Self {
        let gate = Self::default();
        gate.set_loaded(true);
        gate.set_unloaded(true);
        gate
    }

    pub fn set_loaded(&self, ready: bool) {
        self.loaded.set(ready);
    }

    pub fn set_unloaded(&self, ready: bool) {
        self.unloaded.set(ready);
    }

    pub fn active_ticks(&self) -> u32 {
        self.active_ticks.get()
    }

    pub fn unloading_ticks(&self) -> u32 {
        self.unloading_ticks.get()
    }
}

pub struct RecordingHook {
    tag: String,
    log: CallLog,
    gate: Gate,
    consumes: Option<String>,
    log_polls: bool,
}

impl RecordingHook {
    /// Hook that is always ready.
    pub fn ready(tag: &str, log: &CallLog) -> Box<Self> {
        Self::with_gate(tag, log, Gate::open())
    }

    /// Hook whose readiness starts closed; open it through the gate.
    pub fn gated(tag: &str, log: &CallLog) -> (Box<Self>, Gate) {
        let gate = Gate::default();
        (Self::with_gate(tag, log, gate.clone()), gate)
    }

    pub fn with_gate(tag: &str, log: &CallLog, gate: Gate) -> Box<Self> {
        Box::new(Self {
            tag: tag.to_string(),
            log: log.clone(),
            gate,
            consumes: None,
            log_polls: false,
        })
    }

    /// Consume events with this name.
    pub fn consuming(mut self: Box<Self>, event: &str) -> Box<Self> {
        self.consumes = Some(event.to_string());
        self
    }

    /// Also log every readiness poll.
    pub fn logging_polls(mut self: Box<Self>) -> Box<Self> {
        self.log_polls = true;
        self
    }

    fn push(&self, what: &str) {
        self.log.borrow_mut().push(format!("{}:{what}", self.tag));
    }
}

impl LifecycleHook for RecordingHook {
    fn on_state_start_loading(&mut self) {
        self.push("start_loading");
    }

    fn is_done_loading(&self) -> bool {
        if self.log_polls {
            self.push("poll_loading");
        }
        self.gate.loaded.get()
    }

    fn on_state_loading_complete(&mut self) {
        self.push("loading_complete");
    }

    fn on_state_enter(&mut self) {
        self.push("enter");
    }

    fn on_state_active_update(&mut self, _dt: f32) {
        self.gate.active_ticks.set(self.gate.active_ticks.get() + 1);
    }

    fn on_state_start_unloading(&mut self) {
        self.push("start_unloading");
    }

    fn on_state_unloading_update(&mut self, _dt: f32) {
        self.gate.unloading_ticks.set(self.gate.unloading_ticks.get() + 1);
    }

    fn is_done_unloading(&self) -> bool {
        if self.log_polls {
            self.push("poll_unloading");
        }
        self.gate.unloaded.get()
    }

    fn on_state_leave(&mut self) {
        self.push("leave");
    }

    fn on_handle_event(&mut self, event: &NavEvent) -> bool {
        self.push(&format!("event {}", event.name));
        self.consumes.as_deref() == Some(event.name.as_str())
    }
}

/// Entries of `log` that end with `suffix`, tag only.
pub fn tags_with(log: &CallLog, suffix: &str) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(|e| e.strip_suffix(&format!(":{suffix}")).map(str::to_string))
        .collect()
}
