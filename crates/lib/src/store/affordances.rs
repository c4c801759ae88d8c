//! UI capability interface.
//!
//! The store never touches a view directly. It emits intents through
//! [`Affordances`] and the embedding UI decides what they mean.

/// Editing controls the store asks the UI to toggle.
pub trait Affordances: Send + Sync {
    /// A list is open: lock controls that would start another edit.
    fn disable_editing(&self);

    /// No list is open: unlock editing controls.
    fn enable_editing(&self);

    /// Result of the publish gate for the current draft.
    fn set_publish_enabled(&self, enabled: bool);
}

/// Affordances for headless use, e.g. the HTTP server.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAffordances;

impl Affordances for NoopAffordances {
    fn disable_editing(&self) {}
    fn enable_editing(&self) {}
    fn set_publish_enabled(&self, _enabled: bool) {}
}

/// An intent emitted by the store.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    DisableEditing,
    EnableEditing,
    PublishEnabled(bool),
}

/// Affordances that remember every intent, for assertions in tests.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct RecordingAffordances {
    events: std::sync::Mutex<Vec<Affordance>>,
}

#[cfg(any(test, feature = "testing"))]
impl RecordingAffordances {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: Affordance) {
        self.events.lock().unwrap().push(event);
    }

    /// Everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<Affordance> {
        self.events.lock().unwrap().clone()
    }

    /// The last publish gate result emitted, if any.
    pub fn publish_enabled(&self) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            Affordance::PublishEnabled(enabled) => Some(enabled),
            _ => None,
        })
    }

    /// Whether editing is currently locked according to the intents seen.
    pub fn editing_disabled(&self) -> bool {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                Affordance::DisableEditing => Some(true),
                Affordance::EnableEditing => Some(false),
                Affordance::PublishEnabled(_) => None,
            })
            .unwrap_or(false)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Affordances for RecordingAffordances {
    fn disable_editing(&self) {
        self.record(Affordance::DisableEditing);
    }

    fn enable_editing(&self) {
        self.record(Affordance::EnableEditing);
    }

    fn set_publish_enabled(&self, enabled: bool) {
        self.record(Affordance::PublishEnabled(enabled));
    }
}
