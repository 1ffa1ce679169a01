//! Typed commands and notifications
//!
//! `ViewerCommand` is the closed set of user intents the UI layer can send.
//! `ViewerEvent` is the closed set of state-change notifications, delivered
//! synchronously by an `EventBus`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;

use crate::camera::CameraMode;
use crate::lighting::LightRole;

/// State-change notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewerEvent {
    /// The active material changed
    #[serde(rename = "material_changed")]
    MaterialChanged { id: String },
    /// An effect was added to or removed from the stack
    #[serde(rename = "effects_changed")]
    EffectsChanged { active: Vec<String> },
    /// An effect was refused by the budget check
    #[serde(rename = "budget_blocked")]
    BudgetBlocked {
        effect_id: String,
        reason: String,
        total_cost: Option<f32>,
    },
    #[serde(rename = "wireframe_changed")]
    WireframeChanged { enabled: bool },
    #[serde(rename = "camera_mode_changed")]
    CameraModeChanged { mode: CameraMode },
    /// A lighting preset was applied
    #[serde(rename = "lighting_changed")]
    LightingChanged { preset: String },
    #[serde(rename = "light_intensity_changed")]
    LightIntensityChanged { role: LightRole, value: f32 },
    /// The stored preset list changed
    #[serde(rename = "presets_changed")]
    PresetsChanged { count: usize },
    #[serde(rename = "preset_applied")]
    PresetApplied { name: String },
}

/// User intent dispatched through `Viewer::dispatch`
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    // Material and effect commands
    ApplyMaterial { id: String },
    CycleMaterial { step: i32 },
    SetMaterialParameter { key: String, value: f32 },
    ToggleEffect { id: String },
    SetEffectParameter { id: String, key: String, value: f32 },
    ToggleWireframe,

    // Camera commands
    SetCameraMode { mode: CameraMode },
    SetCameraSpeed { speed: f32 },
    SetCameraFov { fov: f32 },
    OrbitCamera { delta_yaw: f32, delta_pitch: f32 },
    DollyCamera { delta: f32 },
    FitCamera,
    ResetCamera,

    // Lighting commands
    ApplyLightingPreset { id: String },
    SetLightIntensity { role: LightRole, value: f32 },

    // Preset commands
    SavePreset { name: String },
    ApplyPreset { timestamp: i64 },
    DeletePreset { timestamp: i64 },
    ImportPreset { json: String },

    // Viewport commands
    Resize { width: u32, height: u32 },
}

/// Handle returned by `EventBus::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&ViewerEvent)>;

/// Synchronous publish/subscribe mediator
///
/// Events emitted from inside a subscriber are queued and delivered after the
/// current event has reached every subscriber, so delivery never recurses.
#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    pending: RefCell<VecDeque<ViewerEvent>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for every event
    pub fn subscribe(&self, subscriber: impl Fn(&ViewerEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(subscriber)));
        id
    }

    /// Remove a subscriber; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver an event to every subscriber
    pub fn emit(&self, event: ViewerEvent) {
        tracing::trace!(?event, "Emitting event");
        self.pending.borrow_mut().push_back(event);
        if self.dispatching.get() {
            return;
        }

        self.dispatching.set(true);
        let _reset = DispatchGuard(&self.dispatching);
        loop {
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let subscribers: Vec<Subscriber> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, s)| Rc::clone(s))
                .collect();
            for subscriber in subscribers {
                subscriber(&event);
            }
        }
    }
}

/// Clears the dispatching flag even when a subscriber panics
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
