use cgmath::{Quaternion, Vector2, Vector3, vec2, vec3};
use engine::input_log;

use crate::input_context::{AxisComponent, ButtonComponent, Hand, Handedness, InputContext};

/// Receives controller lifecycle notifications from [`InputSourceRegistry::poll`].
///
/// `controller_removed` is always delivered while the removed source still
/// exists, so anything parented to it can be detached before it is torn down.
pub trait ConnectionListener {
    fn controller_added(&mut self, handedness: Handedness);
    fn controller_removed(&mut self, handedness: Handedness);
}

/// Raw device state as last reported by the XR runtime.
#[derive(Clone, Debug)]
struct InputSource {
    unique_id: String,
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    thumbstick: Vector2<f32>,
    a_pressed: bool,
    // Values handed out by the previous poll, for change detection
    last_thumbstick: Vector2<f32>,
    last_a_pressed: bool,
}

impl InputSource {
    fn new(unique_id: &str) -> Self {
        InputSource {
            unique_id: unique_id.to_string(),
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            thumbstick: vec2(0.0, 0.0),
            a_pressed: false,
            last_thumbstick: vec2(0.0, 0.0),
            last_a_pressed: false,
        }
    }

    fn sample(&mut self) -> Hand {
        let thumbstick = AxisComponent::new(self.thumbstick, self.thumbstick != self.last_thumbstick);
        let a_button = ButtonComponent::new(self.a_pressed, self.a_pressed != self.last_a_pressed);

        self.last_thumbstick = self.thumbstick;
        self.last_a_pressed = self.a_pressed;

        Hand::new(self.position, self.rotation)
            .with_thumbstick(thumbstick)
            .with_a_button(a_button)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PendingEvent {
    Added(Handedness),
    Removed(Handedness),
}

/// Connected controllers, keyed by hand.
///
/// The XR runtime writes into the registry whenever it likes; locomotion only
/// observes it through [`poll`](Self::poll), once per frame, so connection
/// changes never land in the middle of a frame.
#[derive(Default)]
pub struct InputSourceRegistry {
    left: Option<InputSource>,
    right: Option<InputSource>,
    // Sources disconnected since the last poll, kept alive until listeners ran
    retiring: Vec<(Handedness, InputSource)>,
    pending: Vec<PendingEvent>,
}

impl InputSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller. Replaces any controller already bound to the same hand.
    pub fn connect(&mut self, unique_id: &str) -> Handedness {
        let handedness = Handedness::from_unique_id(unique_id);
        if let Some(previous) = self.slot_mut(handedness).take() {
            input_log!(
                DEBUG,
                "{} replaces {} on the {} hand",
                unique_id,
                previous.unique_id,
                handedness
            );
            self.retire(handedness, previous);
        }

        input_log!(DEBUG, "controller connected: {} ({})", unique_id, handedness);
        *self.slot_mut(handedness) = Some(InputSource::new(unique_id));
        self.pending.push(PendingEvent::Added(handedness));
        handedness
    }

    /// Unregister a controller by id. Returns false if no such controller is connected.
    pub fn disconnect(&mut self, unique_id: &str) -> bool {
        let handedness = Handedness::from_unique_id(unique_id);
        let matches = self
            .slot(handedness)
            .is_some_and(|source| source.unique_id == unique_id);
        if !matches {
            return false;
        }

        if let Some(source) = self.slot_mut(handedness).take() {
            input_log!(DEBUG, "controller disconnected: {} ({})", unique_id, handedness);
            self.retire(handedness, source);
        }
        true
    }

    pub fn is_connected(&self, handedness: Handedness) -> bool {
        self.slot(handedness).is_some()
    }

    pub fn set_pose(&mut self, handedness: Handedness, position: Vector3<f32>, rotation: Quaternion<f32>) {
        if let Some(source) = self.slot_mut(handedness) {
            source.position = position;
            source.rotation = rotation;
        }
    }

    pub fn set_thumbstick(&mut self, handedness: Handedness, axes: Vector2<f32>) {
        if let Some(source) = self.slot_mut(handedness) {
            source.thumbstick = axes;
        }
    }

    pub fn set_button(&mut self, handedness: Handedness, pressed: bool) {
        if let Some(source) = self.slot_mut(handedness) {
            source.a_pressed = pressed;
        }
    }

    /// Deliver connection changes to `listener`, then snapshot every connected
    /// controller. `changed` flags compare against the previous poll.
    pub fn poll(&mut self, listener: &mut dyn ConnectionListener) -> InputContext {
        let pending = std::mem::take(&mut self.pending);
        for event in &pending {
            if let PendingEvent::Removed(handedness) = event {
                listener.controller_removed(*handedness);
            }
        }
        // Listeners have detached; the retired sources can go now
        self.retiring.clear();

        for event in &pending {
            if let PendingEvent::Added(handedness) = event {
                if self.is_connected(*handedness) {
                    listener.controller_added(*handedness);
                }
            }
        }

        InputContext {
            left_hand: self.left.as_mut().map(InputSource::sample),
            right_hand: self.right.as_mut().map(InputSource::sample),
        }
    }

    fn retire(&mut self, handedness: Handedness, source: InputSource) {
        // A connect that was never polled needs no removal notice
        let added_index = self
            .pending
            .iter()
            .position(|event| *event == PendingEvent::Added(handedness));
        match added_index {
            Some(index) => {
                self.pending.remove(index);
            }
            None => self.pending.push(PendingEvent::Removed(handedness)),
        }
        self.retiring.push((handedness, source));
    }

    fn slot(&self, handedness: Handedness) -> Option<&InputSource> {
        match handedness {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }

    fn slot_mut(&mut self, handedness: Handedness) -> &mut Option<InputSource> {
        match handedness {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingListener {
        events: Vec<String>,
    }

    impl ConnectionListener for RecordingListener {
        fn controller_added(&mut self, handedness: Handedness) {
            self.events.push(format!("added {}", handedness));
        }

        fn controller_removed(&mut self, handedness: Handedness) {
            self.events.push(format!("removed {}", handedness));
        }
    }

    #[test]
    fn test_connect_reports_once() {
        let mut registry = InputSourceRegistry::new();
        let mut listener = RecordingListener::default();

        assert_eq!(registry.connect("pointer-right"), Handedness::Right);
        let input = registry.poll(&mut listener);
        registry.poll(&mut listener);

        assert_eq!(listener.events, vec!["added right"]);
        assert!(input.right_hand.is_some());
        assert!(input.left_hand.is_none());
    }

    #[test]
    fn test_change_flags_compare_against_previous_poll() {
        let mut registry = InputSourceRegistry::new();
        let mut listener = RecordingListener::default();
        registry.connect("pointer-right");

        registry.set_thumbstick(Handedness::Right, vec2(0.0, -0.5));
        let first = registry.poll(&mut listener).right_hand.unwrap();
        assert!(first.thumbstick.changed);

        let second = registry.poll(&mut listener).right_hand.unwrap();
        assert!(!second.thumbstick.changed);
        assert_eq!(second.thumbstick.axes, vec2(0.0, -0.5));

        registry.set_thumbstick(Handedness::Right, vec2(0.0, 0.0));
        registry.set_button(Handedness::Right, true);
        let third = registry.poll(&mut listener).right_hand.unwrap();
        assert!(third.thumbstick.changed);
        assert!(third.a_button.is_rising_edge());

        let fourth = registry.poll(&mut listener).right_hand.unwrap();
        assert!(fourth.a_button.pressed);
        assert!(!fourth.a_button.is_rising_edge());
    }

    #[test]
    fn test_disconnect_notifies_before_teardown() {
        let mut registry = InputSourceRegistry::new();
        let mut listener = RecordingListener::default();
        registry.connect("pointer-right");
        registry.poll(&mut listener);

        assert!(registry.disconnect("pointer-right"));
        assert!(!registry.is_connected(Handedness::Right));
        assert_eq!(registry.retiring.len(), 1);

        let input = registry.poll(&mut listener);
        assert!(registry.retiring.is_empty());
        assert!(input.right_hand.is_none());
        assert_eq!(listener.events, vec!["added right", "removed right"]);
    }

    #[test]
    fn test_disconnect_unknown_id_is_ignored() {
        let mut registry = InputSourceRegistry::new();
        registry.connect("pointer-right");

        assert!(!registry.disconnect("other-right"));
        assert!(!registry.disconnect("pointer-left"));
        assert!(registry.is_connected(Handedness::Right));
    }

    #[test]
    fn test_connect_then_disconnect_between_polls_is_silent() {
        let mut registry = InputSourceRegistry::new();
        let mut listener = RecordingListener::default();

        registry.connect("pointer-left");
        registry.disconnect("pointer-left");
        registry.poll(&mut listener);

        assert!(listener.events.is_empty());
    }

    #[test]
    fn test_reconnect_replaces_previous_source() {
        let mut registry = InputSourceRegistry::new();
        let mut listener = RecordingListener::default();
        registry.connect("first-right");
        registry.poll(&mut listener);

        registry.connect("second-right");
        registry.poll(&mut listener);

        assert_eq!(
            listener.events,
            vec!["added right", "removed right", "added right"]
        );
        assert!(!registry.disconnect("first-right"));
        assert!(registry.disconnect("second-right"));
    }

    #[test]
    fn test_writes_to_absent_hand_are_ignored() {
        let mut registry = InputSourceRegistry::new();
        let mut listener = RecordingListener::default();

        registry.set_thumbstick(Handedness::Left, vec2(1.0, 1.0));
        registry.set_button(Handedness::Left, true);
        let input = registry.poll(&mut listener);

        assert!(input.left_hand.is_none());
    }
}
