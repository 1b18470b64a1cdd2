use cgmath::{Quaternion, Rotation, Vector3};

use crate::input_context::{Hand, Handedness, LOCAL_FORWARD};

/// Handle onto the aiming visualization.
pub trait PointerVisual {
    /// 0 hides the pointer, 1 shows it fully
    fn set_visibility(&mut self, visibility: f32);
    /// Distance the pointer extends along the hand's forward direction
    fn set_length(&mut self, length: f32);
    /// Attach to a hand, or detach with `None`. Detaching never destroys the pointer.
    fn set_parent(&mut self, parent: Option<Handedness>);
    /// Track the pose of `handedness` if the pointer is attached to it.
    fn follow(&mut self, handedness: Handedness, hand: &Hand);
}

/// A unit line from the hand origin along its forward axis, scaled to `length`.
#[derive(Clone, Debug, PartialEq)]
pub struct LaserPointer {
    pub alpha: f32,
    visibility: f32,
    length: f32,
    parent: Option<Handedness>,
    anchor: Option<(Vector3<f32>, Quaternion<f32>)>,
}

impl Default for LaserPointer {
    fn default() -> Self {
        Self::new(0.5, 1.0)
    }
}

impl LaserPointer {
    pub fn new(alpha: f32, length: f32) -> Self {
        LaserPointer {
            alpha,
            visibility: 0.0,
            length,
            parent: None,
            anchor: None,
        }
    }

    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility > 0.0
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn parent(&self) -> Option<Handedness> {
        self.parent
    }

    /// World-space start and end of the drawn line, if anything should be drawn.
    pub fn segment(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        if !self.is_visible() || self.parent.is_none() {
            return None;
        }
        let (position, rotation) = self.anchor?;
        let end = position + rotation.rotate_vector(LOCAL_FORWARD) * self.length;
        Some((position, end))
    }
}

impl PointerVisual for LaserPointer {
    fn set_visibility(&mut self, visibility: f32) {
        self.visibility = visibility.clamp(0.0, 1.0);
    }

    fn set_length(&mut self, length: f32) {
        self.length = length;
    }

    fn set_parent(&mut self, parent: Option<Handedness>) {
        if parent != self.parent {
            self.anchor = None;
        }
        if parent.is_none() {
            self.visibility = 0.0;
        }
        self.parent = parent;
    }

    fn follow(&mut self, handedness: Handedness, hand: &Hand) {
        if self.parent == Some(handedness) {
            self.anchor = Some((hand.position, hand.rotation));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, vec3};

    #[test]
    fn test_starts_hidden_and_detached() {
        let pointer = LaserPointer::default();
        assert!(!pointer.is_visible());
        assert_eq!(pointer.parent(), None);
        assert_eq!(pointer.segment(), None);
        assert_eq!(pointer.alpha, 0.5);
    }

    #[test]
    fn test_segment_follows_parent_hand() {
        let mut pointer = LaserPointer::default();
        pointer.set_parent(Some(Handedness::Right));
        pointer.set_length(5.0);
        pointer.set_visibility(1.0);

        let hand = Hand::pointing(vec3(1.0, 1.0, 0.0), vec3(1.0, 0.0, 0.0));
        pointer.follow(Handedness::Right, &hand);
        let (start, end) = pointer.segment().unwrap();
        assert!((start - vec3(1.0, 1.0, 0.0)).magnitude() < 1e-6);
        assert!((end - vec3(6.0, 1.0, 0.0)).magnitude() < 1e-5);

        let other = Hand::pointing(vec3(-1.0, 1.0, 0.0), vec3(0.0, 0.0, -1.0));
        pointer.follow(Handedness::Left, &other);
        let (start, _) = pointer.segment().unwrap();
        assert!((start - vec3(1.0, 1.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_detach_keeps_pointer_alive() {
        let mut pointer = LaserPointer::default();
        pointer.set_parent(Some(Handedness::Right));
        pointer.follow(Handedness::Right, &Hand::pointing(vec3(0.0, 1.0, 0.0), LOCAL_FORWARD));
        pointer.set_visibility(1.0);

        pointer.set_parent(None);

        assert!(!pointer.is_visible());
        assert_eq!(pointer.parent(), None);
        assert_eq!(pointer.segment(), None);

        pointer.set_parent(Some(Handedness::Right));
        pointer.set_visibility(1.0);
        // no pose yet from the new attachment
        assert_eq!(pointer.segment(), None);
    }

    #[test]
    fn test_visibility_is_clamped() {
        let mut pointer = LaserPointer::default();
        pointer.set_visibility(3.0);
        assert_eq!(pointer.visibility(), 1.0);
        pointer.set_visibility(-1.0);
        assert_eq!(pointer.visibility(), 0.0);
    }
}
