//! Pointer drag tracking shared by the drivers
use crate::projection::Camera;

/// Remembers where a drag last was and reports movement deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragTracker {
    last: Option<(f32, f32)>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.last = Some((x, y));
    }

    /// Delta since the previous position, or `None` when no drag is active.
    pub fn move_to(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (px, py) = self.last?;
        self.last = Some((x, y));
        Some((x - px, y - py))
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    /// Feed a pointer move into `camera`, scaled by `degrees_per_unit`.
    /// Returns whether the camera changed.
    pub fn drag_camera(&mut self, camera: &mut Camera, x: f32, y: f32, degrees_per_unit: f32) -> bool {
        match self.move_to(x, y) {
            Some((dx, dy)) => {
                camera.apply_drag(dx * degrees_per_unit, dy * degrees_per_unit);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::RotationState;

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut drag = DragTracker::new();
        assert_eq!(drag.move_to(5.0, 5.0), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_deltas_follow_pointer() {
        let mut drag = DragTracker::new();
        drag.press(10.0, 10.0);
        assert_eq!(drag.move_to(14.0, 7.0), Some((4.0, -3.0)));
        assert_eq!(drag.move_to(15.0, 7.0), Some((1.0, 0.0)));
        drag.release();
        assert_eq!(drag.move_to(20.0, 20.0), None);
    }

    #[test]
    fn test_drag_camera_turns_world() {
        let mut camera = Camera::new();
        let mut drag = DragTracker::new();
        assert!(!drag.drag_camera(&mut camera, 1.0, 1.0, 1.0));

        drag.press(0.0, 0.0);
        assert!(drag.drag_camera(&mut camera, 30.0, 10.0, 1.0));
        assert_eq!(camera.rotation, RotationState::new(10.0, -30.0, 0.0));

        assert!(drag.drag_camera(&mut camera, 31.0, 10.0, 2.0));
        assert_eq!(camera.rotation, RotationState::new(10.0, -32.0, 0.0));
    }
}
