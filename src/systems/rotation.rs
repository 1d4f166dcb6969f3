use std::f32::consts::TAU;

use cgmath::{Matrix4, Rad, Vector2};

use crate::constants::{AUTO_ROTATION_STEP, ROTATION_SMOOTHING};

use super::interaction::DragState;

/// Euler rotation (X then Y) shared by the globe and its markers.
///
/// Auto spin goes straight onto the current rotation. Drag then retargets
/// relative to wherever the globe is this frame and the current rotation
/// closes a fixed fraction of the gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeRotation {
    pub current: Vector2<f32>,
    pub target: Vector2<f32>,
    auto_step: f32,
    smoothing: f32,
}

impl GlobeRotation {
    pub fn new(auto_step: f32, smoothing: f32) -> Self {
        Self {
            current: Vector2::new(0.0, 0.0),
            target: Vector2::new(0.0, 0.0),
            auto_step,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    pub fn advance(&mut self, drag: &DragState) {
        self.current.y += self.auto_step;

        // vertical drag tilts about X, horizontal drag spins about Y
        self.target = self.current + Vector2::new(drag.delta_y, drag.delta_x);
        self.current += (self.target - self.current) * self.smoothing;

        // keep the angles small so the per-frame step doesn't vanish in f32
        self.current.x = self.current.x.rem_euclid(TAU);
        self.current.y = self.current.y.rem_euclid(TAU);
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.current.x)) * Matrix4::from_angle_y(Rad(self.current.y))
    }
}

impl Default for GlobeRotation {
    fn default() -> Self {
        Self::new(AUTO_ROTATION_STEP, ROTATION_SMOOTHING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn dragging(delta_x: f32, delta_y: f32) -> DragState {
        DragState {
            active: true,
            delta_x,
            delta_y,
            ..Default::default()
        }
    }

    #[test]
    fn spins_without_input() {
        let mut rotation = GlobeRotation::default();
        for _ in 0..100 {
            rotation.advance(&DragState::default());
        }
        assert!((rotation.current.y - 1.0).abs() < 1e-4);
        assert_eq!(rotation.current.x, 0.0);
    }

    #[test]
    fn drag_moves_part_of_the_way_each_frame() {
        let mut rotation = GlobeRotation::new(0.0, 0.5);
        rotation.advance(&dragging(0.2, 0.4));
        assert!((rotation.current.y - 0.1).abs() < 1e-6);
        assert!((rotation.current.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn drag_and_auto_spin_add_up() {
        let mut auto_only = GlobeRotation::new(0.01, 0.05);
        let mut both = GlobeRotation::new(0.01, 0.05);
        let mut drag_only = GlobeRotation::new(0.0, 0.05);
        for _ in 0..30 {
            auto_only.advance(&DragState::default());
            both.advance(&dragging(0.3, 0.0));
            drag_only.advance(&dragging(0.3, 0.0));
        }
        let sum = auto_only.current.y + drag_only.current.y;
        assert!((both.current.y - sum).abs() < 1e-4);
    }

    #[test]
    fn release_stops_drag_rotation() {
        let mut rotation = GlobeRotation::new(0.0, 0.05);
        for _ in 0..10 {
            rotation.advance(&dragging(0.0, 0.3));
        }
        let tilt = rotation.current.x;
        assert!(tilt > 0.0);
        for _ in 0..10 {
            rotation.advance(&DragState::default());
        }
        assert_eq!(rotation.current.x, tilt);
    }

    #[test]
    fn long_uptime_keeps_spinning() {
        let mut rotation = GlobeRotation::default();
        rotation.current.y = 262_144.0;
        rotation.advance(&DragState::default());
        let start = rotation.current.y;
        assert!(start < TAU);

        for _ in 0..10 {
            let before = rotation.current.y;
            rotation.advance(&DragState::default());
            let step = (rotation.current.y - before).rem_euclid(TAU);
            assert!((step - AUTO_ROTATION_STEP).abs() < 1e-5);
        }
    }

    #[test]
    fn wrapping_leaves_the_matrix_alone() {
        let mut wrapped = GlobeRotation::new(0.0, 0.0);
        wrapped.current = Vector2::new(0.3 + TAU, 1.2 + 2.0 * TAU);
        let unwrapped = wrapped.matrix();
        wrapped.advance(&DragState::default());
        assert!(wrapped.current.x < TAU && wrapped.current.y < TAU);

        let a: [[f32; 4]; 4] = unwrapped.into();
        let b: [[f32; 4]; 4] = wrapped.matrix().into();
        for (col_a, col_b) in a.iter().zip(b.iter()) {
            for (x, y) in col_a.iter().zip(col_b.iter()) {
                assert!((x - y).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn matrix_is_identity_at_rest() {
        let rotation = GlobeRotation::default();
        assert_eq!(rotation.matrix(), Matrix4::identity());
    }

    #[test]
    fn quarter_turn_about_y() {
        let mut rotation = GlobeRotation::new(std::f32::consts::FRAC_PI_2, 0.0);
        rotation.advance(&DragState::default());
        let p = rotation.matrix() * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }
}
