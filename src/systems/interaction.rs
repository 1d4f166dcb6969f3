use cgmath::{Matrix4, Vector3};

use crate::constants::{DRAG_SENSITIVITY, MARKER_RADIUS};

use super::{
    hotspots::{HotspotRegistry, MarkerHandle},
    picking::{pick_nearest, Ray},
};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub origin_x: f32,
    pub origin_y: f32,
    pub delta_x: f32,
    pub delta_y: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerNdc {
    pub x: f32,
    pub y: f32,
}

/// Everything the frame loop needs to know about the pointer. Window events
/// write into it, `State::update` reads it.
#[derive(Debug, Default)]
pub struct InteractionState {
    drag: DragState,
    pointer: PointerNdc,
    // last raw position in window pixels, top-left origin
    cursor: (f32, f32),
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    #[cfg(test)]
    pub fn pointer(&self) -> PointerNdc {
        self.pointer
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.cursor = (x, y);
        if width > 0.0 && height > 0.0 {
            self.pointer = PointerNdc {
                x: (x / width) * 2.0 - 1.0,
                y: -(y / height) * 2.0 + 1.0,
            };
        }

        if self.drag.active {
            self.drag.delta_x = (x - self.drag.origin_x) * DRAG_SENSITIVITY;
            self.drag.delta_y = (y - self.drag.origin_y) * DRAG_SENSITIVITY;
        } else {
            self.drag.delta_x = 0.0;
            self.drag.delta_y = 0.0;
        }
    }

    pub fn pointer_pressed(&mut self) {
        let (x, y) = self.cursor;
        self.drag.active = true;
        self.drag.origin_x = x;
        self.drag.origin_y = y;
    }

    pub fn pointer_released(&mut self) {
        self.drag.active = false;
        self.drag.delta_x = 0.0;
        self.drag.delta_y = 0.0;
    }

    /// Index of the marker under the pointer, nearest first. Only markers
    /// take part; the globe body and stars are never candidates.
    ///
    /// `group_matrix` places marker-local positions in the world.
    pub fn pick(
        &self,
        view_proj_matrix: Matrix4<f32>,
        group_matrix: Matrix4<f32>,
        registry: &HotspotRegistry,
    ) -> Option<usize> {
        let ray = Ray::from_ndc(self.pointer.x, self.pointer.y, view_proj_matrix)?;
        let centers = registry
            .markers()
            .iter()
            .map(|marker| world_position(group_matrix, marker));
        pick_nearest(&ray, centers, MARKER_RADIUS).map(|hit| hit.index)
    }

    /// Label of the hotspot a click at the current pointer lands on, if any.
    pub fn clicked_label(
        &self,
        view_proj_matrix: Matrix4<f32>,
        group_matrix: Matrix4<f32>,
        registry: &HotspotRegistry,
    ) -> Option<&'static str> {
        self.pick(view_proj_matrix, group_matrix, registry)
            .and_then(|index| registry.get(index))
            .map(|marker| marker.label)
    }
}

pub fn world_position(group_matrix: Matrix4<f32>, marker: &MarkerHandle) -> Vector3<f32> {
    (group_matrix * marker.position.extend(1.0)).truncate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{camera::Camera, marker::GeoPoint},
        constants::MARKER_ALTITUDE,
    };
    use cgmath::{SquareMatrix, Vector4};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;

    fn screen_position(view_proj: Matrix4<f32>, p: Vector3<f32>) -> (f32, f32) {
        let clip = view_proj * Vector4::new(p.x, p.y, p.z, 1.0);
        let ndc = clip.truncate() / clip.w;
        ((ndc.x + 1.0) / 2.0 * WIDTH, (1.0 - ndc.y) / 2.0 * HEIGHT)
    }

    fn registry() -> HotspotRegistry {
        HotspotRegistry::new(
            &[
                // faces the camera
                GeoPoint {
                    latitude: 0.0,
                    longitude: -90.0,
                    label: "Front",
                },
                GeoPoint {
                    latitude: 60.0,
                    longitude: -90.0,
                    label: "North",
                },
            ],
            MARKER_ALTITUDE,
        )
    }

    #[test]
    fn pointer_to_ndc() {
        let mut state = InteractionState::new();
        state.pointer_moved(0.0, 0.0, WIDTH, HEIGHT);
        assert_eq!(state.pointer(), PointerNdc { x: -1.0, y: 1.0 });
        state.pointer_moved(WIDTH, HEIGHT, WIDTH, HEIGHT);
        assert_eq!(state.pointer(), PointerNdc { x: 1.0, y: -1.0 });
        state.pointer_moved(400.0, 300.0, WIDTH, HEIGHT);
        assert_eq!(state.pointer(), PointerNdc { x: 0.0, y: 0.0 });
    }

    #[test]
    fn drag_deltas_are_scaled_from_origin() {
        let mut state = InteractionState::new();
        state.pointer_moved(100.0, 100.0, WIDTH, HEIGHT);
        state.pointer_pressed();
        state.pointer_moved(200.0, 50.0, WIDTH, HEIGHT);
        let drag = state.drag();
        assert!(drag.active);
        assert!((drag.delta_x - 0.3).abs() < 1e-6);
        assert!((drag.delta_y + 0.15).abs() < 1e-6);

        // origin stays put for the rest of the drag
        state.pointer_moved(300.0, 100.0, WIDTH, HEIGHT);
        let drag = state.drag();
        assert_eq!((drag.origin_x, drag.origin_y), (100.0, 100.0));
        assert!((drag.delta_x - 0.6).abs() < 1e-6);
        assert!(drag.delta_y.abs() < 1e-6);
    }

    #[test]
    fn deltas_are_zero_whenever_inactive() {
        let mut state = InteractionState::new();
        state.pointer_pressed();
        state.pointer_moved(500.0, 500.0, WIDTH, HEIGHT);
        assert!(state.drag().delta_x != 0.0);

        state.pointer_released();
        let drag = state.drag();
        assert!(!drag.active);
        assert_eq!((drag.delta_x, drag.delta_y), (0.0, 0.0));

        state.pointer_moved(10.0, 700.0, WIDTH, HEIGHT);
        let drag = state.drag();
        assert_eq!((drag.delta_x, drag.delta_y), (0.0, 0.0));
    }

    #[test]
    fn new_press_moves_the_origin() {
        let mut state = InteractionState::new();
        state.pointer_moved(10.0, 20.0, WIDTH, HEIGHT);
        state.pointer_pressed();
        state.pointer_released();
        state.pointer_moved(30.0, 40.0, WIDTH, HEIGHT);
        state.pointer_pressed();
        let drag = state.drag();
        assert_eq!((drag.origin_x, drag.origin_y), (30.0, 40.0));
    }

    #[test]
    fn picks_marker_under_pointer() {
        let camera = Camera::new(WIDTH / HEIGHT);
        let view_proj = camera.build_view_projection_matrix();
        let group = Matrix4::identity();
        let registry = registry();

        for (index, marker) in registry.markers().iter().enumerate() {
            let (x, y) = screen_position(view_proj, world_position(group, marker));
            let mut state = InteractionState::new();
            state.pointer_moved(x, y, WIDTH, HEIGHT);
            assert_eq!(state.pick(view_proj, group, &registry), Some(index));
        }
    }

    #[test]
    fn globe_body_is_not_pickable() {
        let camera = Camera::new(WIDTH / HEIGHT);
        let view_proj = camera.build_view_projection_matrix();
        let registry = registry();

        // below centre the ray meets the globe but no marker
        let mut state = InteractionState::new();
        state.pointer_moved(WIDTH / 2.0, HEIGHT / 2.0 + 100.0, WIDTH, HEIGHT);
        assert_eq!(state.pick(view_proj, Matrix4::identity(), &registry), None);
    }

    #[test]
    fn empty_space_picks_nothing() {
        let camera = Camera::new(WIDTH / HEIGHT);
        let view_proj = camera.build_view_projection_matrix();
        let mut state = InteractionState::new();
        state.pointer_moved(5.0, 5.0, WIDTH, HEIGHT);
        assert_eq!(
            state.pick(view_proj, Matrix4::identity(), &registry()),
            None
        );
    }

    #[test]
    fn click_on_marker_yields_its_label() {
        let camera = Camera::new(WIDTH / HEIGHT);
        let view_proj = camera.build_view_projection_matrix();
        let group = Matrix4::identity();
        let registry = registry();
        let north = registry.markers()[1];
        let (x, y) = screen_position(view_proj, world_position(group, &north));

        let mut state = InteractionState::new();
        state.pointer_moved(x, y, WIDTH, HEIGHT);
        assert_eq!(state.clicked_label(view_proj, group, &registry), Some("North"));
    }

    #[test]
    fn click_on_empty_space_yields_nothing() {
        let camera = Camera::new(WIDTH / HEIGHT);
        let view_proj = camera.build_view_projection_matrix();
        let registry = registry();

        let mut state = InteractionState::new();
        state.pointer_moved(5.0, 5.0, WIDTH, HEIGHT);
        assert_eq!(state.clicked_label(view_proj, Matrix4::identity(), &registry), None);

        // on the globe but away from every marker
        state.pointer_moved(WIDTH / 2.0, HEIGHT / 2.0 + 100.0, WIDTH, HEIGHT);
        assert_eq!(state.clicked_label(view_proj, Matrix4::identity(), &registry), None);
    }

    #[test]
    fn pick_follows_group_rotation() {
        let camera = Camera::new(WIDTH / HEIGHT);
        let view_proj = camera.build_view_projection_matrix();
        let registry = registry();
        let front = registry.markers()[0];
        let (x, y) = screen_position(view_proj, front.position);

        // a quarter turn carries the front marker out from under the pointer
        let group = Matrix4::from_angle_y(cgmath::Rad(std::f32::consts::FRAC_PI_2));
        let mut state = InteractionState::new();
        state.pointer_moved(x, y, WIDTH, HEIGHT);
        assert_eq!(state.pick(view_proj, group, &registry), None);
    }
}
