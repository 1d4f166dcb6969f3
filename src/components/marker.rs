use bevy_ecs::component::Component;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f32,
    pub longitude: f32,
    pub label: &'static str,
}

/// Tags a hotspot marker entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct MarkerComponent;
