use crate::{components::marker::GeoPoint, constants::MARKER_ALTITUDE};

use super::geospatial::coordinates::CoordinatesSystem;

pub const HOTSPOTS: [GeoPoint; 3] = [
    GeoPoint {
        latitude: 40.7128,
        longitude: -74.0060,
        label: "New York",
    },
    GeoPoint {
        latitude: 51.5074,
        longitude: -0.1278,
        label: "London",
    },
    GeoPoint {
        latitude: 35.6895,
        longitude: 139.6917,
        label: "Tokyo",
    },
];

/// A hotspot placed on the globe. `position` is in the globe group's local
/// space, so it never changes while the group rotates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerHandle {
    pub label: &'static str,
    pub position: cgmath::Vector3<f32>,
}

/// Markers in the same order as the points they were built from.
pub struct HotspotRegistry {
    markers: Vec<MarkerHandle>,
}

impl HotspotRegistry {
    pub fn new(points: &[GeoPoint], altitude: f32) -> Self {
        let markers = points
            .iter()
            .map(|point| {
                let [x, y, z] = CoordinatesSystem::lat_lon_to_cartesian(
                    point.latitude,
                    point.longitude,
                    altitude,
                );
                MarkerHandle {
                    label: point.label,
                    position: cgmath::Vector3::new(x, y, z),
                }
            })
            .collect();
        Self { markers }
    }

    pub fn markers(&self) -> &[MarkerHandle] {
        &self.markers
    }

    pub fn get(&self, index: usize) -> Option<&MarkerHandle> {
        self.markers.get(index)
    }
}

impl Default for HotspotRegistry {
    fn default() -> Self {
        Self::new(&HOTSPOTS, MARKER_ALTITUDE)
    }
}
