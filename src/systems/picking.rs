use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    // always normalized
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Unprojects a point in normalized device coordinates through the
    /// camera. `view_proj_matrix` must map into wgpu clip space (depth 0..1).
    ///
    /// Returns `None` when the matrix can't be inverted.
    pub fn from_ndc(ndc_x: f32, ndc_y: f32, view_proj_matrix: Matrix4<f32>) -> Option<Self> {
        let inv_view_proj = view_proj_matrix.invert()?;

        let near = inv_view_proj * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        // homogeneous -> cartesian
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        let direction = far - near;
        if direction.magnitude2() == 0.0 {
            return None;
        }
        Some(Self::new(near, direction))
    }

    #[cfg(test)]
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first hit in front of the origin.
    pub fn intersect_sphere(&self, center: Vector3<f32>, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;

        if discriminant < 0.0 {
            return None;
        }

        let discriminant_sqrt = discriminant.sqrt();
        let t1 = -b - discriminant_sqrt;
        let t2 = -b + discriminant_sqrt;

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            // origin is inside the sphere
            Some(t2)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub index: usize,
    pub distance: f32,
}

/// Tests the ray against spheres of `radius` at each of `centers` and
/// returns the closest one, by position in the iterator.
pub fn pick_nearest<I>(ray: &Ray, centers: I, radius: f32) -> Option<PickHit>
where
    I: IntoIterator<Item = Vector3<f32>>,
{
    centers
        .into_iter()
        .enumerate()
        .filter_map(|(index, center)| {
            ray.intersect_sphere(center, radius)
                .map(|distance| PickHit { index, distance })
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::camera::Camera;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn hits_sphere_in_front() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_sphere(Vector3::new(0.0, 0.0, 0.0), 2.0);
        assert_eq!(t, Some(8.0));
        let p = ray.point_at(8.0);
        assert!(close(p.z, 2.0));
    }

    #[test]
    fn misses_sphere_off_axis() {
        let ray = Ray::new(Vector3::new(5.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(ray
            .intersect_sphere(Vector3::new(0.0, 0.0, 0.0), 2.0)
            .is_none());
    }

    #[test]
    fn ignores_sphere_behind_origin() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(ray
            .intersect_sphere(Vector3::new(0.0, 0.0, 0.0), 2.0)
            .is_none());
    }

    #[test]
    fn nearest_of_overlapping_spheres() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let centers = vec![
            Vector3::new(0.0, 0.0, -3.0),
            Vector3::new(0.0, 0.0, 4.0),
            Vector3::new(3.0, 0.0, 0.0),
        ];
        let hit = pick_nearest(&ray, centers, 0.5).unwrap();
        assert_eq!(hit.index, 1);
        assert!(close(hit.distance, 5.5));
    }

    #[test]
    fn nothing_to_pick() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(pick_nearest(&ray, Vec::new(), 0.5).is_none());
    }

    #[test]
    fn center_of_screen_looks_down_the_camera_axis() {
        let camera = Camera::new(1.0);
        let ray = Ray::from_ndc(0.0, 0.0, camera.build_view_projection_matrix()).unwrap();
        assert!(close(ray.direction.x, 0.0));
        assert!(close(ray.direction.y, 0.0));
        assert!(close(ray.direction.z, -1.0));
        // starts on the near plane
        assert!(close(ray.origin.z, 12.0 - 0.1));
    }

    #[test]
    fn top_right_of_screen_points_up_and_right() {
        let camera = Camera::new(16.0 / 9.0);
        let ray = Ray::from_ndc(1.0, 1.0, camera.build_view_projection_matrix()).unwrap();
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.x > ray.direction.y);
    }
}
