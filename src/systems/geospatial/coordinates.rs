pub struct CoordinatesSystem {}

impl CoordinatesSystem {
    /// Maps a geographic coordinate onto the surface of a sphere centred at
    /// the origin with +Y through the north pole.
    ///
    /// Longitude is offset by 180° and x is mirrored so that the result lines
    /// up with the UVs produced by `MeshSystem::generate_sphere_mesh`, where
    /// `u = 0` is the antimeridian.
    pub fn lat_lon_to_cartesian(lat: f32, lon: f32, radius: f32) -> [f32; 3] {
        let phi = (90.0 - lat).to_radians();
        let theta = (lon + 180.0).to_radians();

        let x = -radius * phi.sin() * theta.cos();
        let y = radius * phi.cos();
        let z = radius * phi.sin() * theta.sin();

        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn length(p: [f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn equator_prime_meridian() {
        let [x, y, z] = CoordinatesSystem::lat_lon_to_cartesian(0.0, 0.0, 5.1);

        // phi = 90deg, theta = 180deg
        let phi = std::f32::consts::FRAC_PI_2;
        let theta = std::f32::consts::PI;
        assert!((x - (-5.1 * phi.sin() * theta.cos())).abs() < EPSILON);
        assert!((y - 5.1 * phi.cos()).abs() < EPSILON);
        assert!((z - 5.1 * phi.sin() * theta.sin()).abs() < EPSILON);

        assert!((x - 5.1).abs() < EPSILON);
        assert!(y.abs() < EPSILON);
        assert!(z.abs() < EPSILON);
    }

    #[test]
    fn north_pole_ignores_longitude() {
        for lon in [-180.0, -74.006, 0.0, 45.0, 139.6917, 180.0] {
            let [x, y, z] = CoordinatesSystem::lat_lon_to_cartesian(90.0, lon, 3.0);
            assert!(x.abs() < EPSILON, "x = {x} at lon {lon}");
            assert!((y - 3.0).abs() < EPSILON, "y = {y} at lon {lon}");
            assert!(z.abs() < EPSILON, "z = {z} at lon {lon}");
        }
    }

    #[test]
    fn south_pole() {
        let [x, y, z] = CoordinatesSystem::lat_lon_to_cartesian(-90.0, 12.0, 2.0);
        assert!(x.abs() < EPSILON);
        assert!((y + 2.0).abs() < EPSILON);
        assert!(z.abs() < EPSILON);
    }

    #[test]
    fn points_stay_on_the_sphere() {
        for (lat, lon) in [(40.7128, -74.006), (-33.8688, 151.2093), (0.0, 90.0)] {
            let p = CoordinatesSystem::lat_lon_to_cartesian(lat, lon, 7.5);
            assert!((length(p) - 7.5).abs() < 1e-4);
        }
    }

    #[test]
    fn eastern_hemisphere_has_negative_z() {
        // lon 90 -> theta 270deg, sin = -1
        let [x, _, z] = CoordinatesSystem::lat_lon_to_cartesian(0.0, 90.0, 1.0);
        assert!(x.abs() < EPSILON);
        assert!((z + 1.0).abs() < EPSILON);
    }
}
