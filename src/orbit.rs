use std::f64::consts::PI;

use crate::vec3::Vec3;

///
/// Elliptical orbit in the xz plane with the sun at a focus. Planet
/// position comes from Kepler's equation, E - e sin E = M, solved with a
/// fixed number of Newton steps - plenty for the eccentricities the demo
/// scenes use.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct Orbit {
    pub semi_major: f64,
    pub semi_minor: f64,
    pub angular_rate: f64,
}

const NEWTON_STEPS: usize = 8;

impl Orbit {
    pub fn eccentricity(&self) -> f64 {
        let ratio = self.semi_minor / self.semi_major;

        (1.0 - ratio * ratio).sqrt()
    }

    fn eccentric_anomaly(&self, mean: f64) -> f64 {
        let e = self.eccentricity();
        let mut ecc = mean;

        for _ in 0..NEWTON_STEPS {
            ecc -= (ecc - e * ecc.sin() - mean) / (1.0 - e * ecc.cos());
        }

        ecc
    }

    fn point_at(&self, ecc: f64) -> Vec3<f64> {
        Vec3::new(
            self.semi_major * (ecc.cos() - self.eccentricity()),
            0.0,
            self.semi_minor * ecc.sin(),
        )
    }

    pub fn position(&self, time: f64) -> Vec3<f64> {
        let mean = self.angular_rate * time;

        self.point_at(self.eccentric_anomaly(mean))
    }

    ///
    /// A full turn of the path, sampled for the painted orbit line loop so
    /// the planet always sits on its own trace.
    pub fn path(&self, segments: usize) -> Vec<Vec3<f64>> {
        (0..segments)
            .map(|i| self.point_at(2.0 * PI * i as f64 / segments as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn orbit(semi_major: f64, semi_minor: f64, angular_rate: f64) -> Orbit {
        Orbit {
            semi_major,
            semi_minor,
            angular_rate,
        }
    }

    #[test]
    fn circular_orbit_reduces_to_plain_rotation() {
        let orbit = orbit(7.0, 7.0, 1.0);

        for &t in &[0.0, 0.4, 1.3, 5.9] {
            let p = orbit.position(t);

            assert_relative_eq!(7.0 * t.cos(), p.x, epsilon = 1.0e-12);
            assert_relative_eq!(0.0, p.y);
            assert_relative_eq!(7.0 * t.sin(), p.z, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn newton_solves_keplers_equation() {
        let orbit = orbit(7.0, 5.0, 1.0);
        let e = orbit.eccentricity();

        for &mean in &[0.1, 0.9, 2.2, 3.5, 5.8] {
            let ecc = orbit.eccentric_anomaly(mean);

            assert_relative_eq!(mean, ecc - e * ecc.sin(), epsilon = 1.0e-9);
        }
    }

    #[test]
    fn position_repeats_after_one_period() {
        let orbit = orbit(10.0, 8.0, 0.5);
        let period = 2.0 * PI / 0.5;

        let early = orbit.position(0.7);
        let late = orbit.position(0.7 + period);

        assert_relative_eq!(early.x, late.x, epsilon = 1.0e-6);
        assert_relative_eq!(early.z, late.z, epsilon = 1.0e-6);
    }

    #[test]
    fn path_stays_on_the_ellipse() {
        let orbit = orbit(10.0, 8.0, 0.5);
        let e = orbit.eccentricity();

        for p in orbit.path(100) {
            // Shift back to the ellipse center before the axis check.
            let x = (p.x + 10.0 * e) / 10.0;
            let z = p.z / 8.0;

            assert_relative_eq!(1.0, x * x + z * z, epsilon = 1.0e-12);
        }
    }
}
