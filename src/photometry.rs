//! Magnitude and flux-ratio conversions for companion photometry
//!
//! Contrast here always means the flux ratio of a companion to its host
//! star. Instrument data files store either the ratio directly or a
//! magnitude difference; the conversions in this module move between the
//! two. The reflected-light model predicts the flux ratio of a planet
//! shining by scattered starlight.

use std::f64::consts::PI;

/// Jupiter's radius in Earth radii
pub const JUPITER_RADIUS_EARTH_RADII: f64 = 11.209;

/// Earth's radius in astronomical units
const EARTH_RADIUS_AU: f64 = 4.258_75e-5;

/// Convert a magnitude difference to a flux ratio
///
/// Standard Pogson relation: a companion `delta_mag` magnitudes fainter
/// than its host has flux ratio `10^(-delta_mag / 2.5)`.
pub fn contrast_from_delta_mag(delta_mag: f64) -> f64 {
    10f64.powf(-delta_mag / 2.5)
}

/// Convert a flux ratio back to a magnitude difference
pub fn delta_mag_from_contrast(contrast: f64) -> f64 {
    -2.5 * contrast.log10()
}

/// Projected separation in arcseconds for a circular orbit seen at a
/// given distance
///
/// Small-angle approximation: an orbit of 1 au at 1 pc subtends 1 arcsec.
pub fn projected_separation_arcsec(sma_au: f64, distance_pc: f64) -> f64 {
    sma_au / distance_pc
}

/// Lambert-sphere phase function
///
/// `alpha` is the star-planet-observer phase angle in radians. Full phase
/// (alpha = 0) gives 1.0, new phase (alpha = pi) gives 0.0.
pub fn lambert_phase_function(alpha: f64) -> f64 {
    (alpha.sin() + (PI - alpha) * alpha.cos()) / PI
}

/// Reflected-light planet on a circular orbit
///
/// Orbital angle is measured from quadrature, so a face-on orbit
/// (inclination 0) keeps the planet at quadrature for every orbital angle.
#[derive(Debug, Clone)]
pub struct ReflectedLightPlanet {
    /// Semi-major axis in au
    pub sma_au: f64,

    /// Planet radius in Earth radii
    pub radius_earth_radii: f64,

    /// Geometric albedo
    pub albedo: f64,

    /// Orbital angle in degrees, 0 at quadrature
    pub orbital_angle_deg: f64,

    /// Orbital inclination in degrees, 0 is face-on
    pub inclination_deg: f64,
}

impl ReflectedLightPlanet {
    /// Planet placed at quadrature on a face-on circular orbit
    pub fn at_quadrature(sma_au: f64, radius_earth_radii: f64, albedo: f64) -> Self {
        Self {
            sma_au,
            radius_earth_radii,
            albedo,
            orbital_angle_deg: 0.0,
            inclination_deg: 0.0,
        }
    }

    /// Star-planet-observer phase angle in radians
    fn phase_angle(&self) -> f64 {
        let inclination = self.inclination_deg.to_radians();
        let orbital_angle = self.orbital_angle_deg.to_radians();

        // Projection of the orbital position onto the line of sight
        let cos_alpha = inclination.sin() * orbital_angle.cos();
        cos_alpha.clamp(-1.0, 1.0).acos()
    }

    /// Flux ratio of the planet to its host star
    ///
    /// Lambert sphere: `C = A * phi(alpha) * (Rp / a)^2` with the radius
    /// and semi-major axis in the same units.
    pub fn flux_ratio(&self) -> f64 {
        let radius_au = self.radius_earth_radii * EARTH_RADIUS_AU;
        let phase = lambert_phase_function(self.phase_angle());
        self.albedo * phase * (radius_au / self.sma_au).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contrast_from_delta_mag_samples() {
        assert_relative_eq!(contrast_from_delta_mag(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(contrast_from_delta_mag(2.5), 0.1, epsilon = 1e-12);
        assert_relative_eq!(contrast_from_delta_mag(5.0), 0.01, epsilon = 1e-12);
        assert_relative_eq!(contrast_from_delta_mag(25.0), 1e-10, epsilon = 1e-22);
    }

    #[test]
    fn test_contrast_monotonic_decreasing() {
        let mut delta_mag = -5.0;
        let mut previous = contrast_from_delta_mag(delta_mag);
        while delta_mag < 30.0 {
            delta_mag += 0.25;
            let contrast = contrast_from_delta_mag(delta_mag);
            assert!(
                contrast < previous,
                "contrast not decreasing at delta mag {}",
                delta_mag
            );
            previous = contrast;
        }
    }

    #[test]
    fn test_delta_mag_round_trip() {
        for delta_mag in [0.0, 1.3, 7.5, 22.0] {
            let contrast = contrast_from_delta_mag(delta_mag);
            assert_relative_eq!(
                delta_mag_from_contrast(contrast),
                delta_mag,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_phase_function_endpoints() {
        assert_relative_eq!(lambert_phase_function(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(lambert_phase_function(PI), 0.0, epsilon = 1e-12);

        // Quadrature
        assert_relative_eq!(
            lambert_phase_function(PI / 2.0),
            1.0 / PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_face_on_orbit_stays_at_quadrature() {
        for orbital_angle in [0.0, 45.0, 90.0, 270.0] {
            let planet = ReflectedLightPlanet {
                sma_au: 1.0,
                radius_earth_radii: 1.0,
                albedo: 0.3,
                orbital_angle_deg: orbital_angle,
                inclination_deg: 0.0,
            };
            assert_relative_eq!(planet.phase_angle(), PI / 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_earth_flux_ratio() {
        // Earth at quadrature from afar, albedo 0.367
        // (Traub & Oppenheimer, Direct Imaging chapter, Table 3)
        let earth = ReflectedLightPlanet::at_quadrature(1.0, 1.0, 0.367);
        assert_relative_eq!(earth.flux_ratio(), 2.12e-10, epsilon = 2e-12);
    }

    #[test]
    fn test_jupiter_flux_ratio() {
        let jupiter =
            ReflectedLightPlanet::at_quadrature(5.0, JUPITER_RADIUS_EARTH_RADII, 0.52);
        assert_relative_eq!(jupiter.flux_ratio(), 1.51e-9, epsilon = 2e-11);
    }

    #[test]
    fn test_projected_separation() {
        assert_relative_eq!(projected_separation_arcsec(1.0, 1.0), 1.0);
        assert_relative_eq!(
            projected_separation_arcsec(1.334, 3.65),
            0.3655,
            epsilon = 1e-3
        );
    }
}
