//! Angle and polar-coordinate helpers.

/// Polar coordinates about the image center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarPoint {
    /// Bearing in degrees, normalized to [0, 360).
    pub azimuth_deg: f64,
    /// Distance from the image center in pixels.
    pub distance: f64,
}

/// Wraps an angle in degrees to the range [0, 360).
pub(crate) fn wrap_deg_360(angle_deg: f64) -> f64 {
    let mut wrapped = angle_deg % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Converts a pixel location to polar coordinates about the grid center.
pub fn to_polar(x: usize, y: usize, width: usize, height: usize) -> PolarPoint {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let dx = x as f64 - cx;
    let dy = y as f64 - cy;
    let distance = (dx * dx + dy * dy).sqrt();
    let azimuth_deg = wrap_deg_360(dy.atan2(dx).to_degrees());
    PolarPoint {
        azimuth_deg,
        distance,
    }
}

/// Re-embeds a polar point into the plane as `(r sin a, r cos a)`.
///
/// The embedding reconstructs the physical target position, so points that
/// straddle the 0/360 degree seam stay close to each other.
pub(crate) fn embed_polar(polar: PolarPoint) -> [f64; 2] {
    let (sin, cos) = polar.azimuth_deg.to_radians().sin_cos();
    [polar.distance * sin, polar.distance * cos]
}
