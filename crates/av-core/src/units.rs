//! Angle conversions backed by uom.

use uom::si::f64::Angle;

#[inline]
fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

/// Convert a slope expressed per degree into the same slope per radian.
#[inline]
pub fn per_degree_to_per_radian(slope_per_deg: f64) -> f64 {
    use uom::si::angle::radian;
    slope_per_deg / deg(1.0).get::<radian>()
}

/// Tangent of an angle given in degrees.
#[inline]
pub fn tan_deg(v: f64) -> f64 {
    use uom::si::angle::radian;
    deg(v).get::<radian>().tan()
}

/// Arc tangent, returned in degrees.
#[inline]
pub fn atan_deg(v: f64) -> f64 {
    use uom::si::angle::degree;
    rad(v.atan()).get::<degree>()
}
