//! # Section Stresses
//!
//! Generalized biaxial bending for sections with a full inertia tensor.
//!
//! ```text
//! f = N/A + [(My·Ixx + Mx·Ixy)·x − (Mx·Iyy + My·Ixy)·y] / (Ixx·Iyy − Ixy²)
//! ```
//!
//! `x` and `y` are measured from the centroid. `Mx` is the vertical bending
//! moment (sagging positive) and `My` the lateral moment (positive puts the
//! right side in tension). Compression is negative.
//!
//! At a roll angle θ the vertical moment `Mg` and the lateral moment `Ml`
//! resolve into section axes as
//!
//! ```text
//! Mx = Mg·cosθ − Ml·sinθ
//! My = Mg·sinθ + Ml·cosθ
//! ```

use serde::{Deserialize, Serialize};

use crate::artifact::{Corner, CornerStresses};
use crate::girder::{Point2, SectionProperties, StressPoints};
use crate::strands::{ResolvedFpe, StrandGroup};

/// Axial force and moments acting on a section (N, N·m)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionForces {
    pub n: f64,
    pub mx: f64,
    pub my: f64,
}

impl SectionForces {
    /// Prestress forces from every strand group.
    ///
    /// Each group contributes `N −= F`, `Mx += F·(yps − ytop)` and
    /// `My −= F·(xps − xleft)`.
    pub fn prestress(sample: &ResolvedFpe, props: &SectionProperties) -> Self {
        let mut forces = SectionForces::default();
        for group in StrandGroup::ALL {
            let strand = sample.group(group);
            forces.n -= strand.fpe;
            forces.mx += strand.fpe * (strand.yps - props.ytop);
            forces.my -= strand.fpe * (strand.xps - props.xleft);
        }
        forces
    }

    /// Horizontal compression from inclined lift cables acting at the roll axis
    pub fn cable_compression(h: f64, yra: f64, props: &SectionProperties) -> Self {
        SectionForces {
            n: -h,
            mx: h * (yra - props.ytop),
            my: 0.0,
        }
    }

    /// Vertical and lateral moments resolved into section axes at roll angle `theta`
    pub fn rolled(mg: f64, ml: f64, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        SectionForces {
            n: 0.0,
            mx: mg * cos - ml * sin,
            my: mg * sin + ml * cos,
        }
    }

    pub fn plus(self, other: SectionForces) -> Self {
        SectionForces {
            n: self.n + other.n,
            mx: self.mx + other.mx,
            my: self.my + other.my,
        }
    }
}

/// Stress at a point in section coordinates
pub fn stress_at(forces: &SectionForces, props: &SectionProperties, point: Point2) -> f64 {
    let (a, b) = moment_coefficients(props, point);
    forces.n / props.area + a * forces.mx + b * forces.my
}

/// Stress per unit `Mx` and per unit `My` at a point in section coordinates.
///
/// ```text
/// a = (Ixy·x − Iyy·y)/D,   b = (Ixx·x − Ixy·y)/D
/// ```
pub fn moment_coefficients(props: &SectionProperties, point: Point2) -> (f64, f64) {
    let x = point.x - props.xleft;
    let y = point.y - props.ytop;
    let d = props.inertia_determinant();
    ((props.ixy * x - props.iyy * y) / d, (props.ixx * x - props.ixy * y) / d)
}

/// Stresses at the four stress points
pub fn corner_stresses(forces: &SectionForces, props: &SectionProperties, points: &StressPoints) -> CornerStresses {
    CornerStresses::from_fn(|corner| stress_at(forces, props, corner_point(points, corner)))
}

pub fn corner_point(points: &StressPoints, corner: Corner) -> Point2 {
    match corner {
        Corner::TopLeft => points.top_left,
        Corner::TopRight => points.top_right,
        Corner::BottomLeft => points.bottom_left,
        Corner::BottomRight => points.bottom_right,
    }
}

/// Stress at one corner as a function of roll angle.
///
/// `f(θ) = f0 + a·(Mg·cosθ − Ml·sinθ) + b·(Mg·sinθ + Ml·cosθ)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingStress {
    /// Stress from forces that do not rotate with the girder (Pa)
    pub fixed: f64,
    pub a: f64,
    pub b: f64,
    pub mg: f64,
    pub ml: f64,
}

impl RollingStress {
    pub fn new(fixed: &SectionForces, mg: f64, ml: f64, props: &SectionProperties, point: Point2) -> Self {
        let (a, b) = moment_coefficients(props, point);
        RollingStress {
            fixed: stress_at(fixed, props, point),
            a,
            b,
            mg,
            ml,
        }
    }

    pub fn at(&self, theta: f64) -> f64 {
        let (sin, cos) = theta.sin_cos();
        self.fixed + self.a * (self.mg * cos - self.ml * sin) + self.b * (self.mg * sin + self.ml * cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strands::StrandSample;
    use approx::assert_relative_eq;

    fn rectangle() -> SectionProperties {
        // 0.5 m wide by 1.0 m deep
        let (b, h) = (0.5, 1.0);
        SectionProperties {
            area: b * h,
            ixx: b * h * h * h / 12.0,
            iyy: h * b * b * b / 12.0,
            ixy: 0.0,
            xleft: b / 2.0,
            ytop: -h / 2.0,
            hg: h,
            wtf: b,
            wbf: b,
        }
    }

    #[test]
    fn test_sagging_moment_compresses_top() {
        let props = rectangle();
        let points = StressPoints::computed(&props);
        let forces = SectionForces { n: 0.0, mx: 1000.0, my: 0.0 };
        let f = corner_stresses(&forces, &props, &points);
        let s = props.ixx / 0.5;
        assert_relative_eq!(f.top_left, -1000.0 / s, max_relative = 1e-12);
        assert_relative_eq!(f.bottom_right, 1000.0 / s, max_relative = 1e-12);
    }

    #[test]
    fn test_lateral_moment_tension_right() {
        let props = rectangle();
        let points = StressPoints::computed(&props);
        let forces = SectionForces { n: 0.0, mx: 0.0, my: 500.0 };
        let f = corner_stresses(&forces, &props, &points);
        let s = props.iyy / 0.25;
        assert_relative_eq!(f.top_right, 500.0 / s, max_relative = 1e-12);
        assert_relative_eq!(f.bottom_left, -500.0 / s, max_relative = 1e-12);
    }

    #[test]
    fn test_eccentric_prestress() {
        let props = rectangle();
        let sample = ResolvedFpe {
            x: 0.0,
            straight: StrandSample {
                fpe: 1.0e6,
                xps: 0.25,
                yps: -0.9,
            },
            ..Default::default()
        };
        let forces = SectionForces::prestress(&sample, &props);
        let points = StressPoints::computed(&props);
        let f = corner_stresses(&forces, &props, &points);

        // P/A ± P·e·c/I with e = 0.4 below the centroid
        let (p, e, c) = (1.0e6, 0.4, 0.5);
        assert_relative_eq!(f.top_left, -p / props.area + p * e * c / props.ixx, max_relative = 1e-12);
        assert_relative_eq!(f.bottom_left, -p / props.area - p * e * c / props.ixx, max_relative = 1e-12);
    }

    #[test]
    fn test_product_of_inertia() {
        let props = SectionProperties {
            ixy: 0.002,
            ..rectangle()
        };
        let point = Point2::new(0.5, 0.0);
        let forces = SectionForces { n: 0.0, mx: 100.0, my: 50.0 };
        let (x, y) = (0.25, 0.5);
        let d = props.ixx * props.iyy - props.ixy * props.ixy;
        let expected = ((50.0 * props.ixx + 100.0 * props.ixy) * x - (100.0 * props.iyy + 50.0 * props.ixy) * y) / d;
        assert_relative_eq!(stress_at(&forces, &props, point), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_rolling_stress_matches_rolled_forces() {
        let props = rectangle();
        let point = Point2::new(0.5, -1.0);
        let fixed = SectionForces { n: -2.0e5, mx: -1.0e4, my: 0.0 };
        let rolling = RollingStress::new(&fixed, 3.0e4, 2.0e3, &props, point);
        for theta in [0.0, 0.05, 0.3] {
            let forces = fixed.plus(SectionForces::rolled(3.0e4, 2.0e3, theta));
            assert_relative_eq!(rolling.at(theta), stress_at(&forces, &props, point), max_relative = 1e-12);
        }
    }
}
