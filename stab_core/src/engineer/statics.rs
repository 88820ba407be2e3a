//! Girder Statics
//!
//! Vertical moments and lateral deflections of a girder resting on two
//! supports with overhangs. Loads are superposed; every load knows its own
//! resultant and its moment about a section.
//!
//! ## Sign Convention
//! - Loads: positive downward (or in the direction of the lateral load)
//! - Moment: positive sagging (tension on the bottom fiber)
//! - Deflection: positive in the direction of the load
//!
//! ## Supports
//! ```text
//!        a                                        b
//!   |<------>|                               |<------>|
//!   ==========================================================
//!            ^                               ^
//!           xl                              xr = L - b
//! ```

use serde::{Deserialize, Serialize};

use crate::girder::{Face, Girder};
use crate::units::{is_equal, lin_interp, GRAVITY};

/// A single load applied to the girder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GirderLoad {
    /// Concentrated load (N) at `x` (m from the left end)
    Point { p: f64, x: f64 },

    /// Linearly varying distributed load (N/m) from `x_start` to `x_end`
    Distributed {
        x_start: f64,
        x_end: f64,
        w_start: f64,
        w_end: f64,
    },
}

impl GirderLoad {
    pub fn point(p: f64, x: f64) -> Self {
        GirderLoad::Point { p, x }
    }

    pub fn distributed(x_start: f64, x_end: f64, w_start: f64, w_end: f64) -> Self {
        GirderLoad::Distributed {
            x_start,
            x_end,
            w_start,
            w_end,
        }
    }

    /// Resultant of the load (N)
    pub fn resultant(&self) -> f64 {
        match *self {
            GirderLoad::Point { p, .. } => p,
            GirderLoad::Distributed {
                x_start,
                x_end,
                w_start,
                w_end,
            } => 0.5 * (w_start + w_end) * (x_end - x_start),
        }
    }

    /// First moment of the load about the left end (N·m)
    pub fn first_moment(&self) -> f64 {
        match *self {
            GirderLoad::Point { p, x } => p * x,
            GirderLoad::Distributed {
                x_start,
                x_end,
                w_start,
                w_end,
            } => {
                // trapezoid split into a uniform block and a triangle
                let l = x_end - x_start;
                let uniform = w_start * l * (x_start + l / 2.0);
                let triangle = 0.5 * (w_end - w_start) * l * (x_start + 2.0 * l / 3.0);
                uniform + triangle
            }
        }
    }

    /// Moment about `x` of the part of the load lying left of `x`.
    ///
    /// ```text
    /// ∫[a, min(x,b)] w(s)·(x − s) ds
    /// ```
    pub fn moment_left_of(&self, x: f64) -> f64 {
        match *self {
            GirderLoad::Point { p, x: xp } => {
                if xp < x {
                    p * (x - xp)
                } else {
                    0.0
                }
            }
            GirderLoad::Distributed {
                x_start,
                x_end,
                w_start,
                w_end,
            } => {
                if x <= x_start {
                    return 0.0;
                }
                let l = x_end - x_start;
                if l <= 0.0 {
                    return 0.0;
                }
                let k = (w_end - w_start) / l;
                let c = x.min(x_end) - x_start;
                let d = x - x_start;
                w_start * (d * c - c * c / 2.0) + k * (d * c * c / 2.0 - c * c * c / 3.0)
            }
        }
    }

    /// Intensity of a distributed load at `x` (N/m); zero for point loads
    pub fn intensity_at(&self, x: f64) -> f64 {
        match *self {
            GirderLoad::Point { .. } => 0.0,
            GirderLoad::Distributed {
                x_start,
                x_end,
                w_start,
                w_end,
            } => {
                if x < x_start || x > x_end {
                    0.0
                } else {
                    lin_interp(x, x_start, w_start, x_end, w_end)
                }
            }
        }
    }
}

/// Girder on two supports with superposed loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderStatics {
    /// Girder length (m)
    pub length: f64,
    /// Left support, measured from the left end (m)
    pub left_support: f64,
    /// Right support, measured from the left end (m)
    pub right_support: f64,
    pub loads: Vec<GirderLoad>,
}

impl GirderStatics {
    /// Create statics for supports at `a` from the left end and `b` from the right end
    pub fn new(length: f64, a: f64, b: f64) -> Self {
        debug_assert!(a + b < length, "supports must leave a positive span");
        GirderStatics {
            length,
            left_support: a,
            right_support: length - b,
            loads: Vec::new(),
        }
    }

    /// Self-weight of the girder plus its additional point loads.
    ///
    /// `w = A·ρ·g`, linear within each section.
    pub fn self_weight(girder: &Girder, density: f64, a: f64, b: f64) -> Self {
        let mut statics = GirderStatics::new(girder.girder_length(), a, b);
        let mut x = 0.0;
        for section in girder.sections() {
            let w_start = section.start.area * density * GRAVITY;
            let w_end = section.end.area * density * GRAVITY;
            statics.add_load(GirderLoad::distributed(x, x + section.length, w_start, w_end));
            x += section.length;
        }
        for load in girder.point_loads() {
            statics.add_load(GirderLoad::point(load.p, load.x));
        }
        statics
    }

    /// Lateral wind load `p·Hg` acting on the girder depth
    pub fn wind(girder: &Girder, pressure: f64, a: f64, b: f64) -> Self {
        let mut statics = GirderStatics::new(girder.girder_length(), a, b);
        let mut x = 0.0;
        for section in girder.sections() {
            statics.add_load(GirderLoad::distributed(
                x,
                x + section.length,
                pressure * section.start.hg,
                pressure * section.end.hg,
            ));
            x += section.length;
        }
        statics
    }

    pub fn add_load(&mut self, load: GirderLoad) {
        self.loads.push(load);
    }

    /// Span between the supports (m)
    pub fn span(&self) -> f64 {
        self.right_support - self.left_support
    }

    /// Sum of all loads (N)
    pub fn total_load(&self) -> f64 {
        self.loads.iter().map(GirderLoad::resultant).sum()
    }

    /// Support reactions `(left, right)`, positive upward
    pub fn reactions(&self) -> (f64, f64) {
        let total = self.total_load();
        let first_moment: f64 = self.loads.iter().map(GirderLoad::first_moment).sum();
        let right = (first_moment - total * self.left_support) / self.span();
        (total - right, right)
    }

    /// Bending moment at `x` (N·m, sagging positive)
    pub fn moment_at(&self, x: f64) -> f64 {
        let (left, right) = self.reactions();
        self.moment_with_reactions(x, left, right)
    }

    fn moment_with_reactions(&self, x: f64, left: f64, right: f64) -> f64 {
        let mut m = 0.0;
        if x > self.left_support {
            m += left * (x - self.left_support);
        }
        if x > self.right_support {
            m += right * (x - self.right_support);
        }
        m - self
            .loads
            .iter()
            .map(|load| load.moment_left_of(x))
            .sum::<f64>()
    }

    /// Moments at each position
    pub fn moments(&self, positions: &[f64]) -> Vec<f64> {
        let (left, right) = self.reactions();
        positions
            .iter()
            .map(|&x| self.moment_with_reactions(x, left, right))
            .collect()
    }

    /// Distributed load intensity at `x` (N/m)
    pub fn intensity_at(&self, x: f64) -> f64 {
        self.loads.iter().map(|load| load.intensity_at(x)).sum()
    }

    fn point_loads(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.loads.iter().filter_map(|load| match *load {
            GirderLoad::Point { p, x } => Some((x, p)),
            GirderLoad::Distributed { .. } => None,
        })
    }
}

/// Sweep and camber offset factor.
///
/// Fraction of the midspan offset that acts at the roll axis, for a girder
/// supported `a` and `b` from its ends.
///
/// ```text
/// FOo = 2/3 − 2·[a(L−a) + b(L−b)] / L²
/// ```
pub fn offset_factor(length: f64, a: f64, b: f64) -> f64 {
    2.0 / 3.0 - 2.0 * (a * (length - a) + b * (length - b)) / (length * length)
}

// ============================================================================
// Lateral deflection
// ============================================================================

/// Lateral deflection sampled on an integration mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionField {
    pub x: Vec<f64>,
    /// Deflection relative to the chord through the supports (m)
    pub v: Vec<f64>,
}

/// Integration mesh: even segments plus supports, section faces and point loads
pub fn deflection_mesh(girder: &Girder, statics: &GirderStatics, segments: usize) -> Vec<f64> {
    let length = statics.length;
    let mut mesh: Vec<f64> = (0..=segments)
        .map(|i| length * i as f64 / segments as f64)
        .collect();
    mesh.push(statics.left_support);
    mesh.push(statics.right_support);

    let mut x = 0.0;
    for section in girder.sections() {
        mesh.push(x);
        x += section.length;
    }
    mesh.extend(statics.point_loads().map(|(x, _)| x));

    sort_and_dedup(&mut mesh);
    mesh.retain(|x| (0.0..=length).contains(x) || is_equal(*x, length));
    mesh
}

/// Sort ascending and drop positions equal within tolerance
pub fn sort_and_dedup(positions: &mut Vec<f64>) {
    positions.sort_by(|a, b| a.total_cmp(b));
    positions.dedup_by(|a, b| is_equal(*a, *b));
}

impl DeflectionField {
    /// Deflection of the girder bending about its weak axis under the
    /// moments of `statics`.
    ///
    /// Curvature `κ = M/(E·Iyy_eff)` is taken as linear between mesh nodes
    /// and integrated twice; the result is corrected so the deflection is
    /// zero at both supports.
    pub fn lateral(girder: &Girder, statics: &GirderStatics, modulus: f64, mesh: &[f64]) -> Self {
        let moments = statics.moments(mesh);
        let n = mesh.len();

        // curvature at each node, using the face belonging to the interval
        let curvature = |i: usize, face: Face| {
            let props = girder.section_properties(mesh[i], face);
            moments[i] / (modulus * props.effective_iyy())
        };

        let mut v = vec![0.0; n];
        let mut theta = 0.0;
        for i in 0..n.saturating_sub(1) {
            let h = mesh[i + 1] - mesh[i];
            let k0 = curvature(i, Face::Start);
            let k1 = curvature(i + 1, Face::End);
            v[i + 1] = v[i] + h * theta - h * h * (2.0 * k0 + k1) / 6.0;
            theta -= h * (k0 + k1) / 2.0;
        }

        let node = |x: f64| mesh.iter().position(|m| is_equal(*m, x)).unwrap_or(0);
        let (il, ir) = (node(statics.left_support), node(statics.right_support));
        let (xl, vl) = (mesh[il], v[il]);
        let (xr, vr) = (mesh[ir], v[ir]);
        for (vi, &xi) in v.iter_mut().zip(mesh) {
            *vi -= lin_interp(xi, xl, vl, xr, vr);
        }

        DeflectionField { x: mesh.to_vec(), v }
    }

    /// Average deflection weighted by the load distribution of `loading`.
    ///
    /// ```text
    /// z = [∫ w(x)·v(x) dx + Σ P·v(Xp)] / W
    /// ```
    pub fn weighted_average(&self, loading: &GirderStatics) -> f64 {
        let total = loading.total_load();
        if total == 0.0 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..self.x.len().saturating_sub(1) {
            let (x0, x1) = (self.x[i], self.x[i + 1]);
            let h = x1 - x0;
            // evaluate the intensity just inside the interval so jumps at faces are respected
            let eps = h * 1.0e-9;
            let w0 = loading.intensity_at(x0 + eps);
            let w1 = loading.intensity_at(x1 - eps);
            sum += 0.5 * h * (w0 * self.v[i] + w1 * self.v[i + 1]);
        }
        for (xp, p) in loading.point_loads() {
            sum += p * self.at(xp);
        }
        sum / total
    }

    /// Deflection at `x`, interpolated between mesh nodes
    pub fn at(&self, x: f64) -> f64 {
        match self.x.iter().position(|m| *m >= x || is_equal(*m, x)) {
            Some(0) => self.v.first().copied().unwrap_or(0.0),
            Some(i) => lin_interp(x, self.x[i - 1], self.v[i - 1], self.x[i], self.v[i]),
            None => self.v.last().copied().unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::girder::SectionProperties;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_load_simple_span() {
        let mut statics = GirderStatics::new(10.0, 0.0, 0.0);
        statics.add_load(GirderLoad::distributed(0.0, 10.0, 2.0, 2.0));

        let (left, right) = statics.reactions();
        assert_relative_eq!(left, 10.0, epsilon = 1e-12);
        assert_relative_eq!(right, 10.0, epsilon = 1e-12);
        // wL²/8
        assert_relative_eq!(statics.moment_at(5.0), 25.0, epsilon = 1e-12);
        assert_relative_eq!(statics.moment_at(10.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overhang_moments() {
        let (length, a) = (30.0, 5.0);
        let w = 3.0;
        let mut statics = GirderStatics::new(length, a, a);
        statics.add_load(GirderLoad::distributed(0.0, length, w, w));

        // cantilever moment at the support
        assert_relative_eq!(statics.moment_at(a), -w * a * a / 2.0, epsilon = 1e-9);
        // midspan: wL(L/4 − a)/2 with L the total length
        let expected = w * length / 2.0 * (length / 4.0 - a);
        assert_relative_eq!(statics.moment_at(length / 2.0), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_point_load_reactions() {
        let mut statics = GirderStatics::new(10.0, 0.0, 0.0);
        statics.add_load(GirderLoad::point(100.0, 2.5));
        let (left, right) = statics.reactions();
        assert_relative_eq!(left, 75.0, epsilon = 1e-12);
        assert_relative_eq!(right, 25.0, epsilon = 1e-12);
        assert_relative_eq!(statics.moment_at(2.5), 187.5, epsilon = 1e-9);
    }

    #[test]
    fn test_triangular_load_resultant() {
        let load = GirderLoad::distributed(0.0, 6.0, 0.0, 4.0);
        assert_relative_eq!(load.resultant(), 12.0);
        // centroid at 4.0
        assert_relative_eq!(load.first_moment(), 48.0, epsilon = 1e-12);
        // entire load left of x = 10: 12·(10 − 4)
        assert_relative_eq!(load.moment_left_of(10.0), 72.0, epsilon = 1e-12);
    }

    #[test]
    fn test_offset_factor() {
        assert_relative_eq!(offset_factor(100.0, 0.0, 0.0), 2.0 / 3.0);
        let f = offset_factor(100.0, 10.0, 10.0);
        assert_relative_eq!(f, 2.0 / 3.0 - 2.0 * 2.0 * 900.0 / 10_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_span_deflection_matches_closed_form() {
        let props = SectionProperties::default();
        let mut girder = Girder::new();
        girder.add_section(30.0, props, props);

        let w = 10_000.0;
        let mut statics = GirderStatics::new(30.0, 0.0, 0.0);
        statics.add_load(GirderLoad::distributed(0.0, 30.0, w, w));

        let e = 30.0e9;
        let mesh = deflection_mesh(&girder, &statics, 200);
        let field = DeflectionField::lateral(&girder, &statics, e, &mesh);

        // 5wL⁴/(384EI)
        let expected = 5.0 * w * 30.0_f64.powi(4) / (384.0 * e * props.iyy);
        assert_relative_eq!(field.at(15.0), expected, max_relative = 1e-3);
        assert_relative_eq!(field.at(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(field.at(30.0), 0.0, epsilon = 1e-9);
    }
}
