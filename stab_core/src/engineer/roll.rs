//! Roll angle searches.
//!
//! Equilibrium and cracking both ask for the smallest angle in a bounded
//! range at which a function first becomes non-negative. The range is
//! scanned in equal steps to bracket the first crossing, then the bracket
//! is refined by bisection.
//!
//! A spring-supported girder can also settle at a negative angle when the
//! lateral loads push it back against the slope; [`AngleSearch::root_nearest_zero`]
//! looks on whichever side of zero `g(0)` points to.

use serde::{Deserialize, Serialize};

use crate::settings::AnalysisSettings;

/// Search controls taken from [`AnalysisSettings`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSearch {
    pub steps: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl From<&AnalysisSettings> for AngleSearch {
    fn from(settings: &AnalysisSettings) -> Self {
        AngleSearch {
            steps: settings.angle_scan_steps,
            tolerance: settings.roll_tolerance,
            max_iterations: settings.max_iterations,
        }
    }
}

impl AngleSearch {
    /// Smallest `θ` in `[0, upper]` with `g(θ) >= 0`.
    ///
    /// `scale` is a magnitude representative of `g`; values of `g(0)` within
    /// a relative `1e-12` of zero count as satisfied so that a balanced
    /// system returns exactly zero. Returns `None` when `g` stays negative
    /// over the whole range.
    pub fn first_crossing<F>(&self, upper: f64, scale: f64, g: F) -> Option<f64>
    where
        F: Fn(f64) -> f64,
    {
        let tiny = 1.0e-12 * scale.abs().max(f64::MIN_POSITIVE);
        let g0 = g(0.0);
        if g0 >= -tiny {
            return Some(0.0);
        }
        if !(upper > 0.0) {
            return None;
        }

        let steps = self.steps.max(1);
        let h = upper / steps as f64;
        let mut lo = 0.0;
        let mut bracket = None;
        for i in 1..=steps {
            let hi = if i == steps { upper } else { h * i as f64 };
            if g(hi) >= 0.0 {
                bracket = Some((lo, hi));
                break;
            }
            lo = hi;
        }

        let (mut lo, mut hi) = bracket?;
        for _ in 0..self.max_iterations {
            if hi - lo <= self.tolerance {
                break;
            }
            let mid = 0.5 * (lo + hi);
            if g(mid) >= 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Some(hi)
    }
}

impl AngleSearch {
    /// Root of an increasing `g` in `[-bound, bound]` closest to zero.
    ///
    /// When `g(0) < 0` this is [`first_crossing`](Self::first_crossing);
    /// when `g(0) > 0` the root lies at a negative angle and the range
    /// `[-bound, 0]` is searched instead.
    pub fn root_nearest_zero<F>(&self, bound: f64, scale: f64, g: F) -> Option<f64>
    where
        F: Fn(f64) -> f64,
    {
        let tiny = 1.0e-12 * scale.abs().max(f64::MIN_POSITIVE);
        if g(0.0) <= tiny {
            return self.first_crossing(bound, scale, g);
        }
        self.first_crossing(bound, scale, |t| -g(-t)).map(|t| -t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn search() -> AngleSearch {
        AngleSearch::from(&AnalysisSettings::default())
    }

    #[test]
    fn test_balanced_returns_zero() {
        assert_eq!(search().first_crossing(1.0, 1.0, |t| t), Some(0.0));
    }

    #[test]
    fn test_linear_crossing() {
        let theta = search().first_crossing(1.0, 1.0, |t| t - 0.3).unwrap();
        assert_relative_eq!(theta, 0.3, epsilon = 1e-8);
    }

    #[test]
    fn test_first_of_several_crossings() {
        // crosses upward at π/6, back down at 5π/6
        let g = |t: f64| t.sin() - 0.5;
        let theta = search().first_crossing(std::f64::consts::PI, 1.0, g).unwrap();
        assert_relative_eq!(theta, std::f64::consts::FRAC_PI_6, epsilon = 1e-8);
    }

    #[test]
    fn test_no_crossing() {
        assert_eq!(search().first_crossing(1.0, 1.0, |t| t - 2.0), None);
    }

    #[test]
    fn test_root_on_negative_side() {
        let theta = search().root_nearest_zero(1.0, 1.0, |t| t + 0.25).unwrap();
        assert_relative_eq!(theta, -0.25, epsilon = 1e-8);
        assert_relative_eq!(search().root_nearest_zero(1.0, 1.0, |t| t - 0.4).unwrap(), 0.4, epsilon = 1e-8);
        assert_eq!(search().root_nearest_zero(1.0, 1.0, |t| t + 2.0), None);
    }
}
