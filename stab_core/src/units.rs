//! # Unit Types
//!
//! The engine stores every quantity in SI base units (m, N, Pa, kg/m³, rad,
//! m/s). The newtypes in this module wrap US customary values for input
//! defaults and display, and convert to and from the base system.
//!
//! ## Example
//!
//! ```rust
//! use stab_core::units::{Feet, Inches, Ksi};
//!
//! let span = Feet(100.0).to_base();
//! assert!((span - 30.48).abs() < 1e-12);
//!
//! let depth = Inches::from_base(1.8288);
//! assert!((depth.0 - 72.0).abs() < 1e-9);
//!
//! let fc = Ksi(7.0).to_base(); // pascals
//! assert!(fc > 48.0e6);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Standard gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.80665;

/// Metres per foot
pub const FOOT: f64 = 0.3048;

/// Metres per inch
pub const INCH: f64 = 0.0254;

/// Newtons per kip
pub const KIP: f64 = 4448.221_615_260_5;

/// Pascals per ksi
pub const KSI: f64 = 6_894_757.293_168_361;

/// Metres per second per mile per hour
pub const MPH: f64 = 0.447_04;

// ============================================================================
// Newtypes
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Area in square inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct In2(pub f64);

/// Second moment of area in inches^4
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct In4(pub f64);

/// Force in kips
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kips(pub f64);

/// Stress in kips per square inch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ksi(pub f64);

/// Moment in kip-feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipFt(pub f64);

/// Unit weight in kips per cubic foot, converted to mass density (kg/m³)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kcf(pub f64);

/// Speed in miles per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mph(pub f64);

/// Rotational stiffness in kip-inches per radian
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipInPerRad(pub f64);

/// Stress coefficient applied to √f'c, in √ksi
///
/// `SqrtKsi(0.24)` multiplied by `sqrt(fc_pa)` yields a stress in pascals
/// once converted with [`SqrtKsi::to_base`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqrtKsi(pub f64);

// ============================================================================
// Conversions (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_unit {
    ($type:ty, $factor:expr) => {
        impl $type {
            /// Conversion factor from this unit to the SI base unit
            pub fn factor() -> f64 {
                $factor
            }

            /// Convert to the SI base unit
            pub fn to_base(self) -> f64 {
                self.0 * Self::factor()
            }

            /// Convert from the SI base unit
            pub fn from_base(value: f64) -> Self {
                Self(value / Self::factor())
            }

            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
    };
}

impl_unit!(Feet, FOOT);
impl_unit!(Inches, INCH);
impl_unit!(In2, INCH * INCH);
impl_unit!(In4, INCH.powi(4));
impl_unit!(Kips, KIP);
impl_unit!(Ksi, KSI);
impl_unit!(KipFt, KIP * FOOT);
impl_unit!(Kcf, KIP / FOOT.powi(3) / GRAVITY);
impl_unit!(Mph, MPH);
impl_unit!(KipInPerRad, KIP * INCH);
impl_unit!(SqrtKsi, KSI.sqrt());

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Comparison helpers
// ============================================================================

/// Default tolerance for change detection and position matching
pub const TOLERANCE: f64 = 1.0e-6;

/// Compare two values within [`TOLERANCE`] (absolute for small magnitudes,
/// relative otherwise).
pub fn is_equal(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= TOLERANCE * scale
}

/// `low <= value <= high` with [`is_equal`] at both ends
pub fn in_range(low: f64, value: f64, high: f64) -> bool {
    (low < value || is_equal(low, value)) && (value < high || is_equal(value, high))
}

/// Linear interpolation of `y` at `x` between `(x1, y1)` and `(x2, y2)`.
///
/// Returns `y1` when the interval has zero width.
pub fn lin_interp(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    if dx.abs() < f64::EPSILON {
        y1
    } else {
        y1 + (y2 - y1) * (x - x1) / dx
    }
}

/// Store `value` in `slot` unless it is already equal. Returns whether the
/// stored value changed.
pub fn assign_if_changed(slot: &mut f64, value: f64) -> bool {
    if is_equal(*slot, value) {
        false
    } else {
        *slot = value;
        true
    }
}

/// [`assign_if_changed`] for values with exact equality
pub fn assign_value<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_conversions() {
        assert_relative_eq!(Feet(10.0).to_base(), 3.048, epsilon = 1e-12);
        assert_relative_eq!(Inches::from_base(0.0254).0, 1.0, epsilon = 1e-12);
        let inches: Inches = Feet(2.0).into();
        assert_eq!(inches.0, 24.0);
    }

    #[test]
    fn test_density_conversion() {
        // 0.150 kcf is about 2403 kg/m³
        let rho = Kcf(0.150).to_base();
        assert_relative_eq!(rho, 2402.77, max_relative = 1e-4);
        assert_relative_eq!(Kcf::from_base(rho).0, 0.150, epsilon = 1e-12);
    }

    #[test]
    fn test_sqrt_ksi_coefficient() {
        // 0.24·√7 ksi expressed in pascals
        let coefficient = SqrtKsi(0.24).to_base();
        let fc = Ksi(7.0).to_base();
        let fr = coefficient * fc.sqrt();
        assert_relative_eq!(Ksi::from_base(fr).0, 0.24 * 7.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_assign_if_changed() {
        let mut value = 1.0;
        assert!(!assign_if_changed(&mut value, 1.0 + 1e-9));
        assert!(assign_if_changed(&mut value, 2.0));
        assert_eq!(value, 2.0);

        let mut flag = false;
        assert!(assign_value(&mut flag, true));
        assert!(!assign_value(&mut flag, true));
    }

    #[test]
    fn test_lin_interp_zero_width() {
        assert_eq!(lin_interp(5.0, 5.0, 1.0, 5.0, 3.0), 1.0);
        assert_relative_eq!(lin_interp(1.5, 1.0, 0.0, 2.0, 10.0), 5.0);
    }

    #[test]
    fn test_serialization() {
        let ft = Feet(12.5);
        let json = serde_json::to_string(&ft).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Feet = serde_json::from_str(&json).unwrap();
        assert_eq!(ft, roundtrip);
    }
}
