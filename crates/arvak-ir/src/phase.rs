//! Exact rotation angles.
//!
//! Angles are stored as rational multiples of π. Measurement-pattern
//! synthesis branches on whether a phase is exactly 0, ½, 1 or 3/2, so a
//! floating-point representation would misclassify Clifford angles after a
//! few additions.

use num::{Integer, Rational64, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

use crate::error::{IrError, IrResult};

/// Largest denominator produced when approximating a float angle.
const MAX_DENOMINATOR: i64 = 1 << 20;

/// Angles of at least this many multiples of π are reduced modulo 2 first.
const MAX_TURNS: f64 = 2_147_483_648.0;

/// A rotation angle in units of π.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Phase(Rational64);

impl Phase {
    /// The zero angle.
    pub fn zero() -> Self {
        Phase(Rational64::zero())
    }

    /// The angle π.
    pub fn pi() -> Self {
        Phase(Rational64::from_integer(1))
    }

    /// The angle `numer/denom · π`.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: i64, denom: i64) -> Self {
        Phase(Rational64::new(numer, denom))
    }

    /// Wrap an existing rational multiple of π.
    pub fn from_ratio(ratio: Rational64) -> Self {
        Phase(ratio)
    }

    /// Approximate an angle given in radians.
    ///
    /// Expands the angle as a continued fraction and stops at the last
    /// convergent whose denominator stays within `2^20`, so angles such as
    /// `PI / 4.0` come back as exactly `1/4` and generic angles get the best
    /// bounded approximation.
    pub fn from_radians(radians: f64) -> IrResult<Self> {
        if !radians.is_finite() {
            return Err(IrError::InvalidAngle(radians));
        }
        let turns = radians / PI;
        let mut magnitude = turns.abs();
        if magnitude >= MAX_TURNS {
            magnitude %= 2.0;
        }
        let (numer, denom) = best_convergent(magnitude);
        let numer = if turns < 0.0 { -numer } else { numer };
        Ok(Phase(Rational64::new(numer, denom)))
    }

    /// Exact sum, reduced into `[0, 2)`.
    ///
    /// Fails with [`IrError::PhaseOverflow`] when the reduced sum has no
    /// 64-bit representation.
    pub fn checked_add(self, rhs: Phase) -> IrResult<Self> {
        let (an, ad) = wide(self.0);
        let (bn, bd) = wide(rhs.0);
        reduce_wide(an * bd + bn * ad, ad * bd).ok_or(IrError::PhaseOverflow(self, rhs))
    }

    /// Exact difference, reduced into `[0, 2)`.
    pub fn checked_sub(self, rhs: Phase) -> IrResult<Self> {
        self.checked_add(-rhs)
    }

    /// The underlying rational.
    pub fn ratio(self) -> Rational64 {
        self.0
    }

    /// The angle in radians.
    pub fn to_radians(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0) * PI
    }

    /// Half of this angle.
    #[must_use]
    pub fn half(self) -> Self {
        Phase(self.0 / 2)
    }

    /// This angle reduced into `[0, 2)`.
    ///
    /// A phase whose reduced form needs more than 64 bits is returned as is;
    /// its denominator already rules out every Clifford angle.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (numer, denom) = wide(self.0);
        reduce_wide(numer, denom).unwrap_or(self)
    }

    /// True for multiples of 2π.
    pub fn is_zero(self) -> bool {
        self.normalized().0.is_zero()
    }

    /// True for 0 and π.
    pub fn is_pauli(self) -> bool {
        self.normalized().0.is_integer()
    }

    /// True for π/2 and 3π/2.
    pub fn is_proper_clifford(self) -> bool {
        let n = self.normalized().0;
        *n.denom() == 2
    }

    /// True for any multiple of π/2.
    pub fn is_clifford(self) -> bool {
        self.is_pauli() || self.is_proper_clifford()
    }

    /// True for odd multiples of π.
    pub fn is_pi(self) -> bool {
        self.normalized() == Phase::pi()
    }
}

fn wide(ratio: Rational64) -> (i128, i128) {
    (i128::from(*ratio.numer()), i128::from(*ratio.denom()))
}

/// `numer/denom` reduced modulo 2 and to lowest terms. `denom > 0`.
fn reduce_wide(numer: i128, denom: i128) -> Option<Phase> {
    let numer = numer.rem_euclid(2 * denom);
    let g = numer.gcd(&denom);
    let numer = i64::try_from(numer / g).ok()?;
    let denom = i64::try_from(denom / g).ok()?;
    Some(Phase(Rational64::new(numer, denom)))
}

/// Last continued-fraction convergent of `x >= 0` with a bounded denominator.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn best_convergent(x: f64) -> (i64, i64) {
    let (mut h_prev, mut h) = (0_i64, 1_i64);
    let (mut k_prev, mut k) = (1_i64, 0_i64);
    let mut rest = x;
    loop {
        let term = rest.floor();
        if term * k as f64 + k_prev as f64 > MAX_DENOMINATOR as f64 {
            break;
        }
        let a = term as i64;
        (h_prev, h) = (h, a * h + h_prev);
        (k_prev, k) = (k, a * k + k_prev);

        let frac = rest - term;
        if frac <= f64::EPSILON || (h as f64 / k as f64 - x).abs() <= f64::EPSILON * x.max(1.0) {
            break;
        }
        rest = 1.0 / frac;
    }
    (h, k)
}

impl From<Rational64> for Phase {
    fn from(ratio: Rational64) -> Self {
        Phase(ratio)
    }
}

/// Exact addition.
///
/// # Panics
///
/// Panics when the exact sum overflows 64 bits; rewrites on diagrams go
/// through [`Phase::checked_add`] instead.
impl Add for Phase {
    type Output = Phase;

    fn add(self, rhs: Phase) -> Phase {
        Phase(self.0 + rhs.0)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, rhs: Phase) {
        self.0 += rhs.0;
    }
}

impl Sub for Phase {
    type Output = Phase;

    fn sub(self, rhs: Phase) -> Phase {
        Phase(self.0 - rhs.0)
    }
}

impl Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Phase {
        Phase(-self.0)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (numer, denom) = (*self.0.numer(), *self.0.denom());
        match (numer, denom) {
            (0, _) => write!(f, "0"),
            (1, 1) => write!(f, "π"),
            (-1, 1) => write!(f, "-π"),
            (n, 1) => write!(f, "{n}π"),
            (1, d) => write!(f, "π/{d}"),
            (-1, d) => write!(f, "-π/{d}"),
            (n, d) => write!(f, "{n}π/{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Phase::new(5, 2).normalized(), Phase::new(1, 2));
        assert_eq!(Phase::new(-1, 2).normalized(), Phase::new(3, 2));
        assert_eq!(Phase::new(-4, 1).normalized(), Phase::zero());
        assert!(Phase::new(2, 1).is_zero());
    }

    #[test]
    fn test_clifford_classes() {
        assert!(Phase::zero().is_pauli());
        assert!(Phase::pi().is_pauli());
        assert!(Phase::new(3, 1).is_pi());
        assert!(Phase::new(1, 2).is_proper_clifford());
        assert!(Phase::new(-1, 2).is_proper_clifford());
        assert!(!Phase::new(1, 4).is_clifford());
        assert!(Phase::new(7, 2).is_clifford());
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let quarter = Phase::new(1, 4);
        let sum = quarter + quarter + quarter + quarter;
        assert_eq!(sum, Phase::pi());
        assert_eq!(-quarter + quarter, Phase::zero());
        assert_eq!(Phase::new(3, 2).half(), Phase::new(3, 4));
    }

    #[test]
    fn test_from_radians() {
        assert_eq!(Phase::from_radians(PI / 4.0).unwrap(), Phase::new(1, 4));
        assert_eq!(Phase::from_radians(-PI / 2.0).unwrap(), Phase::new(-1, 2));
        assert_eq!(Phase::from_radians(0.0).unwrap(), Phase::zero());
        assert!(Phase::from_radians(f64::NAN).is_err());
    }

    #[test]
    fn test_from_radians_generic_angle() {
        let phase = Phase::from_radians(0.1234).unwrap();
        assert!(*phase.ratio().denom() <= MAX_DENOMINATOR);
        assert!((phase.to_radians() - 0.1234).abs() < 1e-5);
        assert!(!phase.is_clifford());

        let negative = Phase::from_radians(-0.1234).unwrap();
        assert_eq!(negative, -phase);
        assert!(Phase::from_radians(1.0e12).is_ok());
    }

    #[test]
    fn test_checked_add_reduces() {
        let sum = Phase::new(3, 2).checked_add(Phase::new(3, 4)).unwrap();
        assert_eq!(sum, Phase::new(1, 4));
        let diff = Phase::new(1, 4).checked_sub(Phase::new(1, 2)).unwrap();
        assert_eq!(diff, Phase::new(7, 4));
    }

    #[test]
    fn test_checked_add_reports_overflow() {
        let primes = [1_048_573, 1_048_571, 1_048_559, 1_048_549];
        let mut acc = Phase::zero();
        let mut failed = false;
        for p in primes {
            match acc.checked_add(Phase::new(1, p)) {
                Ok(sum) => acc = sum,
                Err(IrError::PhaseOverflow(..)) => {
                    failed = true;
                    break;
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
        assert!(failed);
        let tiny = Phase::new(-1, i64::MAX);
        assert_eq!(tiny.normalized(), tiny);
        assert!(!tiny.is_clifford());
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::new(1, 2).to_string(), "π/2");
        assert_eq!(Phase::new(3, 4).to_string(), "3π/4");
        assert_eq!(Phase::pi().to_string(), "π");
        assert_eq!(Phase::zero().to_string(), "0");
    }
}
