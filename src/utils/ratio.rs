use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use gcd::Gcd;

/// An exact fraction, always kept in lowest terms with a positive denominator.
///
/// Reduced form makes the derived `Eq` and `Hash` structural, which the state
/// deduplication relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ratio {
    num: i128, // Numerator, carries the sign
    den: i128, // Denominator, always > 0
}

impl Ratio {
    pub const ZERO: Ratio = Ratio { num: 0, den: 1 };
    pub const ONE: Ratio = Ratio { num: 1, den: 1 };

    /// Creates a reduced fraction `num / den`.
    ///
    /// # Panics
    /// Panics if `den` is zero.
    pub fn new(num: i128, den: i128) -> Self {
        assert!(den != 0, "ratio with zero denominator");
        let sign = if den < 0 { -1 } else { 1 };
        let divisor = num.unsigned_abs().gcd(den.unsigned_abs()).max(1) as i128;
        Self {
            num: sign * num / divisor,
            den: sign * den / divisor,
        }
    }

    pub fn from_integer(value: i128) -> Self {
        Self { num: value, den: 1 }
    }

    pub fn numer(&self) -> i128 {
        self.num
    }

    pub fn denom(&self) -> i128 {
        self.den
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Numerators of `self` and `other` scaled to their least common
    /// denominator, together with that denominator.
    fn align(&self, other: &Ratio) -> (i128, i128, i128) {
        let divisor = gcd_i128(self.den, other.den);
        let lcm = self.den / divisor * other.den;
        (self.num * (lcm / self.den), other.num * (lcm / other.den), lcm)
    }
}

fn gcd_i128(a: i128, b: i128) -> i128 {
    a.unsigned_abs().gcd(b.unsigned_abs()).max(1) as i128
}

impl Default for Ratio {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<usize> for Ratio {
    fn from(value: usize) -> Self {
        Self::from_integer(value as i128)
    }
}

impl Add for Ratio {
    type Output = Ratio;

    fn add(self, rhs: Ratio) -> Ratio {
        let (lhs, rhs, den) = self.align(&rhs);
        Ratio::new(lhs + rhs, den)
    }
}

impl AddAssign for Ratio {
    fn add_assign(&mut self, rhs: Ratio) {
        *self = *self + rhs;
    }
}

impl Sub for Ratio {
    type Output = Ratio;

    fn sub(self, rhs: Ratio) -> Ratio {
        self + (-rhs)
    }
}

impl Neg for Ratio {
    type Output = Ratio;

    fn neg(self) -> Ratio {
        Ratio {
            num: -self.num,
            den: self.den,
        }
    }
}

impl Mul for Ratio {
    type Output = Ratio;

    fn mul(self, rhs: Ratio) -> Ratio {
        // Cross-reduce before multiplying
        let g1 = gcd_i128(self.num, rhs.den);
        let g2 = gcd_i128(rhs.num, self.den);
        Ratio::new(
            (self.num / g1) * (rhs.num / g2),
            (self.den / g2) * (rhs.den / g1),
        )
    }
}

impl Div for Ratio {
    type Output = Ratio;

    fn div(self, rhs: Ratio) -> Ratio {
        assert!(rhs.num != 0, "ratio division by zero");
        let sign = if rhs.num < 0 { -1 } else { 1 };
        self * Ratio {
            num: sign * rhs.den,
            den: sign * rhs.num,
        }
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so scaling to a common one keeps the order
        let (lhs, rhs, _) = self.align(other);
        lhs.cmp(&rhs)
    }
}

impl Sum for Ratio {
    fn sum<I: Iterator<Item = Ratio>>(iter: I) -> Ratio {
        iter.fold(Ratio::ZERO, |acc, r| acc + r)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
