//! The numeric key that orders members of the hierarchy

use std::cmp::Ordering;
use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

/// A member's rank: an `f64` with a total order
///
/// Ordering follows IEEE 754 `totalOrder` ([`f64::total_cmp`]), so every value, including
/// `-0.0` and NaN, has a well-defined place in the tree. Two ranks are equal only if they
/// compare `Equal` under that order.
#[derive(Debug, Clone, Copy)]
pub struct Rank(f64);

impl Rank {
    pub fn new(value: f64) -> Self {
        Rank(value)
    }

    /// The wrapped value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Rank {
    fn from(value: f64) -> Self {
        Rank(value)
    }
}

impl From<i32> for Rank {
    fn from(value: i32) -> Self {
        Rank(f64::from(value))
    }
}

impl FromStr for Rank {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Honour `{:.3}` and friends so callers can pick the precision
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn test_total_order() {
        assert!(Rank::from(-0.0) < Rank::from(0.0));
        assert!(Rank::from(1.5) < Rank::from(2.0));
        assert_eq!(Rank::from(f64::NAN), Rank::from(f64::NAN));
        assert!(Rank::from(f64::INFINITY) < Rank::from(f64::NAN));
    }

    #[test]
    fn test_parse_and_display() {
        let rank: Rank = " 12.3456 ".parse().unwrap();
        assert_eq!(rank, Rank::from(12.3456));
        assert_eq!(format!("{:.3}", rank), "12.346");
        assert_eq!(format!("{}", Rank::from(100)), "100");
        assert!("twelve".parse::<Rank>().is_err());
    }
}
