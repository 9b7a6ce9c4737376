//! Rhythmic durations
//!
//! A duration is a fraction of a whole note kept exactly as written (`3/6` stays `3/6` in
//! its identity). Names are derived from the reduced fraction.

use fraction::Fraction;

use crate::diagnostics::{Result, ScriptError};
use crate::theory::ordinal;

/// A note length as `numerator / denominator` of a whole note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    numerator: u64,
    denominator: u64,
}

const DOT_PREFIXES: [&str; 6] = ["", "double-", "triple-", "quadruple-", "pentuple-", "sextuple-"];

impl Duration {
    pub const WHOLE: Duration = Duration {
        numerator: 1,
        denominator: 1,
    };

    pub const COMMON_TIME: Duration = Duration {
        numerator: 4,
        denominator: 4,
    };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 {
            return Err(ScriptError::type_error(
                "Duration denominator must be greater than zero",
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Exact value as a fraction of a whole note
    pub fn fraction(&self) -> Fraction {
        Fraction::new(self.numerator, self.denominator)
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn reduced(&self) -> (u64, u64) {
        let fraction = self.fraction();
        match (fraction.numer(), fraction.denom()) {
            (Some(&n), Some(&d)) => (n, d),
            _ => (self.numerator, self.denominator),
        }
    }

    /// (dot count, base denominator) when the duration is a plain or dotted note value
    fn shape(&self) -> Option<(u32, u64)> {
        let (n, d) = self.reduced();
        if !d.is_power_of_two() {
            return None;
        }
        if n == 1 {
            return Some((0, d));
        }
        // a dotted value falls short of the next power of two by a power of two
        let gap = d.checked_sub(n).filter(|gap| gap.is_power_of_two())?;
        if n.checked_mul(2)? < d {
            return None;
        }
        let dots = d.trailing_zeros() - gap.trailing_zeros() - 1;
        Some((dots, d / 2))
    }

    pub fn dot_count(&self) -> u32 {
        self.shape().map(|(dots, _)| dots).unwrap_or(0)
    }

    /// Denominator of the undotted note value this duration is built on
    pub fn base_denominator(&self) -> u64 {
        match self.shape() {
            Some((_, base)) => base,
            None => self.reduced().1,
        }
    }

    /// Display name such as `quarter note` or `double-dotted half note`
    pub fn name(&self) -> String {
        let Some((dots, base)) = self.shape() else {
            let (n, d) = self.reduced();
            return format!("{n}/{d} note");
        };

        let base = match base {
            1 => "whole".to_string(),
            2 => "half".to_string(),
            4 => "quarter".to_string(),
            other => ordinal(other),
        };
        if dots == 0 {
            return format!("{base} note");
        }
        let prefix = DOT_PREFIXES
            .get(dots as usize - 1)
            .map(|p| p.to_string())
            .unwrap_or_else(|| format!("{dots}-"));
        format!("{prefix}dotted {base} note")
    }

    pub fn identity(&self) -> String {
        format!("{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dur(n: u64, d: u64) -> Duration {
        Duration::new(n, d).unwrap()
    }

    #[test]
    fn test_plain_names() {
        assert_eq!(dur(1, 1).name(), "whole note");
        assert_eq!(dur(1, 2).name(), "half note");
        assert_eq!(dur(1, 4).name(), "quarter note");
        assert_eq!(dur(1, 8).name(), "eighth note");
        assert_eq!(dur(1, 32).name(), "thirty-second note");
        assert_eq!(dur(2, 8).name(), "quarter note");
    }

    #[test]
    fn test_dotted_names() {
        let d = dur(3, 4);
        assert_eq!(d.name(), "dotted half note");
        assert_eq!(d.dot_count(), 1);
        assert_eq!(d.base_denominator(), 2);

        let d = dur(7, 8);
        assert_eq!(d.name(), "double-dotted quarter note");
        assert_eq!(d.dot_count(), 2);
        assert_eq!(d.base_denominator(), 4);

        let d = dur(15, 16);
        assert_eq!(d.name(), "triple-dotted eighth note");
        assert_eq!(d.dot_count(), 3);
        assert_eq!(d.base_denominator(), 8);

        assert_eq!(dur(6, 8).name(), "dotted half note");
        assert_eq!(dur(63, 64).name(), "pentuple-dotted thirty-second note");
    }

    #[test]
    fn test_irregular_names() {
        assert_eq!(dur(1, 3).name(), "1/3 note");
        assert_eq!(dur(5, 8).name(), "5/8 note");
        assert_eq!(dur(4, 4).name(), "whole note");
        assert_eq!(dur(3, 1).name(), "3/1 note");
        assert_eq!(dur(3, 8).name(), "3/8 note");
        assert_eq!(dur(3, 8).dot_count(), 0);
        assert_eq!(dur(3, 2).name(), "3/2 note");
        assert_eq!(dur(5, 16).name(), "5/16 note");
    }

    #[test]
    fn test_identity_is_unreduced() {
        assert_eq!(dur(2, 8).identity(), "2/8");
        assert!(Duration::new(1, 0).is_err());
    }
}
