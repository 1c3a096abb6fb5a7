//! The [`Shells`] currency.

use std::fmt;

use crate::error::GameError;

/// Suffixes for successive powers of 1000, starting at 10^3.
const SUFFIXES: [&str; 6] = ["K", "M", "B", "T", "Qa", "Qi"];

/// A non-negative amount of in-game currency.
///
/// Backed by a `u64`, so the non-negative invariant holds by
/// construction. Addition saturates at `u64::MAX`; subtraction is only
/// available through [`Shells::subtract`], which rejects underflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shells(u64);

impl Shells {
    /// Zero shells.
    pub const ZERO: Shells = Shells(0);

    /// Wrap a raw amount.
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The raw amount.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Saturating addition. Never fails.
    #[must_use]
    pub fn add(self, other: Shells) -> Shells {
        Shells(self.0.saturating_add(other.0))
    }

    /// Subtract `cost`, or fail with [`GameError::InsufficientFunds`]
    /// when `cost` exceeds the balance.
    pub fn subtract(self, cost: Shells) -> Result<Shells, GameError> {
        self.0
            .checked_sub(cost.0)
            .map(Shells)
            .ok_or(GameError::InsufficientFunds {
                needed: cost,
                available: self,
            })
    }

    /// Human-readable abbreviated form.
    ///
    /// Below 1000 the full number is printed. Above, the value is scaled
    /// to the largest suffix that keeps a non-zero whole part and shown
    /// with at most two truncated decimals: `1500` is `"1.5K"`,
    /// `1_234_567` is `"1.23M"`, `2_000_000` is `"2M"`.
    pub fn format(self) -> String {
        if self.0 < 1000 {
            return self.0.to_string();
        }
        let mut unit: u64 = 1000;
        let mut idx = 0;
        while idx + 1 < SUFFIXES.len() && self.0 / unit >= 1000 {
            unit *= 1000;
            idx += 1;
        }
        let whole = self.0 / unit;
        // u128 keeps `remainder * 100` from overflowing near u64::MAX.
        let hundredths = ((self.0 % unit) as u128 * 100 / unit as u128) as u64;
        let suffix = SUFFIXES[idx];
        match hundredths {
            0 => format!("{whole}{suffix}"),
            h if h % 10 == 0 => format!("{whole}.{}{suffix}", h / 10),
            h => format!("{whole}.{h:02}{suffix}"),
        }
    }
}

impl fmt::Display for Shells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Shells {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn subtract_rejects_underflow() {
        let err = Shells::new(5).subtract(Shells::new(10)).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientFunds {
                needed: Shells::new(10),
                available: Shells::new(5),
            }
        );
        assert_eq!(Shells::new(10).subtract(Shells::new(10)), Ok(Shells::ZERO));
    }

    #[test]
    fn add_saturates() {
        let max = Shells::new(u64::MAX);
        assert_eq!(max.add(Shells::new(1)), max);
    }

    #[test]
    fn format_small_values_verbatim() {
        assert_eq!(Shells::new(0).format(), "0");
        assert_eq!(Shells::new(999).format(), "999");
    }

    #[test]
    fn format_uses_suffixes() {
        assert_eq!(Shells::new(1000).format(), "1K");
        assert_eq!(Shells::new(1500).format(), "1.5K");
        assert_eq!(Shells::new(1_234_567).format(), "1.23M");
        assert_eq!(Shells::new(2_000_000).format(), "2M");
        assert_eq!(Shells::new(999_999).format(), "999.99K");
        assert_eq!(Shells::new(7_050_000_000).format(), "7.05B");
        assert_eq!(Shells::new(3_000_000_000_000).format(), "3T");
    }

    #[test]
    fn format_handles_max() {
        // 18_446_744_073_709_551_615 is 18.44 Qi.
        assert_eq!(Shells::new(u64::MAX).format(), "18.44Qi");
    }

    proptest! {
        #[test]
        fn subtract_never_goes_negative(a in any::<u64>(), b in any::<u64>()) {
            match Shells::new(a).subtract(Shells::new(b)) {
                Ok(rest) => prop_assert_eq!(rest.get(), a - b),
                Err(_) => prop_assert!(b > a),
            }
        }

        #[test]
        fn format_is_deterministic(a in any::<u64>()) {
            prop_assert_eq!(Shells::new(a).format(), Shells::new(a).format());
        }
    }
}
