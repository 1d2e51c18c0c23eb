//! Per-account balance checks supplied by the caller

use super::balance::Wei;

/// Maps a raw balance to an optional, human-readable problem description.
///
/// Validators must be pure: the aggregator calls them once per account per
/// pass and never retries.
pub trait BalanceValidator: Send + Sync {
    fn validate(&self, balance: &Wei) -> Option<String>;
}

impl<F> BalanceValidator for F
where
    F: Fn(&Wei) -> Option<String> + Send + Sync,
{
    fn validate(&self, balance: &Wei) -> Option<String> {
        self(balance)
    }
}

/// Flags accounts that cannot cover a required amount
#[derive(Clone, Debug)]
pub struct MinimumBalance {
    pub required: Wei,
}

impl MinimumBalance {
    pub fn new(required: Wei) -> Self {
        Self { required }
    }
}

impl BalanceValidator for MinimumBalance {
    fn validate(&self, balance: &Wei) -> Option<String> {
        if balance.0 < self.required.0 {
            Some("Insufficient funds".to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_balance() {
        let v = MinimumBalance::new(Wei::from_u128(100));
        assert_eq!(v.validate(&Wei::from_u128(99)).as_deref(), Some("Insufficient funds"));
        assert_eq!(v.validate(&Wei::from_u128(100)), None);
    }

    #[test]
    fn test_closure_validator() {
        let v = |b: &Wei| b.is_zero().then(|| "empty".to_string());
        assert_eq!(v.validate(&Wei::zero()).as_deref(), Some("empty"));
        assert_eq!(v.validate(&Wei::from_u128(1)), None);
    }
}
