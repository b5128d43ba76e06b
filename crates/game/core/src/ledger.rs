//! Score ledger: the only place a session's point total changes.

use crate::error::{ErrorSeverity, MacrogameError};

/// Point amounts and balances.
pub type Points = u64;

/// Debit refused because it would take the balance below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("insufficient points: requested {requested}, balance {balance}")]
pub struct InsufficientFunds {
    pub requested: Points,
    pub balance: Points,
}

impl MacrogameError for InsufficientFunds {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Rejected
    }

    fn error_code(&self) -> &'static str {
        "INSUFFICIENT_FUNDS"
    }
}

/// Non-negative point counter with checked debits.
///
/// The ledger has no observers; callers publish changes after a successful
/// mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreLedger {
    total: Points,
}

impl ScoreLedger {
    pub const fn new() -> Self {
        Self { total: 0 }
    }

    pub const fn with_balance(total: Points) -> Self {
        Self { total }
    }

    /// Adds `amount` and returns the new total. Saturates instead of wrapping.
    pub fn credit(&mut self, amount: Points) -> Points {
        self.total = self.total.saturating_add(amount);
        self.total
    }

    /// Removes `amount` and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientFunds`] and leaves the balance untouched when
    /// `amount` exceeds the current total.
    pub fn debit(&mut self, amount: Points) -> Result<Points, InsufficientFunds> {
        let remaining = self.total.checked_sub(amount).ok_or(InsufficientFunds {
            requested: amount,
            balance: self.total,
        })?;
        self.total = remaining;
        Ok(remaining)
    }

    pub const fn balance(&self) -> Points {
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_accumulates() {
        let mut ledger = ScoreLedger::new();
        assert_eq!(ledger.credit(10), 10);
        assert_eq!(ledger.credit(0), 10);
        assert_eq!(ledger.credit(5), 15);
        assert_eq!(ledger.balance(), 15);
    }

    #[test]
    fn debit_exact_balance_reaches_zero() {
        let mut ledger = ScoreLedger::with_balance(100);
        assert_eq!(ledger.debit(100), Ok(0));
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn over_debit_is_refused_without_mutation() {
        let mut ledger = ScoreLedger::with_balance(99);
        let err = ledger.debit(100).unwrap_err();
        assert_eq!(
            err,
            InsufficientFunds {
                requested: 100,
                balance: 99
            }
        );
        assert_eq!(ledger.balance(), 99);
        assert_eq!(err.severity(), ErrorSeverity::Rejected);
    }

    #[test]
    fn credit_saturates() {
        let mut ledger = ScoreLedger::with_balance(Points::MAX - 1);
        assert_eq!(ledger.credit(10), Points::MAX);
    }

    #[test]
    fn balance_never_negative_over_mixed_sequence() {
        let mut ledger = ScoreLedger::new();
        let ops: [(bool, Points); 8] = [
            (false, 5),
            (true, 3),
            (false, 3),
            (false, 1),
            (true, 20),
            (false, 20),
            (false, 4),
            (true, 7),
        ];
        let mut expected: Points = 0;
        for (is_credit, amount) in ops {
            if is_credit {
                expected += amount;
                ledger.credit(amount);
            } else if amount <= expected {
                expected -= amount;
                assert!(ledger.debit(amount).is_ok());
            } else {
                assert!(ledger.debit(amount).is_err());
            }
            assert_eq!(ledger.balance(), expected);
        }
    }
}
