use thiserror::Error;

use crate::{command::ApplyCommand, ledger::TransactionKind};

pub type AccountId = u32;

/// Point-in-time view of an account. Invariant: `balance >= -limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub balance: i64,
    pub limit: i64,
}

/// Account known at startup. Every account starts with a zero balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountProvision {
    pub id: AccountId,
    pub limit: i64,
}

impl AccountProvision {
    pub const fn new(id: AccountId, limit: i64) -> Self {
        Self { id, limit }
    }
}

pub const DEFAULT_ACCOUNTS: [AccountProvision; 5] = [
    AccountProvision::new(1, 100_000),
    AccountProvision::new(2, 80_000),
    AccountProvision::new(3, 1_000_000),
    AccountProvision::new(4, 10_000_000),
    AccountProvision::new(5, 500_000),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error(
        "Debit of {amount} on account {account_id} exceeds the limit: balance {balance}, limit {limit}"
    )]
    LimitExceeded {
        account_id: AccountId,
        balance: i64,
        limit: i64,
        amount: i64,
    },
    #[error("Credit of {amount} on account {account_id} overflows the balance")]
    BalanceOverflow { account_id: AccountId, amount: i64 },
}

/// Conditional balance update computed from an [`Account`] snapshot.
/// It only holds while the stored balance still equals `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub account_id: AccountId,
    pub expected: i64,
    pub new: i64,
}

impl Account {
    pub fn handle_command(&self, command: &ApplyCommand) -> Result<BalanceChange, AccountError> {
        let candidate = match (self.balance.checked_add(command.delta()), command.kind) {
            (Some(candidate), _) => candidate,
            (None, TransactionKind::Credit) => {
                return Err(AccountError::BalanceOverflow {
                    account_id: self.id,
                    amount: command.amount,
                });
            }
            // underflowing i64 is always below -limit
            (None, TransactionKind::Debit) => return Err(self.limit_exceeded(command.amount)),
        };

        if command.kind == TransactionKind::Debit && candidate < -self.limit {
            return Err(self.limit_exceeded(command.amount));
        }

        Ok(BalanceChange {
            account_id: self.id,
            expected: self.balance,
            new: candidate,
        })
    }

    fn limit_exceeded(&self, amount: i64) -> AccountError {
        AccountError::LimitExceeded {
            account_id: self.id,
            balance: self.balance,
            limit: self.limit,
            amount,
        }
    }
}
