use thiserror::Error;

use crate::{
    account::{AccountError, AccountId},
    command::CommandError,
    ledger::Transaction,
    store::StoreError,
};

pub mod optimistic_processor;

/// Every variant guarantees that neither the balance nor the ledger changed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceUpdateError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),
    #[error(
        "Debit of {amount} on account {account_id} exceeds the limit: balance {balance}, limit {limit}"
    )]
    LimitExceeded {
        account_id: AccountId,
        balance: i64,
        limit: i64,
        amount: i64,
    },
    #[error("Account {account_id} is under contention, gave up after {attempts} attempts")]
    Contention { account_id: AccountId, attempts: u32 },
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl BalanceUpdateError {
    /// Whether the same request may succeed if sent again later.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            BalanceUpdateError::Contention { .. } | BalanceUpdateError::StorageUnavailable(_)
        )
    }
}

impl From<CommandError> for BalanceUpdateError {
    fn from(err: CommandError) -> Self {
        BalanceUpdateError::InvalidRequest(err.to_string())
    }
}

impl From<StoreError> for BalanceUpdateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(account_id) => {
                BalanceUpdateError::AccountNotFound(account_id)
            }
            StoreError::Unavailable(reason) => BalanceUpdateError::StorageUnavailable(reason),
        }
    }
}

impl From<AccountError> for BalanceUpdateError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::LimitExceeded {
                account_id,
                balance,
                limit,
                amount,
            } => BalanceUpdateError::LimitExceeded {
                account_id,
                balance,
                limit,
                amount,
            },
            err @ AccountError::BalanceOverflow { .. } => {
                BalanceUpdateError::InvalidRequest(err.to_string())
            }
        }
    }
}

/// Outcome of a successful balance update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub limit: i64,
    pub balance: i64,
    pub transaction: Transaction,
}

pub trait TransactionProcessor {
    /// Validates the raw request and applies it to the account.
    fn process_transaction(
        &self,
        account_id: AccountId,
        amount: i64,
        kind: &str,
        description: &str,
    ) -> Result<Applied, BalanceUpdateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retriable_categories() {
        assert!(
            BalanceUpdateError::Contention {
                account_id: 1,
                attempts: 3
            }
            .is_retriable()
        );
        assert!(BalanceUpdateError::StorageUnavailable("down".into()).is_retriable());
        assert!(!BalanceUpdateError::AccountNotFound(1).is_retriable());
        assert!(!BalanceUpdateError::InvalidRequest("bad".into()).is_retriable());
        assert!(
            !BalanceUpdateError::LimitExceeded {
                account_id: 1,
                balance: 0,
                limit: 0,
                amount: 1
            }
            .is_retriable()
        );
    }

    #[test]
    fn store_errors_map_to_categories() {
        assert_eq!(
            BalanceUpdateError::from(StoreError::AccountNotFound(6)),
            BalanceUpdateError::AccountNotFound(6)
        );
        assert_eq!(
            BalanceUpdateError::from(StoreError::Unavailable("full".into())),
            BalanceUpdateError::StorageUnavailable("full".into())
        );
    }
}
