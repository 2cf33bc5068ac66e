use thiserror::Error;

use crate::{
    account::{Account, AccountId, BalanceChange},
    ledger::{NewTransaction, Transaction},
};

pub mod in_memory_store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Account {0} does not exist")]
    AccountNotFound(AccountId),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Current balance and limit of every provisioned account.
pub trait AccountStore {
    fn get(&self, account_id: AccountId) -> Result<Account, StoreError>;

    /// Replaces the balance with `new` only if it still equals `expected`.
    /// Returns `false` when another writer got there first.
    fn compare_and_set(
        &self,
        account_id: AccountId,
        expected: i64,
        new: i64,
    ) -> Result<bool, StoreError>;
}

/// Append-only transaction log, one stream per account.
pub trait LedgerStore {
    fn append(&self, transaction: NewTransaction) -> Result<Transaction, StoreError>;

    /// Up to `n` most recent transactions, newest first.
    fn list_recent(&self, account_id: AccountId, n: usize)
    -> Result<Vec<Transaction>, StoreError>;
}

/// Storage that can publish a balance change together with its ledger entry.
pub trait Storage: AccountStore + LedgerStore {
    /// Compare-and-set plus append as one indivisible step: readers see
    /// either both effects or neither. `Ok(None)` means the compare failed
    /// and nothing was written.
    fn commit(
        &self,
        change: BalanceChange,
        transaction: NewTransaction,
    ) -> Result<Option<Transaction>, StoreError>;
}
