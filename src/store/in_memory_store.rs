use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use parking_lot::RwLock;

use crate::{
    account::{Account, AccountId, AccountProvision, BalanceChange},
    ledger::{NewTransaction, Transaction, TransactionId},
};

use super::{AccountStore, LedgerStore, Storage, StoreError};

#[derive(Debug)]
struct AccountSlot {
    balance: i64,
    limit: i64,
    transactions: Vec<Transaction>,
}

/// Accounts live in a map that is fixed at construction, so lookups never
/// lock. Each account sits behind its own lock, which is held only for the
/// duration of a single read or write.
#[derive(Debug)]
pub struct InMemoryStore {
    slots: HashMap<AccountId, RwLock<AccountSlot>>,
    next_tx_id: AtomicU64,
    capacity: Option<usize>,
}

impl InMemoryStore {
    pub fn new(accounts: &[AccountProvision]) -> Self {
        let slots = accounts
            .iter()
            .map(|acc| {
                let slot = AccountSlot {
                    balance: 0,
                    limit: acc.limit,
                    transactions: Vec::new(),
                };
                (acc.id, RwLock::new(slot))
            })
            .collect();
        Self {
            slots,
            next_tx_id: AtomicU64::new(1),
            capacity: None,
        }
    }

    /// Caps the number of ledger entries per account. Writes beyond the cap
    /// fail with [`StoreError::Unavailable`].
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<_> = self.slots.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn slot(&self, account_id: AccountId) -> Result<&RwLock<AccountSlot>, StoreError> {
        self.slots
            .get(&account_id)
            .ok_or(StoreError::AccountNotFound(account_id))
    }

    fn allocate_tx_id(&self) -> Result<TransactionId, StoreError> {
        self.next_tx_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
            .map_err(|_| StoreError::Unavailable("transaction ids exhausted".to_string()))
    }

    /// Must be called with the slot write lock held.
    fn push_transaction(
        &self,
        slot: &mut AccountSlot,
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        if let Some(capacity) = self.capacity {
            if slot.transactions.len() >= capacity {
                return Err(StoreError::Unavailable(format!(
                    "ledger for account {} is full ({capacity} entries)",
                    transaction.account_id
                )));
            }
        }
        let id = self.allocate_tx_id()?;
        let stored = Transaction::from_new(id, transaction, Utc::now());
        slot.transactions.push(stored.clone());
        Ok(stored)
    }
}

impl AccountStore for InMemoryStore {
    fn get(&self, account_id: AccountId) -> Result<Account, StoreError> {
        let slot = self.slot(account_id)?.read();
        Ok(Account {
            id: account_id,
            balance: slot.balance,
            limit: slot.limit,
        })
    }

    fn compare_and_set(
        &self,
        account_id: AccountId,
        expected: i64,
        new: i64,
    ) -> Result<bool, StoreError> {
        let mut slot = self.slot(account_id)?.write();
        if slot.balance != expected {
            return Ok(false);
        }
        slot.balance = new;
        Ok(true)
    }
}

impl LedgerStore for InMemoryStore {
    /// Records the entry without touching the balance; balance updates go
    /// through [`Storage::commit`].
    fn append(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        let mut slot = self.slot(transaction.account_id)?.write();
        self.push_transaction(&mut slot, transaction)
    }

    fn list_recent(
        &self,
        account_id: AccountId,
        n: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        let slot = self.slot(account_id)?.read();
        Ok(slot.transactions.iter().rev().take(n).cloned().collect())
    }
}

impl Storage for InMemoryStore {
    fn commit(
        &self,
        change: BalanceChange,
        transaction: NewTransaction,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut slot = self.slot(change.account_id)?.write();
        if slot.balance != change.expected {
            return Ok(None);
        }
        let stored = self.push_transaction(&mut slot, transaction)?;
        slot.balance = change.new;
        Ok(Some(stored))
    }
}
