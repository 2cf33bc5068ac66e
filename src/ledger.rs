use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::AccountId;

pub type TransactionId = u64;

pub const MAX_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "c")]
    Credit,
    #[serde(rename = "d")]
    Debit,
}

impl TransactionKind {
    /// Signed effect of `amount` on the balance.
    pub fn delta(self, amount: i64) -> i64 {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Description must have between 1 and {max} characters, got {len}", max = MAX_DESCRIPTION_LEN)]
pub struct DescriptionError {
    pub len: usize,
}

/// Free text attached to a transaction, 1 to 10 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn parse(text: &str) -> Result<Self, DescriptionError> {
        let len = text.chars().count();
        if (1..=MAX_DESCRIPTION_LEN).contains(&len) {
            Ok(Self(text.to_owned()))
        } else {
            Err(DescriptionError { len })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger entry before the store has assigned it an id and a commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: Description,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn from_new(id: TransactionId, new: NewTransaction, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id,
            account_id: new.account_id,
            amount: new.amount,
            kind: new.kind,
            description: new.description,
            occurred_at,
        }
    }

    pub fn signed_amount(&self) -> i64 {
        self.kind.delta(self.amount)
    }
}
