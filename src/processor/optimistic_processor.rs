use std::sync::Arc;

use tracing::debug;

use crate::{account::AccountId, command::ApplyCommand, store::Storage};

use super::{Applied, BalanceUpdateError, TransactionProcessor};

pub const DEFAULT_RETRY_LIMIT: u32 = 16;

/// Applies transactions without holding any lock between reading the
/// balance and writing it back. A write that lost the race is re-evaluated
/// against the fresh balance, up to `retry_limit` attempts in total.
pub struct OptimisticProcessor<S> {
    store: Arc<S>,
    retry_limit: u32,
}

impl<S> Clone for OptimisticProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            retry_limit: self.retry_limit,
        }
    }
}

impl<S> OptimisticProcessor<S>
where
    S: Storage,
{
    pub fn new(store: Arc<S>, retry_limit: u32) -> Self {
        Self {
            store,
            retry_limit: retry_limit.max(1),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn apply(&self, command: &ApplyCommand) -> Result<Applied, BalanceUpdateError> {
        let account_id = command.account_id;
        for attempt in 1..=self.retry_limit {
            let account = self.store.get(account_id)?;
            let change = account.handle_command(command)?;
            if let Some(transaction) = self.store.commit(change, command.to_new_transaction())? {
                return Ok(Applied {
                    limit: account.limit,
                    balance: change.new,
                    transaction,
                });
            }
            debug!(account_id, attempt, "balance moved under us, retrying");
        }
        Err(BalanceUpdateError::Contention {
            account_id,
            attempts: self.retry_limit,
        })
    }
}

impl<S> TransactionProcessor for OptimisticProcessor<S>
where
    S: Storage,
{
    fn process_transaction(
        &self,
        account_id: AccountId,
        amount: i64,
        kind: &str,
        description: &str,
    ) -> Result<Applied, BalanceUpdateError> {
        let command = ApplyCommand::parse(account_id, amount, kind, description)?;
        self.apply(&command)
    }
}
