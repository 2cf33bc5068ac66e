use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    account::AccountId,
    ledger::Transaction,
    store::{AccountStore, LedgerStore, StoreError},
};

pub const RECENT_TRANSACTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub account_id: AccountId,
    pub balance: i64,
    pub limit: i64,
    pub generated_at: DateTime<Utc>,
    /// Newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// Builds account statements from two independent reads. Under concurrent
/// writes the balance may already include an entry the list does not show
/// yet, or the other way around.
pub struct StatementBuilder<S> {
    store: Arc<S>,
}

impl<S> Clone for StatementBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> StatementBuilder<S>
where
    S: AccountStore + LedgerStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn statement(&self, account_id: AccountId) -> Result<Statement, StoreError> {
        let generated_at = Utc::now();
        let account = self.store.get(account_id)?;
        let recent_transactions = self.store.list_recent(account_id, RECENT_TRANSACTIONS)?;
        Ok(Statement {
            account_id,
            balance: account.balance,
            limit: account.limit,
            generated_at,
            recent_transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        account::AccountProvision,
        ledger::TransactionKind,
        processor::{TransactionProcessor, optimistic_processor::OptimisticProcessor},
        store::in_memory_store::InMemoryStore,
    };

    use super::*;

    fn setup() -> (OptimisticProcessor<InMemoryStore>, StatementBuilder<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new(&[AccountProvision::new(1, 1000)]));
        (
            OptimisticProcessor::new(Arc::clone(&store), 4),
            StatementBuilder::new(store),
        )
    }

    #[test]
    fn statement_after_scenario() {
        let (processor, builder) = setup();
        let before = Utc::now();
        processor.process_transaction(1, 500, "d", "compra").unwrap();
        processor.process_transaction(1, 600, "d", "compra").unwrap_err();
        processor
            .process_transaction(1, 500, "c", "pagamento")
            .unwrap();

        let statement = builder.statement(1).unwrap();
        assert_eq!(statement.balance, 0);
        assert_eq!(statement.limit, 1000);
        assert!(statement.generated_at >= before);

        let summary: Vec<_> = statement
            .recent_transactions
            .iter()
            .map(|tx| (tx.kind, tx.amount, tx.description.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TransactionKind::Credit, 500, "pagamento"),
                (TransactionKind::Debit, 500, "compra"),
            ]
        );
    }

    #[test]
    fn statement_keeps_last_ten() {
        let (processor, builder) = setup();
        for amount in 1..=15 {
            processor.process_transaction(1, amount, "c", "dep").unwrap();
        }
        let statement = builder.statement(1).unwrap();
        assert_eq!(statement.balance, (1..=15).sum::<i64>());
        let amounts: Vec<_> = statement
            .recent_transactions
            .iter()
            .map(|tx| tx.amount)
            .collect();
        assert_eq!(amounts, (6..=15).rev().collect::<Vec<_>>());
    }

    #[test]
    fn statement_for_fresh_and_unknown_accounts() {
        let (_, builder) = setup();
        let statement = builder.statement(1).unwrap();
        assert_eq!(statement.balance, 0);
        assert!(statement.recent_transactions.is_empty());
        assert_eq!(
            builder.statement(2).unwrap_err(),
            StoreError::AccountNotFound(2)
        );
    }
}
