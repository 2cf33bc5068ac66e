//! Batch front end for the ledger: reads transactions from CSV, applies them
//! in file order and prints one statement line per account.

use std::{
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    account::AccountProvision,
    processor::{
        BalanceUpdateError, TransactionProcessor,
        optimistic_processor::{DEFAULT_RETRY_LIMIT, OptimisticProcessor},
    },
    statement::StatementBuilder,
    store::in_memory_store::InMemoryStore,
};
use anyhow::{Context, Result};
use csv_parser::CsvTransactionParser;
use csv_printer::{StatementRow, print_statements};
use thiserror::Error;
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum RowError {
    #[error("Malformed row: {0}")]
    Malformed(#[from] csv::Error),
    #[error(transparent)]
    Rejected(#[from] BalanceUpdateError),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub accounts: Vec<AccountProvision>,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser =
            CsvTransactionParser::new(self.input).context("Failed to read CSV header")?;

        let store = Arc::new(InMemoryStore::new(&self.accounts));
        let processor = OptimisticProcessor::new(Arc::clone(&store), DEFAULT_RETRY_LIMIT);
        let statements = StatementBuilder::new(Arc::clone(&store));

        for (line, row) in parser {
            let outcome = row.map_err(RowError::from).and_then(|row| {
                processor
                    .process_transaction(row.client, row.amount, &row.kind, &row.description)
                    .map_err(RowError::from)
            });
            if let Err(err) = outcome {
                (self.error_printer)(line, err);
            }
        }

        let mut rows = Vec::new();
        for account_id in store.account_ids() {
            let statement = statements
                .statement(account_id)
                .with_context(|| format!("Failed to build statement for account {account_id}"))?;
            rows.push(StatementRow {
                client: account_id,
                balance: statement.balance,
                limit: statement.limit,
                recent: statement.recent_transactions.len(),
            });
        }
        print_statements(self.output, rows.into_iter())
    }
}
