/// Account snapshots, provisioning and the overdraft limit check.
pub mod account;

/// Transactions as recorded in the ledger.
pub mod ledger;

/// Validation of raw transaction requests into commands for [`processor`].
pub mod command;

/// Account and ledger storage interfaces, plus an "in memory" implementation
/// with one lock per account.
pub mod store;

/// Balance update protocol. Reads the balance, checks the limit and commits
/// the new balance with its ledger entry, retrying when a concurrent writer
/// got there first.
pub mod processor;

/// Account statements: balance, limit and the latest transactions.
pub mod statement;

pub mod config;

/// HTTP interface on top of [`processor`] and [`statement`].
pub mod http;

/// Bootstraps the ledger for batch processing of CSV files. Lives here
/// rather than in the binary so integration tests can drive it.
pub mod bin_utils;
