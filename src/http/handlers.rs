use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    ledger::{Transaction, TransactionKind},
    processor::TransactionProcessor,
    statement::Statement,
};

use super::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub valor: i64,
    pub tipo: String,
    pub descricao: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionResponse {
    pub limite: i64,
    pub saldo: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total: i64,
    pub data_extrato: DateTime<Utc>,
    pub limite: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatementEntry {
    pub valor: i64,
    pub tipo: TransactionKind,
    pub descricao: String,
    pub realizada_em: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatementResponse {
    pub saldo: BalanceSummary,
    pub ultimas_transacoes: Vec<StatementEntry>,
}

impl From<&Transaction> for StatementEntry {
    fn from(tx: &Transaction) -> Self {
        Self {
            valor: tx.amount,
            tipo: tx.kind,
            descricao: tx.description.to_string(),
            realizada_em: tx.occurred_at,
        }
    }
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            saldo: BalanceSummary {
                total: statement.balance,
                data_extrato: statement.generated_at,
                limite: statement.limit,
            },
            ultimas_transacoes: statement
                .recent_transactions
                .iter()
                .map(StatementEntry::from)
                .collect(),
        }
    }
}

/// Non-numeric ids are malformed; numeric ids outside the id range simply
/// do not name an account.
fn parse_account_id(raw: &str) -> Result<AccountId, ApiError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::InvalidAccountId(raw.to_owned()))?;
    AccountId::try_from(id).map_err(|_| ApiError::UnknownAccount(raw.to_owned()))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let account_id = parse_account_id(&id)?;
    let Json(request) = payload?;
    let applied = state.processor.process_transaction(
        account_id,
        request.valor,
        &request.tipo,
        &request.descricao,
    )?;
    Ok(Json(TransactionResponse {
        limite: applied.limit,
        saldo: applied.balance,
    }))
}

pub async fn get_statement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatementResponse>, ApiError> {
    let account_id = parse_account_id(&id)?;
    let statement = state.statements.statement(account_id)?;
    Ok(Json(statement.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_parsing() {
        assert_eq!(parse_account_id("3").unwrap(), 3);
        assert!(matches!(
            parse_account_id("abc"),
            Err(ApiError::InvalidAccountId(_))
        ));
        assert!(matches!(
            parse_account_id("-1"),
            Err(ApiError::UnknownAccount(_))
        ));
    }
}
