use thiserror::Error;

use crate::{
    account::AccountId,
    ledger::{Description, DescriptionError, NewTransaction, TransactionKind},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },
    #[error("Kind must be 'c' or 'd', got '{kind}'")]
    UnknownKind { kind: String },
    #[error(transparent)]
    Description(#[from] DescriptionError),
}

/// Validated request to move money in or out of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyCommand {
    pub account_id: AccountId,
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: Description,
}

impl ApplyCommand {
    pub fn parse(
        account_id: AccountId,
        amount: i64,
        kind: &str,
        description: &str,
    ) -> Result<Self, CommandError> {
        if amount <= 0 {
            return Err(CommandError::NonPositiveAmount { amount });
        }
        let kind = Self::parse_kind(kind)?;
        let description = Description::parse(description)?;
        Ok(Self {
            account_id,
            amount,
            kind,
            description,
        })
    }

    fn parse_kind(kind: &str) -> Result<TransactionKind, CommandError> {
        match kind {
            "c" | "credit" => Ok(TransactionKind::Credit),
            "d" | "debit" => Ok(TransactionKind::Debit),
            other => Err(CommandError::UnknownKind {
                kind: other.to_owned(),
            }),
        }
    }

    pub fn delta(&self) -> i64 {
        self.kind.delta(self.amount)
    }

    pub fn to_new_transaction(&self) -> NewTransaction {
        NewTransaction {
            account_id: self.account_id,
            amount: self.amount,
            kind: self.kind,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_commands() {
        let cmd = ApplyCommand::parse(1, 500, "d", "compra").unwrap();
        assert_eq!(cmd.kind, TransactionKind::Debit);
        assert_eq!(cmd.delta(), -500);
        assert_eq!(cmd.description.as_str(), "compra");

        let cmd = ApplyCommand::parse(1, 500, "credit", "pagamento").unwrap();
        assert_eq!(cmd.kind, TransactionKind::Credit);
        assert_eq!(cmd.delta(), 500);
    }

    #[test]
    fn reject_invalid_commands() {
        assert_eq!(
            ApplyCommand::parse(1, 0, "c", "x").unwrap_err(),
            CommandError::NonPositiveAmount { amount: 0 }
        );
        assert_eq!(
            ApplyCommand::parse(1, -5, "c", "x").unwrap_err(),
            CommandError::NonPositiveAmount { amount: -5 }
        );
        let err = ApplyCommand::parse(1, 5, "x", "x").unwrap_err();
        assert_eq!(err.to_string(), "Kind must be 'c' or 'd', got 'x'");
        assert!(matches!(
            ApplyCommand::parse(1, 5, "c", "").unwrap_err(),
            CommandError::Description(DescriptionError { len: 0 })
        ));
        assert!(matches!(
            ApplyCommand::parse(1, 5, "c", "descricao longa").unwrap_err(),
            CommandError::Description(DescriptionError { len: 15 })
        ));
    }
}
