use crate::domain::account::{AccountId, AccountType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("No source account")]
    NoSourceAccount,
    #[error("No destination account")]
    NoDestinationAccount,
    #[error("No account with id {0}")]
    AccountNotFound(AccountId),
    #[error("No agreement named '{0}'")]
    AgreementNotFound(String),
    #[error("No account of type {account_type} under agreement '{agreement}'")]
    NoAccountOfType {
        agreement: String,
        account_type: AccountType,
    },
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BankError {
    /// True for every "lookup came back empty" failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BankError::NoSourceAccount
                | BankError::NoDestinationAccount
                | BankError::AccountNotFound(_)
                | BankError::AgreementNotFound(_)
                | BankError::NoAccountOfType { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BankError>;
