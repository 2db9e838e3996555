use crate::application::account_service::{AccountManager, AccountService, SharedAccountService};
use crate::application::agreement_service::AgreementService;
use crate::application::payment_processor::PaymentProcessor;
use crate::domain::account::{Account, AccountType, Amount, Balance};
use crate::domain::agreement::Agreement;
use crate::domain::ports::{AccountStoreBox, AgreementStoreBox};
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Agreement,
    Account,
    Transfer,
    CommissionTransfer,
    Charge,
}

/// One row of a batch file. Which optional columns are required depends on
/// the operation type.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub r#type: OperationType,
    pub agreement: String,
    pub account_type: Option<AccountType>,
    pub amount: Option<Decimal>,
    pub number: Option<String>,
    pub to_agreement: Option<String>,
    pub to_account_type: Option<AccountType>,
    pub commission: Option<Decimal>,
}

impl Operation {
    fn account_type(&self) -> Result<AccountType> {
        required(self.account_type, "account_type")
    }

    fn amount(&self) -> Result<Amount> {
        Amount::new(required(self.amount, "amount")?)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| BankError::ValidationError(format!("Missing field '{field}'")))
}

/// Applies batch operations to the banking services, one at a time.
pub struct BatchRunner {
    agreements: AgreementService,
    accounts: SharedAccountService,
    processor: PaymentProcessor,
}

impl BatchRunner {
    pub fn new(agreement_store: AgreementStoreBox, account_store: AccountStoreBox) -> Self {
        let accounts: SharedAccountService = Arc::new(AccountManager::new(account_store));
        Self {
            agreements: AgreementService::new(agreement_store),
            processor: PaymentProcessor::new(accounts.clone()),
            accounts,
        }
    }

    /// Applies a single operation. A failed operation leaves no trace apart
    /// from the documented partial-transfer case.
    pub async fn apply(&self, op: Operation) -> Result<()> {
        match op.r#type {
            OperationType::Agreement => {
                self.agreements.add_agreement(&op.agreement).await?;
            }
            OperationType::Account => {
                let agreement = self.agreement(&op.agreement).await?;
                let number = required(op.number.as_deref(), "number")?;
                let opening = required(op.amount, "amount")?;
                self.accounts
                    .add_account(&agreement, number, op.account_type()?, Balance::new(opening))
                    .await?;
            }
            OperationType::Transfer => {
                let (source, destination) = self.agreement_pair(&op).await?;
                self.processor
                    .make_transfer(
                        &source,
                        &destination,
                        op.account_type()?,
                        required(op.to_account_type, "to_account_type")?,
                        op.amount()?,
                    )
                    .await?;
            }
            OperationType::CommissionTransfer => {
                let (source, destination) = self.agreement_pair(&op).await?;
                self.processor
                    .make_transfer_with_commission(
                        &source,
                        &destination,
                        op.account_type()?,
                        required(op.to_account_type, "to_account_type")?,
                        op.amount()?,
                        required(op.commission, "commission")?,
                    )
                    .await?;
            }
            OperationType::Charge => {
                let agreement = self.agreement(&op.agreement).await?;
                let (account_id, _) = self
                    .processor
                    .resolve(&agreement, op.account_type()?)
                    .await?;
                self.accounts.charge(account_id, op.amount()?).await?;
            }
        }
        Ok(())
    }

    /// Consumes the runner and returns every account in storage order.
    pub async fn into_accounts(self) -> Result<Vec<Account>> {
        self.accounts.get_accounts().await
    }

    async fn agreement(&self, name: &str) -> Result<Agreement> {
        self.agreements
            .find_by_name(name)
            .await?
            .ok_or_else(|| BankError::AgreementNotFound(name.to_string()))
    }

    async fn agreement_pair(&self, op: &Operation) -> Result<(Agreement, Agreement)> {
        let source = self.agreement(&op.agreement).await?;
        let destination_name = required(op.to_agreement.as_deref(), "to_agreement")?;
        let destination = self.agreement(destination_name).await?;
        Ok((source, destination))
    }
}
