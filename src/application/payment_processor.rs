use super::account_service::SharedAccountService;
use crate::domain::account::{Account, AccountId, AccountType, Amount, Balance};
use crate::domain::agreement::Agreement;
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use tracing::debug;

/// Moves money between accounts picked by agreement and account type.
pub struct PaymentProcessor {
    account_service: SharedAccountService,
}

impl PaymentProcessor {
    pub fn new(account_service: SharedAccountService) -> Self {
        Self { account_service }
    }

    /// Transfers `amount` from the `source_type` account of
    /// `source_agreement` to the `destination_type` account of
    /// `destination_agreement`.
    pub async fn make_transfer(
        &self,
        source_agreement: &Agreement,
        destination_agreement: &Agreement,
        source_type: AccountType,
        destination_type: AccountType,
        amount: Amount,
    ) -> Result<()> {
        let (source_id, _) = self.resolve(source_agreement, source_type).await?;
        let (destination_id, _) = self.resolve(destination_agreement, destination_type).await?;

        self.account_service
            .make_transfer(source_id, destination_id, amount)
            .await
    }

    /// Same as [`make_transfer`](Self::make_transfer), but first charges the
    /// source account `amount * commission_percent`.
    ///
    /// The commission is the plain product of the two values: a
    /// `commission_percent` of `0.01` takes one percent. The source must
    /// cover commission and amount together, otherwise nothing is charged.
    pub async fn make_transfer_with_commission(
        &self,
        source_agreement: &Agreement,
        destination_agreement: &Agreement,
        source_type: AccountType,
        destination_type: AccountType,
        amount: Amount,
        commission_percent: Decimal,
    ) -> Result<()> {
        if commission_percent < Decimal::ZERO {
            return Err(BankError::ValidationError(
                "Commission must not be negative".to_string(),
            ));
        }
        let commission = amount
            .value()
            .checked_mul(commission_percent)
            .ok_or_else(|| BankError::ValidationError("Commission overflow".to_string()))?;
        let total_debit = commission
            .checked_add(amount.value())
            .ok_or_else(|| BankError::ValidationError("Commission overflow".to_string()))?;

        let (source_id, source) = self.resolve(source_agreement, source_type).await?;
        let (destination_id, _) = self.resolve(destination_agreement, destination_type).await?;

        // The charge is persisted on its own, so the transfer must not be
        // able to fail after it.
        if source_id == destination_id {
            return Err(BankError::ValidationError(
                "Cannot transfer to the same account".to_string(),
            ));
        }
        if source.amount < Balance::new(total_debit) {
            return Err(BankError::InsufficientFunds);
        }

        if commission > Decimal::ZERO {
            self.account_service
                .charge(source_id, Amount::new(commission)?)
                .await?;
        } else {
            debug!(source_id, "zero commission, charge skipped");
        }

        self.account_service
            .make_transfer(source_id, destination_id, amount)
            .await
    }

    /// First account of `agreement` whose type is `account_type`, with its id.
    pub async fn resolve(
        &self,
        agreement: &Agreement,
        account_type: AccountType,
    ) -> Result<(AccountId, Account)> {
        let accounts = self.account_service.get_accounts_for(agreement).await?;
        first_of_type(accounts, account_type)
            .and_then(|account| account.id.map(|id| (id, account)))
            .ok_or_else(|| BankError::NoAccountOfType {
                agreement: agreement.name.clone(),
                account_type,
            })
    }
}

fn first_of_type(accounts: Vec<Account>, account_type: AccountType) -> Option<Account> {
    accounts
        .into_iter()
        .find(|account| account.r#type == account_type)
}
