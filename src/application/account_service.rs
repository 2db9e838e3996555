use crate::domain::account::{Account, AccountId, AccountType, Amount, Balance};
use crate::domain::agreement::Agreement;
use crate::domain::ports::AccountStoreBox;
use crate::error::{BankError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Balance mutation and lookup for accounts.
///
/// This is the only place raw balances are changed and persisted.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Opens an account under `agreement` and returns it as stored.
    async fn add_account(
        &self,
        agreement: &Agreement,
        number: &str,
        r#type: AccountType,
        amount: Balance,
    ) -> Result<Account>;

    /// Every stored account, in storage order.
    async fn get_accounts(&self) -> Result<Vec<Account>>;

    /// The accounts owned by `agreement`.
    async fn get_accounts_for(&self, agreement: &Agreement) -> Result<Vec<Account>>;

    /// Takes `amount` off the account's balance. Returns `true` once persisted.
    async fn charge(&self, account_id: AccountId, amount: Amount) -> Result<bool>;

    /// Moves `amount` from `source_id` to `destination_id`.
    async fn make_transfer(
        &self,
        source_id: AccountId,
        destination_id: AccountId,
        amount: Amount,
    ) -> Result<()>;
}

pub type SharedAccountService = Arc<dyn AccountService>;

/// `AccountService` backed by an `AccountStore`.
///
/// Each operation reads, mutates and saves without locking: callers are
/// expected to serialize operations touching the same account.
pub struct AccountManager {
    store: AccountStoreBox,
}

impl AccountManager {
    pub fn new(store: AccountStoreBox) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn add_account(
        &self,
        agreement: &Agreement,
        number: &str,
        r#type: AccountType,
        amount: Balance,
    ) -> Result<Account> {
        let agreement_id = agreement.id.ok_or_else(|| {
            BankError::ValidationError(format!(
                "Agreement '{}' has not been stored",
                agreement.name
            ))
        })?;
        if amount < Balance::ZERO {
            return Err(BankError::ValidationError(
                "Initial balance must not be negative".to_string(),
            ));
        }

        let account = self
            .store
            .save(Account::new(agreement_id, number, r#type, amount))
            .await?;
        debug!(id = ?account.id, agreement_id, number, account_type = r#type, "account added");
        Ok(account)
    }

    async fn get_accounts(&self) -> Result<Vec<Account>> {
        self.store.find_all().await
    }

    async fn get_accounts_for(&self, agreement: &Agreement) -> Result<Vec<Account>> {
        match agreement.id {
            Some(agreement_id) => self.store.find_by_agreement_id(agreement_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn charge(&self, account_id: AccountId, amount: Amount) -> Result<bool> {
        let mut account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(BankError::AccountNotFound(account_id))?;

        account.debit(amount)?;
        let account = self.store.save(account).await?;

        debug!(account_id, amount = %amount.value(), balance = %account.amount.0, "account charged");
        Ok(true)
    }

    async fn make_transfer(
        &self,
        source_id: AccountId,
        destination_id: AccountId,
        amount: Amount,
    ) -> Result<()> {
        let mut source = self
            .store
            .find_by_id(source_id)
            .await?
            .ok_or(BankError::NoSourceAccount)?;
        let mut destination = self
            .store
            .find_by_id(destination_id)
            .await?
            .ok_or(BankError::NoDestinationAccount)?;

        if source_id == destination_id {
            return Err(BankError::ValidationError(
                "Cannot transfer to the same account".to_string(),
            ));
        }

        source.debit(amount)?;
        destination.credit(amount);

        // A failure on the second save leaves the debit persisted.
        self.store.save(source).await?;
        self.store.save(destination).await?;

        info!(source_id, destination_id, amount = %amount.value(), "transfer completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::AccountStore;
    use crate::domain::agreement::AgreementId;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Wraps the in-memory store and records every saved account.
    #[derive(Default, Clone)]
    struct RecordingStore {
        inner: InMemoryAccountStore,
        saved: Arc<Mutex<Vec<Account>>>,
        find_all_calls: Arc<Mutex<usize>>,
    }

    impl RecordingStore {
        fn saved(&self) -> Vec<Account> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccountStore for RecordingStore {
        async fn save(&self, account: Account) -> Result<Account> {
            self.saved.lock().unwrap().push(account.clone());
            self.inner.save(account).await
        }

        async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_agreement_id(&self, agreement_id: AgreementId) -> Result<Vec<Account>> {
            self.inner.find_by_agreement_id(agreement_id).await
        }

        async fn find_all(&self) -> Result<Vec<Account>> {
            *self.find_all_calls.lock().unwrap() += 1;
            self.inner.find_all().await
        }
    }

    async fn seeded(balances: &[rust_decimal::Decimal]) -> (AccountManager, RecordingStore) {
        let inner = InMemoryAccountStore::new();
        for (i, balance) in balances.iter().enumerate() {
            inner
                .save(Account::new(1, format!("{}", i + 1), 0, Balance::new(*balance)))
                .await
                .unwrap();
        }
        let store = RecordingStore {
            inner,
            ..Default::default()
        };
        (AccountManager::new(Box::new(store.clone())), store)
    }

    fn amount(value: rust_decimal::Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_transfer() {
        let (service, store) = seeded(&[dec!(100), dec!(10)]).await;

        service.make_transfer(1, 2, amount(dec!(10))).await.unwrap();

        let source = store.inner.find_by_id(1).await.unwrap().unwrap();
        let destination = store.inner.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(source.amount, Balance::new(dec!(90)));
        assert_eq!(destination.amount, Balance::new(dec!(20)));
    }

    #[tokio::test]
    async fn test_transfer_saves_source_then_destination() {
        let (service, store) = seeded(&[dec!(100), dec!(10)]).await;

        service.make_transfer(1, 2, amount(dec!(10))).await.unwrap();

        let saved = store.saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, Some(1));
        assert_eq!(saved[0].amount, Balance::new(dec!(90)));
        assert_eq!(saved[1].id, Some(2));
        assert_eq!(saved[1].amount, Balance::new(dec!(20)));
    }

    #[tokio::test]
    async fn test_transfer_without_source_account() {
        let (service, store) = seeded(&[]).await;

        let err = service
            .make_transfer(1, 2, amount(dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, BankError::NoSourceAccount));
        assert_eq!(err.to_string(), "No source account");
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_without_destination_account() {
        let (service, store) = seeded(&[dec!(100)]).await;

        let err = service
            .make_transfer(1, 2, amount(dec!(10)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No destination account");
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_persists_nothing() {
        let (service, store) = seeded(&[dec!(5), dec!(0)]).await;

        let err = service
            .make_transfer(1, 2, amount(dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, BankError::InsufficientFunds));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_to_same_account_is_rejected() {
        let (service, store) = seeded(&[dec!(100)]).await;

        let err = service
            .make_transfer(1, 1, amount(dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, BankError::ValidationError(_)));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_adding_account() {
        let (service, store) = seeded(&[]).await;
        let agreement = Agreement::new("test").with_id(1);

        let account = service
            .add_account(&agreement, "123", 2, Balance::new(dec!(100)))
            .await
            .unwrap();

        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, None);
        assert_eq!(saved[0].agreement_id, 1);
        assert_eq!(saved[0].number, "123");
        assert_eq!(saved[0].r#type, 2);
        assert_eq!(saved[0].amount, Balance::new(dec!(100)));
        assert_eq!(account.id, Some(1));
    }

    #[tokio::test]
    async fn test_adding_account_to_unsaved_agreement() {
        let (service, store) = seeded(&[]).await;

        let result = service
            .add_account(&Agreement::new("draft"), "1", 0, Balance::ZERO)
            .await;

        assert!(matches!(result, Err(BankError::ValidationError(_))));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_adding_account_with_negative_balance() {
        let (service, _) = seeded(&[]).await;
        let agreement = Agreement::new("test").with_id(1);

        let result = service
            .add_account(&agreement, "1", 0, Balance::new(dec!(-1)))
            .await;

        assert!(matches!(result, Err(BankError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_accounts() {
        let (service, store) = seeded(&[dec!(1), dec!(2)]).await;

        let accounts = service.get_accounts().await.unwrap();

        assert_eq!(accounts, store.inner.find_all().await.unwrap());
        assert_eq!(accounts.len(), 2);
        assert_eq!(*store.find_all_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_accounts_for_agreement() {
        let (service, store) = seeded(&[dec!(1), dec!(2)]).await;
        store
            .inner
            .save(Account::new(2, "other", 0, Balance::ZERO))
            .await
            .unwrap();

        let accounts = service
            .get_accounts_for(&Agreement::new("a").with_id(1))
            .await
            .unwrap();

        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().all(|a| a.agreement_id == 1));
        assert!(
            service
                .get_accounts_for(&Agreement::new("draft"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_charging() {
        let (service, store) = seeded(&[dec!(100)]).await;

        assert!(service.charge(1, amount(dec!(50))).await.unwrap());

        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].amount, Balance::new(dec!(50)));
    }

    #[tokio::test]
    async fn test_charging_unknown_account() {
        let (service, store) = seeded(&[]).await;

        let err = service.charge(9, amount(dec!(1))).await.unwrap_err();

        assert!(matches!(err, BankError::AccountNotFound(9)));
        assert!(err.is_not_found());
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn test_charging_more_than_balance() {
        let (service, store) = seeded(&[dec!(10)]).await;

        let err = service.charge(1, amount(dec!(10.01))).await.unwrap_err();

        assert!(matches!(err, BankError::InsufficientFunds));
        assert!(store.saved().is_empty());
    }
}
