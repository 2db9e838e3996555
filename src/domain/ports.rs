use super::account::{Account, AccountId};
use super::agreement::{Agreement, AgreementId};
use crate::error::Result;
use async_trait::async_trait;

/// Storage for accounts. `save` is an upsert keyed by id and assigns the id
/// of an account saved for the first time.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn save(&self, account: Account) -> Result<Account>;
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>>;
    async fn find_by_agreement_id(&self, agreement_id: AgreementId) -> Result<Vec<Account>>;
    async fn find_all(&self) -> Result<Vec<Account>>;
}

/// Storage for agreements.
#[async_trait]
pub trait AgreementStore: Send + Sync {
    async fn save(&self, agreement: Agreement) -> Result<Agreement>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Agreement>>;
    async fn find_all(&self) -> Result<Vec<Agreement>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type AgreementStoreBox = Box<dyn AgreementStore>;
