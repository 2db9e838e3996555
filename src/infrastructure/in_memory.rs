use crate::domain::account::{Account, AccountId};
use crate::domain::agreement::{Agreement, AgreementId};
use crate::domain::ports::{AccountStore, AgreementStore};
use crate::error::{BankError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Keeps the id sequence ahead of ids supplied by callers.
    fn reserve(&mut self, id: u64) {
        self.last_id = self.last_id.max(id);
    }
}

/// A thread-safe in-memory store for accounts.
///
/// Ids are handed out sequentially from 1 and listings are ordered by id.
/// Each call takes the lock once, so individual calls are serialized but a
/// read followed by a save is not isolated from other callers.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<Table<Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn save(&self, mut account: Account) -> Result<Account> {
        let mut table = self.accounts.write().await;
        let id = match account.id {
            Some(id) => {
                table.reserve(id);
                id
            }
            None => table.next_id(),
        };
        account.id = Some(id);
        table.rows.insert(id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let table = self.accounts.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_agreement_id(&self, agreement_id: AgreementId) -> Result<Vec<Account>> {
        let table = self.accounts.read().await;
        Ok(table
            .rows
            .values()
            .filter(|account| account.agreement_id == agreement_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Account>> {
        let table = self.accounts.read().await;
        Ok(table.rows.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for agreements.
///
/// Agreement names are unique: saving a second agreement under a taken name
/// fails.
#[derive(Default, Clone)]
pub struct InMemoryAgreementStore {
    agreements: Arc<RwLock<Table<Agreement>>>,
}

impl InMemoryAgreementStore {
    /// Creates a new, empty in-memory agreement store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgreementStore for InMemoryAgreementStore {
    async fn save(&self, mut agreement: Agreement) -> Result<Agreement> {
        let mut table = self.agreements.write().await;

        if table
            .rows
            .values()
            .any(|other| other.name == agreement.name && other.id != agreement.id)
        {
            return Err(BankError::ValidationError(format!(
                "Agreement name '{}' is already taken",
                agreement.name
            )));
        }

        let id = match agreement.id {
            Some(id) => {
                table.reserve(id);
                id
            }
            None => table.next_id(),
        };
        agreement.id = Some(id);
        table.rows.insert(id, agreement.clone());
        Ok(agreement)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Agreement>> {
        let table = self.agreements.read().await;
        Ok(table.rows.values().find(|a| a.name == name).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Agreement>> {
        let table = self.agreements.read().await;
        Ok(table.rows.values().cloned().collect())
    }
}
