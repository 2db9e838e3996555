use crate::domain::agreement::Agreement;
use crate::domain::ports::AgreementStoreBox;
use crate::error::Result;
use tracing::debug;

/// Creates and looks up agreements.
pub struct AgreementService {
    store: AgreementStoreBox,
}

impl AgreementService {
    pub fn new(store: AgreementStoreBox) -> Self {
        Self { store }
    }

    /// Stores a new agreement named `name`; the store assigns its id.
    pub async fn add_agreement(&self, name: &str) -> Result<Agreement> {
        let agreement = self.store.save(Agreement::new(name)).await?;
        debug!(id = ?agreement.id, name, "agreement added");
        Ok(agreement)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Agreement>> {
        self.store.find_by_name(name).await
    }

    pub async fn get_agreements(&self) -> Result<Vec<Agreement>> {
        self.store.find_all().await
    }
}
