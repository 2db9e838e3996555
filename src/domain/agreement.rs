use serde::{Deserialize, Serialize};

pub type AgreementId = u64;

/// A contractual grouping owning one or more accounts.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Agreement {
    /// Assigned by the store on first save.
    pub id: Option<AgreementId>,
    /// Unique name the agreement is looked up by.
    pub name: String,
}

impl Agreement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: AgreementId) -> Self {
        self.id = Some(id);
        self
    }
}
