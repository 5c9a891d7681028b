use serde::{Deserialize, Serialize};

use procura_core::{AccountId, DomainError, DomainResult, Entity, SupplierId};

use crate::offer::SupplierRef;

/// Input for creating a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub id: SupplierId,
    pub account_id: AccountId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
}

/// A supplier (counterparty offering products) within one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewSupplier")]
pub struct Supplier {
    id: SupplierId,
    account_id: AccountId,
    external_id: Option<String>,
    name: String,
}

impl Supplier {
    pub fn new(input: NewSupplier) -> DomainResult<Self> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }

        Ok(Self {
            id: input.id,
            account_id: input.account_id,
            external_id: input.external_id,
            name: input.name,
        })
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: String) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        self.name = name;
        Ok(())
    }

    /// Reference embedded into offers and plan entries.
    pub fn to_ref(&self) -> SupplierRef {
        SupplierRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl TryFrom<NewSupplier> for Supplier {
    type Error = DomainError;

    fn try_from(value: NewSupplier) -> Result<Self, Self::Error> {
        Supplier::new(value)
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn account_id(&self) -> AccountId {
        self.account_id
    }
}
