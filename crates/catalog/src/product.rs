use serde::{Deserialize, Serialize};

use procura_core::{AccountId, DomainError, DomainResult, Entity, ProductId};

/// Product kind: a standalone product or a variant of a parent product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    #[default]
    Product,
    Variant,
}

/// Input for creating a product (as resolved from the ERP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    pub account_id: AccountId,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub kind: ProductKind,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub parent_id: Option<ProductId>,
}

/// A product or product variant within one account.
///
/// Identity, kind and parent are fixed once resolved; only `name` and `code`
/// follow upstream sync updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewProduct")]
pub struct Product {
    id: ProductId,
    account_id: AccountId,
    external_id: Option<String>,
    kind: ProductKind,
    name: String,
    code: Option<String>,
    article: Option<String>,
    parent_id: Option<ProductId>,
}

impl Product {
    pub fn new(input: NewProduct) -> DomainResult<Self> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }

        if let Some(parent_id) = input.parent_id {
            if parent_id == input.id {
                return Err(DomainError::invariant("product cannot be its own parent"));
            }
            if input.kind != ProductKind::Variant {
                return Err(DomainError::validation(
                    "only variants may reference a parent product",
                ));
            }
        }

        Ok(Self {
            id: input.id,
            account_id: input.account_id,
            external_id: input.external_id,
            kind: input.kind,
            name: input.name,
            code: input.code,
            article: input.article,
            parent_id: input.parent_id,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn article(&self) -> Option<&str> {
        self.article.as_deref()
    }

    pub fn parent_id(&self) -> Option<ProductId> {
        self.parent_id
    }

    pub fn is_variant(&self) -> bool {
        self.kind == ProductKind::Variant
    }

    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Apply a name/code update coming from upstream sync.
    pub fn apply_upstream(&mut self, name: String, code: Option<String>) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        self.name = name;
        self.code = code;
        Ok(())
    }
}

impl TryFrom<NewProduct> for Product {
    type Error = DomainError;

    fn try_from(value: NewProduct) -> Result<Self, Self::Error> {
        Product::new(value)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn account_id(&self) -> AccountId {
        self.account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            id: ProductId::new(),
            account_id: AccountId::new(),
            external_id: Some("ms-1".to_string()),
            kind: ProductKind::Product,
            name: name.to_string(),
            code: Some("00042".to_string()),
            article: None,
            parent_id: None,
        }
    }

    #[test]
    fn creates_product() {
        let product = Product::new(new_product("Bolt M6")).unwrap();
        assert_eq!(product.name(), "Bolt M6");
        assert_eq!(product.code(), Some("00042"));
        assert!(!product.is_variant());
        assert!(!product.has_parent());
    }

    #[test]
    fn rejects_empty_name() {
        let err = Product::new(new_product("   ")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn variant_may_reference_parent() {
        let parent = Product::new(new_product("Shirt")).unwrap();
        let mut input = new_product("Shirt / XL");
        input.kind = ProductKind::Variant;
        input.parent_id = Some(parent.id_typed());

        let variant = Product::new(input).unwrap();
        assert!(variant.is_variant());
        assert_eq!(variant.parent_id(), Some(parent.id_typed()));
    }

    #[test]
    fn rejects_self_parent() {
        let mut input = new_product("Loop");
        input.kind = ProductKind::Variant;
        input.parent_id = Some(input.id);

        let err = Product::new(input).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn plain_product_cannot_have_parent() {
        let mut input = new_product("Orphan");
        input.parent_id = Some(ProductId::new());

        assert!(Product::new(input).is_err());
    }

    #[test]
    fn upstream_update_changes_name_and_code_only() {
        let mut product = Product::new(new_product("Old")).unwrap();
        let id = product.id_typed();

        product
            .apply_upstream("New".to_string(), Some("77".to_string()))
            .unwrap();

        assert_eq!(product.name(), "New");
        assert_eq!(product.code(), Some("77"));
        assert_eq!(product.id_typed(), id);
        assert!(product.apply_upstream(String::new(), None).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let json = format!(
            r#"{{"id":"{}","account_id":"{}","name":""}}"#,
            ProductId::new(),
            AccountId::new()
        );
        assert!(serde_json::from_str::<Product>(&json).is_err());
    }
}
