//! Catalog sources: where the service reads its account-scoped snapshot from.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use thiserror::Error;

use procura_catalog::{NewOffer, Offer, OfferChanges, OrderPosition, Product, Supplier};
use procura_core::{
    AccountId, DomainError, DomainResult, Entity, OfferId, OrderPositionId, ProductId, Quantity,
    SupplierId,
};
use procura_pricing::{RankingCriterion, rank};

use crate::read_model::{AccountStore, InMemoryAccountStore};

/// Failure to read from a catalog backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Read side of the catalog, always scoped to one account.
///
/// Lookups by id return the records that exist, in request order, without
/// duplicates. Unknown ids are silently skipped; callers decide whether that
/// is an error.
pub trait CatalogSource: Send + Sync {
    fn products(&self, account_id: AccountId, ids: &[ProductId]) -> Result<Vec<Product>, SourceError>;

    fn suppliers(&self, account_id: AccountId, ids: &[SupplierId]) -> Result<Vec<Supplier>, SourceError>;

    fn order_positions(
        &self,
        account_id: AccountId,
        ids: &[OrderPositionId],
    ) -> Result<Vec<OrderPosition>, SourceError>;

    /// Offers per product, highest priority first.
    fn offers_for_products(
        &self,
        account_id: AccountId,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<Offer>>, SourceError>;

    /// Offers per supplier, in catalog order.
    fn offers_for_suppliers(
        &self,
        account_id: AccountId,
        ids: &[SupplierId],
    ) -> Result<HashMap<SupplierId, Vec<Offer>>, SourceError>;
}

impl<S> CatalogSource for std::sync::Arc<S>
where
    S: CatalogSource + ?Sized,
{
    fn products(&self, account_id: AccountId, ids: &[ProductId]) -> Result<Vec<Product>, SourceError> {
        (**self).products(account_id, ids)
    }

    fn suppliers(&self, account_id: AccountId, ids: &[SupplierId]) -> Result<Vec<Supplier>, SourceError> {
        (**self).suppliers(account_id, ids)
    }

    fn order_positions(
        &self,
        account_id: AccountId,
        ids: &[OrderPositionId],
    ) -> Result<Vec<OrderPosition>, SourceError> {
        (**self).order_positions(account_id, ids)
    }

    fn offers_for_products(
        &self,
        account_id: AccountId,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<Offer>>, SourceError> {
        (**self).offers_for_products(account_id, ids)
    }

    fn offers_for_suppliers(
        &self,
        account_id: AccountId,
        ids: &[SupplierId],
    ) -> Result<HashMap<SupplierId, Vec<Offer>>, SourceError> {
        (**self).offers_for_suppliers(account_id, ids)
    }
}

/// In-memory catalog backed by account-isolated stores.
///
/// Also carries the write side used by imports and tests: offers are upserted
/// per (account, supplier, product) slot, and order positions can be linked to
/// the purchase orders that cover them.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: InMemoryAccountStore<ProductId, Product>,
    suppliers: InMemoryAccountStore<SupplierId, Supplier>,
    offers: InMemoryAccountStore<OfferId, Offer>,
    positions: InMemoryAccountStore<OrderPositionId, OrderPosition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_product(&self, product: Product) {
        self.products.upsert(product.account_id(), product.id_typed(), product);
    }

    /// Insert or replace a supplier; its offers pick up the current name.
    pub fn upsert_supplier(&self, supplier: Supplier) {
        let account_id = supplier.account_id();
        let supplier_id = supplier.id_typed();

        for mut offer in self.offers.list(account_id) {
            if offer.supplier_id() == supplier_id && offer.supplier().name != supplier.name() {
                offer.refresh_supplier_name(supplier.name());
                self.offers.upsert(account_id, offer.id_typed(), offer);
            }
        }
        self.suppliers.upsert(account_id, supplier_id, supplier);
    }

    pub fn upsert_order_position(&self, position: OrderPosition) {
        self.positions.upsert(position.account_id(), position.id_typed(), position);
    }

    /// Create the offer for its (account, supplier, product) slot, or update the
    /// one already there. An update keeps the existing offer id and overwrites
    /// price, priority and stock; a missing stock is stored as zero.
    pub fn upsert_offer(&self, input: NewOffer) -> DomainResult<Offer> {
        let account_id = input.account_id;
        let supplier = lookup(&self.suppliers, account_id, &input.supplier.id, "supplier")?;
        lookup(&self.products, account_id, &input.product_id, "product")?;
        let (supplier_id, product_id) = (supplier.id_typed(), input.product_id);

        self.offers.upsert_where(
            account_id,
            |offer| offer.same_slot(account_id, supplier_id, product_id),
            Offer::id_typed,
            |existing| match existing {
                Some(mut offer) => {
                    let changes = OfferChanges {
                        price: Some(input.price),
                        stock: Some(input.stock.unwrap_or(Quantity::ZERO)),
                        priority: Some(input.priority),
                    };
                    offer.apply_changes(&changes, input.updated_at)?;
                    offer.refresh_supplier_name(supplier.name());
                    Ok(offer)
                }
                None => Offer::new(NewOffer {
                    supplier: supplier.to_ref(),
                    ..input
                }),
            },
        )
    }

    /// Partial update of one offer. An update that changes nothing is rejected.
    pub fn update_offer(
        &self,
        account_id: AccountId,
        offer_id: OfferId,
        changes: &OfferChanges,
        at: DateTime<Utc>,
    ) -> DomainResult<Offer> {
        if changes.is_empty() {
            return Err(DomainError::validation(format!(
                "update of offer {offer_id} carries no changes"
            )));
        }

        self.offers
            .modify(account_id, &offer_id, |offer| offer.apply_changes(changes, at))
            .unwrap_or_else(|| Err(missing(&self.offers, account_id, &offer_id, "offer")))
    }

    pub fn remove_offer(&self, account_id: AccountId, offer_id: OfferId) -> DomainResult<Offer> {
        lookup(&self.offers, account_id, &offer_id, "offer")?;
        self.offers
            .remove(account_id, &offer_id)
            .ok_or_else(DomainError::not_found)
    }

    /// All offers for one product, highest priority first.
    pub fn offers_for_product(&self, account_id: AccountId, product_id: ProductId) -> Vec<Offer> {
        let offers: Vec<Offer> = self
            .offers
            .list(account_id)
            .into_iter()
            .filter(|offer| offer.product_id() == product_id)
            .collect();
        rank(&offers, RankingCriterion::Priority)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Record that `purchase_id` covers `customer_id`. Returns `false` if the
    /// link already existed.
    pub fn link_coverage(
        &self,
        account_id: AccountId,
        customer_id: OrderPositionId,
        purchase_id: OrderPositionId,
    ) -> DomainResult<bool> {
        let purchase = match self.positions.get(account_id, &purchase_id) {
            Some(purchase) => purchase,
            // Foreign purchase positions still reach the entity so it reports the mismatch.
            None => self
                .positions
                .owner(&purchase_id)
                .and_then(|owner| self.positions.get(owner, &purchase_id))
                .ok_or_else(DomainError::not_found)?,
        };

        let mut linked = false;
        self.positions
            .modify(account_id, &customer_id, |customer| {
                linked = customer.link_coverage(&purchase)?;
                Ok(())
            })
            .unwrap_or_else(|| Err(missing(&self.positions, account_id, &customer_id, "order position")))?;
        Ok(linked)
    }
}

/// Fetch a record in `account_id`; a record held by another account is a
/// mismatch rather than a miss.
fn lookup<K, V>(
    store: &InMemoryAccountStore<K, V>,
    account_id: AccountId,
    key: &K,
    what: &str,
) -> DomainResult<V>
where
    K: Clone + Eq + Hash + Send + Sync + std::fmt::Display + 'static,
    V: Clone + Send + Sync + 'static,
{
    store
        .get(account_id, key)
        .ok_or_else(|| missing(store, account_id, key, what))
}

/// Error for a key absent from `account_id`.
fn missing<K, V>(
    store: &InMemoryAccountStore<K, V>,
    account_id: AccountId,
    key: &K,
    what: &str,
) -> DomainError
where
    K: Clone + Eq + Hash + Send + Sync + std::fmt::Display + 'static,
    V: Clone + Send + Sync + 'static,
{
    match store.owner(key) {
        Some(owner) => DomainError::account_mismatch(format!(
            "{what} {key} belongs to account {owner}, not {account_id}"
        )),
        None => DomainError::not_found(),
    }
}

fn collect_by_id<K, V>(store: &InMemoryAccountStore<K, V>, account_id: AccountId, ids: &[K]) -> Vec<V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let mut seen = Vec::with_capacity(ids.len());
    ids.iter()
        .filter(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        })
        .filter_map(|id| store.get(account_id, id))
        .collect()
}

impl CatalogSource for InMemoryCatalog {
    fn products(&self, account_id: AccountId, ids: &[ProductId]) -> Result<Vec<Product>, SourceError> {
        Ok(collect_by_id(&self.products, account_id, ids))
    }

    fn suppliers(&self, account_id: AccountId, ids: &[SupplierId]) -> Result<Vec<Supplier>, SourceError> {
        Ok(collect_by_id(&self.suppliers, account_id, ids))
    }

    fn order_positions(
        &self,
        account_id: AccountId,
        ids: &[OrderPositionId],
    ) -> Result<Vec<OrderPosition>, SourceError> {
        Ok(collect_by_id(&self.positions, account_id, ids))
    }

    fn offers_for_products(
        &self,
        account_id: AccountId,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<Offer>>, SourceError> {
        Ok(ids
            .iter()
            .map(|id| (*id, self.offers_for_product(account_id, *id)))
            .filter(|(_, offers)| !offers.is_empty())
            .collect())
    }

    fn offers_for_suppliers(
        &self,
        account_id: AccountId,
        ids: &[SupplierId],
    ) -> Result<HashMap<SupplierId, Vec<Offer>>, SourceError> {
        let mut by_supplier: HashMap<SupplierId, Vec<Offer>> = HashMap::new();
        for offer in self.offers.list(account_id) {
            if ids.contains(&offer.supplier_id()) {
                by_supplier.entry(offer.supplier_id()).or_default().push(offer);
            }
        }
        Ok(by_supplier)
    }
}
