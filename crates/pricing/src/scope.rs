//! Account-scope and shape checks shared by the engine entry points.

use procura_catalog::Offer;
use procura_core::{AccountId, DomainError, DomainResult, Entity, ProductId, SupplierId};

pub(crate) fn ensure_account<E>(account_id: AccountId, entity: &E, what: &str) -> DomainResult<()>
where
    E: Entity,
{
    if !entity.belongs_to(account_id) {
        return Err(DomainError::account_mismatch(format!(
            "{what} {:?} belongs to account {}, not {account_id}",
            entity.id(),
            entity.account_id()
        )));
    }
    Ok(())
}

/// Offers handed in for `product_id` must all be scoped to the account and product.
pub(crate) fn ensure_product_offers(
    account_id: AccountId,
    product_id: ProductId,
    offers: &[Offer],
) -> DomainResult<()> {
    for offer in offers {
        ensure_account(account_id, offer, "offer")?;
        if offer.product_id() != product_id {
            return Err(DomainError::validation(format!(
                "offer {} is for product {}, listed under {product_id}",
                offer.id_typed(),
                offer.product_id()
            )));
        }
    }
    Ok(())
}

/// Offers handed in for `supplier_id` must all be scoped to the account and supplier.
pub(crate) fn ensure_supplier_offers(
    account_id: AccountId,
    supplier_id: SupplierId,
    offers: &[Offer],
) -> DomainResult<()> {
    for offer in offers {
        ensure_account(account_id, offer, "offer")?;
        if offer.supplier_id() != supplier_id {
            return Err(DomainError::validation(format!(
                "offer {} belongs to supplier {}, listed under {supplier_id}",
                offer.id_typed(),
                offer.supplier_id()
            )));
        }
    }
    Ok(())
}
