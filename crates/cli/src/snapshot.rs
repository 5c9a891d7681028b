//! JSON catalog snapshot loaded into an in-memory catalog.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use procura_catalog::{NewOffer, OrderPosition, Product, Supplier};
use procura_infra::InMemoryCatalog;

/// On-disk snapshot. Records are validated while deserializing; offers go
/// through the catalog's upsert so slot uniqueness holds.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub offers: Vec<NewOffer>,
    #[serde(default)]
    pub order_positions: Vec<OrderPosition>,
}

impl Snapshot {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid snapshot {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn into_catalog(self) -> Result<InMemoryCatalog> {
        let catalog = InMemoryCatalog::new();
        for product in self.products {
            catalog.upsert_product(product);
        }
        for supplier in self.suppliers {
            catalog.upsert_supplier(supplier);
        }
        for offer in self.offers {
            let offer_id = offer.id;
            catalog
                .upsert_offer(offer)
                .with_context(|| format!("offer {offer_id} rejected"))?;
        }
        for position in self.order_positions {
            catalog.upsert_order_position(position);
        }

        tracing::debug!("snapshot loaded into catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procura_core::{AccountId, Money, ProductId};
    use rust_decimal_macros::dec;

    const ACCOUNT: &str = "0190f2a4-0000-7000-8000-000000000001";
    const PRODUCT: &str = "0190f2a4-0000-7000-8000-000000000010";
    const SUPPLIER: &str = "0190f2a4-0000-7000-8000-000000000020";

    fn snapshot(price: &str) -> String {
        format!(
            r#"{{
                "products": [
                    {{"id": "{PRODUCT}", "account_id": "{ACCOUNT}", "name": "widget"}}
                ],
                "suppliers": [
                    {{"id": "{SUPPLIER}", "account_id": "{ACCOUNT}", "name": "Acme"}}
                ],
                "offers": [
                    {{
                        "id": "0190f2a4-0000-7000-8000-000000000030",
                        "account_id": "{ACCOUNT}",
                        "supplier": {{"id": "{SUPPLIER}", "name": "Acme"}},
                        "product_id": "{PRODUCT}",
                        "price": {price},
                        "stock": "5",
                        "priority": 1
                    }}
                ]
            }}"#
        )
    }

    #[test]
    fn loads_offers_into_catalog() {
        let catalog = Snapshot::parse(&snapshot("\"9.99\"")).unwrap().into_catalog().unwrap();

        let account: AccountId = ACCOUNT.parse().unwrap();
        let product: ProductId = PRODUCT.parse().unwrap();
        let offers = catalog.offers_for_product(account, product);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].price(), Money::new(dec!(9.99)));
    }

    #[test]
    fn numeric_prices_are_accepted() {
        let catalog = Snapshot::parse(&snapshot("12.5")).unwrap().into_catalog().unwrap();

        let offers = catalog.offers_for_product(ACCOUNT.parse().unwrap(), PRODUCT.parse().unwrap());
        assert_eq!(offers[0].price(), Money::new(dec!(12.5)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Snapshot::parse(&snapshot("\"-1\"")).unwrap().into_catalog().unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
