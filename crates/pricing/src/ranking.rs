//! Offer ranking.

use core::cmp::Reverse;

use serde::{Deserialize, Serialize};

use procura_catalog::Offer;

/// Ordering criterion for a product's offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingCriterion {
    /// Highest priority first. Used for procurement.
    #[default]
    Priority,
    /// Cheapest first. Used for explicit "best offer" queries.
    Price,
}

impl RankingCriterion {
    /// Parse a request parameter: exactly `"price"` selects price ordering,
    /// anything else (including `"priority"`) falls back to priority.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "price" => RankingCriterion::Price,
            _ => RankingCriterion::Priority,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingCriterion::Priority => "priority",
            RankingCriterion::Price => "price",
        }
    }
}

impl core::fmt::Display for RankingCriterion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order `offers` by `criterion`.
///
/// The sort is stable: offers that tie on the criterion keep their relative
/// input order.
pub fn rank(offers: &[Offer], criterion: RankingCriterion) -> Vec<&Offer> {
    let mut ranked: Vec<&Offer> = offers.iter().collect();
    match criterion {
        RankingCriterion::Priority => ranked.sort_by_key(|offer| Reverse(offer.priority())),
        RankingCriterion::Price => ranked.sort_by_key(|offer| offer.price()),
    }
    ranked
}
