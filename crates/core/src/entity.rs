//! Entity trait: identity + account scope.

use crate::id::AccountId;

/// Entity marker + minimal interface.
///
/// Every entity in procura lives inside exactly one account; no operation may
/// read across that boundary.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the owning account.
    fn account_id(&self) -> AccountId;

    /// True when the entity belongs to `account_id`.
    fn belongs_to(&self, account_id: AccountId) -> bool {
        self.account_id() == account_id
    }
}
