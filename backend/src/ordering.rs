//! Display-order assignment
//!
//! Categories are ranked globally and links are ranked within their
//! category. A positive order supplied by the caller is stored as-is;
//! anything else appends the entity after the current maximum of its
//! scope. Nothing here ever renumbers existing rows: gaps left by deletes
//! stay, and explicit duplicates stay.

use crate::repositories::CatalogStore;
use anyhow::Result;

/// Set of siblings an order value is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderScope {
    /// All categories
    Categories,
    /// Links of one category
    Links { category_id: i64 },
}

impl OrderScope {
    /// Key pair for `pg_advisory_xact_lock(int4, int4)`
    ///
    /// Distinct scopes may share a key after truncation; that only
    /// serializes more than necessary.
    pub fn lock_key(&self) -> (i32, i32) {
        match self {
            OrderScope::Categories => (1, 0),
            OrderScope::Links { category_id } => (2, (*category_id & 0x7fff_ffff) as i32),
        }
    }
}

/// How the order of a new entity is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAssignment {
    /// Caller-supplied positive order, stored verbatim
    Explicit(i32),
    /// Append after the current maximum of the scope
    Next,
}

impl OrderAssignment {
    /// Zero, negative and absent orders are treated the same
    pub fn from_requested(requested: Option<i32>) -> Self {
        match requested {
            Some(order) if order > 0 => OrderAssignment::Explicit(order),
            _ => OrderAssignment::Next,
        }
    }

    /// Final order given the current maximum of the scope
    pub fn resolve(self, current_max: Option<i32>) -> i32 {
        match self {
            OrderAssignment::Explicit(order) => order,
            OrderAssignment::Next => next_after(current_max),
        }
    }
}

/// Order following `current_max`; an empty scope starts at 1
#[inline]
pub fn next_after(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0).saturating_add(1)
}

/// Next order for a new entity in `scope`
///
/// This is a plain read; stores that insert with `OrderAssignment::Next`
/// repeat it inside their own write so concurrent inserts see each other.
pub async fn next_order(store: &dyn CatalogStore, scope: OrderScope) -> Result<i32> {
    let current_max = store.max_order(scope).await?;
    Ok(next_after(current_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(5), OrderAssignment::Explicit(5))]
    #[case(Some(1), OrderAssignment::Explicit(1))]
    #[case(Some(0), OrderAssignment::Next)]
    #[case(Some(-3), OrderAssignment::Next)]
    #[case(None, OrderAssignment::Next)]
    fn test_from_requested(#[case] requested: Option<i32>, #[case] expected: OrderAssignment) {
        assert_eq!(OrderAssignment::from_requested(requested), expected);
    }

    #[test]
    fn test_empty_scope_starts_at_one() {
        assert_eq!(next_after(None), 1);
        assert_eq!(OrderAssignment::Next.resolve(None), 1);
    }

    #[test]
    fn test_lock_keys_separate_scope_kinds() {
        assert_ne!(
            OrderScope::Categories.lock_key(),
            OrderScope::Links { category_id: 0 }.lock_key()
        );
        assert_eq!(
            OrderScope::Links { category_id: 7 }.lock_key(),
            (2, 7)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Explicit positive orders survive regardless of the scope contents
        #[test]
        fn prop_explicit_order_is_kept(order in 1i32..i32::MAX, max in proptest::option::of(-1000i32..1000)) {
            let assignment = OrderAssignment::from_requested(Some(order));
            prop_assert_eq!(assignment.resolve(max), order);
        }

        /// Auto-assigned order is always one past the current maximum
        #[test]
        fn prop_next_is_max_plus_one(requested in -1000i32..=0, max in 0i32..100_000) {
            let assignment = OrderAssignment::from_requested(Some(requested));
            prop_assert_eq!(assignment.resolve(Some(max)), max + 1);
        }

        /// Sequential auto-assignment yields 1..=n in insertion order
        #[test]
        fn prop_sequential_inserts_increase(n in 1usize..50) {
            let mut current_max = None;
            let mut assigned = Vec::new();
            for _ in 0..n {
                let order = OrderAssignment::Next.resolve(current_max);
                current_max = Some(current_max.map_or(order, |m: i32| m.max(order)));
                assigned.push(order);
            }
            let expected: Vec<i32> = (1..=n as i32).collect();
            prop_assert_eq!(assigned, expected);
        }
    }
}
