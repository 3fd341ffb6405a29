// Key layout of the marketplace document store
//
// Ids become key segments, so they must be non-empty and free of `:`.
// Callers run `check` on every id that reaches a key builder.

use crate::error::{AppError, Result};

pub const SEPARATOR: char = ':';

/// Reject ids that would escape their owner's prefix
pub fn check(ids: &[&str]) -> Result<()> {
    match ids
        .iter()
        .find(|id| id.trim().is_empty() || id.contains(SEPARATOR))
    {
        Some(id) => Err(AppError::Validation(format!("Identifiant invalide: '{id}'"))),
        None => Ok(()),
    }
}

pub fn product(merchant_id: &str, product_id: &str) -> String {
    format!("products:{merchant_id}:{product_id}")
}

pub fn products_of(merchant_id: &str) -> String {
    format!("products:{merchant_id}:")
}

pub fn order(merchant_id: &str, order_id: &str) -> String {
    format!("orders:{merchant_id}:{order_id}")
}

pub fn orders_of(merchant_id: &str) -> String {
    format!("orders:{merchant_id}:")
}

pub const ALL_ORDERS: &str = "orders:";

/// Courier's copy of an assigned order
pub fn delivery(courier_id: &str, order_id: &str) -> String {
    format!("delivery:{courier_id}:{order_id}")
}

pub fn deliveries_of(courier_id: &str) -> String {
    format!("delivery:{courier_id}:")
}

pub fn delivery_person(merchant_id: &str, courier_id: &str) -> String {
    format!("delivery-people:{merchant_id}:{courier_id}")
}

pub fn delivery_people_of(merchant_id: &str) -> String {
    format!("delivery-people:{merchant_id}:")
}

pub const ALL_DELIVERY_PEOPLE: &str = "delivery-people:";

pub fn merchant(merchant_id: &str) -> String {
    format!("merchants:{merchant_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_prefixes_do_not_overlap() {
        // "m1:" must not match keys of merchant "m10"
        assert!(!product("m10", "p").starts_with(&products_of("m1")));
        assert!(order("m1", "o").starts_with(&orders_of("m1")));
        assert!(!delivery_person("m1", "d").starts_with("delivery:"));
    }

    #[test]
    fn test_check_rejects_separator_and_blank_ids() {
        assert!(check(&["m1", "product_1700000000000"]).is_ok());
        assert!(matches!(check(&["m1:x"]), Err(AppError::Validation(_))));
        assert!(matches!(check(&["m1", ""]), Err(AppError::Validation(_))));
        assert!(matches!(check(&["  "]), Err(AppError::Validation(_))));
    }
}
