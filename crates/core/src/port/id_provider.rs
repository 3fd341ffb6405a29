// ID Provider Port (for deterministic testing)

use rand::Rng;

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique entity ID
    fn generate_id(&self) -> String;

    /// Generate the 4-digit code a customer gives the courier at delivery
    fn generate_pin(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn generate_pin(&self) -> String {
        format!("{:04}", rand::thread_rng().gen_range(0..10_000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_is_four_digits() {
        for _ in 0..50 {
            let pin = UuidProvider.generate_pin();
            assert_eq!(pin.len(), 4);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(UuidProvider.generate_id(), UuidProvider.generate_id());
    }
}
