//! Content-derived cache key generation.

use sha2::{Digest, Sha256};

use crate::appraiser::SearchFilters;

/// Namespace mixed into every query key.
pub const QUERY_KEY_NAMESPACE: &str = "__fha_licenses__";

/// Compute the cache key for a roster query.
///
/// Only the six filter fields participate; pagination never does, so all pages
/// of one query map to one key. Each value is length-prefixed so distinct filter
/// tuples cannot produce the same byte stream.
pub fn compute_query_key(filters: &SearchFilters) -> String {
    let mut hasher = Sha256::new();
    hasher.update(QUERY_KEY_NAMESPACE.as_bytes());
    for value in filters.values() {
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraiser::FilterField;

    #[test]
    fn test_hash_stability() {
        let filters = SearchFilters::new().set(FilterField::State, "AK");
        assert_eq!(compute_query_key(&filters), compute_query_key(&filters.clone()));
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_query_key(&SearchFilters::new().set(FilterField::State, "AK"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_differs_per_field() {
        let base = SearchFilters::new().set(FilterField::State, "TX");
        let keys: Vec<String> = FilterField::ALL
            .into_iter()
            .map(|field| compute_query_key(&base.clone().set(field, "AUSTIN")))
            .collect();

        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_hash_no_concatenation_collision() {
        let a = SearchFilters::new()
            .set(FilterField::State, "A")
            .set(FilterField::License, "B_C");
        let b = SearchFilters::new()
            .set(FilterField::State, "A_B")
            .set(FilterField::License, "C");
        assert_ne!(compute_query_key(&a), compute_query_key(&b));
    }

    #[test]
    fn test_hash_ignores_surrounding_whitespace() {
        let a = SearchFilters::new().set(FilterField::City, "Austin");
        let b = SearchFilters::new().set(FilterField::City, "  Austin ");
        assert_eq!(compute_query_key(&a), compute_query_key(&b));
    }
}
