//! Cache key composition
//!
//! Keys are opaque strings; uniqueness is the caller's responsibility.
//! The composition rules here are the contract the rest of the system
//! honors so that pagination, search and detail fetches never collide:
//! - paged list: `{list}:{page}` and `{list}:totalPages`
//! - search: `search:{normalized}:{page}` and `search:{normalized}:totalPages`
//! - entity detail: `{entity}:{id}`
//! - sub-resource: `{entity}:{id}:{sub}`
//! - static: `genres`, `configuration`

/// Key for the genre list
pub const GENRES: &str = "genres";

/// Key for the API configuration document
pub const CONFIGURATION: &str = "configuration";

/// Normalize a user-entered search query for key composition.
/// Lowercase + trim, applied consistently for cache keys and
/// in-flight keys so ` Matrix ` and `matrix` coalesce.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Key for one page of a paged list, e.g. `popular:2`
pub fn page(namespace: &str, page: u32) -> String {
    format!("{}:{}", namespace, page)
}

/// Key for the total page count of a paged list, e.g. `popular:totalPages`
pub fn total_pages(namespace: &str) -> String {
    format!("{}:totalPages", namespace)
}

/// Namespace for a search list, e.g. `search:matrix`
pub fn search_namespace(query: &str) -> String {
    format!("search:{}", normalize_query(query))
}

/// Key for an entity detail, e.g. `movie:603`
pub fn entity(entity_type: &str, id: u64) -> String {
    format!("{}:{}", entity_type, id)
}

/// Key for an entity sub-resource, e.g. `movie:603:credits`
pub fn sub_resource(entity_type: &str, id: u64, sub: &str) -> String {
    format!("{}:{}:{}", entity_type, id, sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_lowercases_and_trims() {
        assert_eq!(normalize_query(" Matrix "), "matrix");
        assert_eq!(normalize_query("matrix"), "matrix");
        assert_eq!(normalize_query("  The MATRIX  "), "the matrix");
    }

    #[test]
    fn test_page_key_composition() {
        assert_eq!(page("popular", 1), "popular:1");
        assert_eq!(page("topRated", 12), "topRated:12");
    }

    #[test]
    fn test_total_pages_key_composition() {
        assert_eq!(total_pages("popular"), "popular:totalPages");
    }

    #[test]
    fn test_search_namespace_uses_normalized_query() {
        assert_eq!(search_namespace(" Matrix "), "search:matrix");
        assert_eq!(page(&search_namespace("Matrix"), 2), "search:matrix:2");
        assert_eq!(
            total_pages(&search_namespace("Matrix")),
            "search:matrix:totalPages"
        );
    }

    #[test]
    fn test_entity_and_sub_resource_keys() {
        assert_eq!(entity("movie", 603), "movie:603");
        assert_eq!(sub_resource("movie", 603, "credits"), "movie:603:credits");
        assert_eq!(sub_resource("person", 6384, "images"), "person:6384:images");
    }

    #[test]
    fn test_equivalent_queries_produce_identical_keys() {
        let a = page(&search_namespace(" Matrix "), 1);
        let b = page(&search_namespace("matrix"), 1);
        assert_eq!(a, b);
    }
}
