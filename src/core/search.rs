//! Case-insensitive substring search over indexed fields
//!
//! Search is the dashboard's quick filter box: one query string matched
//! against a fixed set of fields per entity, OR-combined. The empty query
//! matches everything, and filtering never reorders results.

/// Entities that expose searchable text fields
pub trait Searchable {
    /// The fields the quick filter looks at, in match order
    fn indexed_fields() -> &'static [&'static str];

    /// The text of one indexed field, if the entity carries it
    fn field_text(&self, field: &str) -> Option<String>;
}

/// Whether a single entity matches the query
///
/// Matching is a case-insensitive substring test against each indexed field;
/// one hit is enough. The empty query matches every entity.
pub fn matches<T: Searchable>(item: &T, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    T::indexed_fields()
        .iter()
        .any(|field| match item.field_text(field) {
            Some(text) => text.to_lowercase().contains(&needle),
            None => false,
        })
}

/// Filter a result set down to the entities matching the query
///
/// The filter is stable: survivors keep the relative order they came in.
pub fn filter<T: Searchable>(items: Vec<T>, query: &str) -> Vec<T> {
    if query.is_empty() {
        return items;
    }
    items.into_iter().filter(|i| matches(i, query)).collect()
}
