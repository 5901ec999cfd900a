use crate::catalog::{Catalog, Product};

/// How a non-empty match set was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchQuality {
    /// The normalized query equals the record's `stone_type` exactly.
    Exact,
    /// Substring overlap in either direction between query and `stone_type`.
    Partial,
}

/// Result of the webhook matching pass: exact matches win outright, the
/// partial pass only runs when the exact pass comes back empty.
#[derive(Debug)]
pub struct MatchSet<'a> {
    pub quality: MatchQuality,
    pub products: Vec<&'a Product>,
}

impl MatchSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}

/// Result of the search endpoint pass, where both passes always run and the
/// combined set is deduplicated by record identity.
#[derive(Debug)]
pub struct SearchOutcome<'a> {
    pub exact: Vec<&'a Product>,
    pub partial: Vec<&'a Product>,
    pub combined: Vec<&'a Product>,
}

/// Lowercase and trim a raw query. No further whitespace normalization is
/// applied; multi-word queries pass through with their internal spacing.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn exact_pass<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Product> {
    catalog.products().iter().filter(|p| p.stone_type.to_lowercase() == query).collect()
}

// Substring in either direction. Short category labels can cross-match
// unrelated queries here; see DESIGN.md before tightening this.
fn partial_pass<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|p| {
            let stone_type = p.stone_type.to_lowercase();
            stone_type.contains(query) || query.contains(stone_type.as_str())
        })
        .collect()
}

/// Match a normalized query for the webhook path.
///
/// The caller is responsible for short-circuiting empty queries before
/// reaching this function.
pub fn match_stone<'a>(catalog: &'a Catalog, query: &str) -> MatchSet<'a> {
    let exact = exact_pass(catalog, query);
    if !exact.is_empty() {
        return MatchSet { quality: MatchQuality::Exact, products: exact };
    }
    MatchSet { quality: MatchQuality::Partial, products: partial_pass(catalog, query) }
}

/// Run both passes for the search endpoint and combine them, keeping exact
/// matches first and dropping partial hits that are already present.
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    let exact = exact_pass(catalog, query);
    let partial = partial_pass(catalog, query);

    let mut combined: Vec<&Product> = exact.clone();
    for candidate in &partial {
        if !combined.iter().any(|kept| std::ptr::eq(*kept, *candidate)) {
            combined.push(candidate);
        }
    }

    SearchOutcome { exact, partial, combined }
}
