//! Search projection over the catalog.

use crate::catalog::CatalogItem;

/// Items matching a search term, paired with their position in the full
/// catalog.
pub type FilteredView<'a> = Vec<(usize, &'a CatalogItem)>;

/// Case-insensitive substring match on `name`, keeping catalog order.
///
/// Surrounding whitespace in `term` is ignored; an empty term keeps every
/// item.
pub fn apply<'a>(term: &str, items: &'a [CatalogItem]) -> FilteredView<'a> {
    let needle = term.trim().to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .collect()
}
