// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Gallery filtering and category selection helpers.

use crate::models::work::{ALL_CATEGORIES_ID, Catalog, Work};

/// Works visible under `category_id`; the "Tous" id selects everything.
pub fn filter_works(works: &[Work], category_id: u64) -> Vec<&Work> {
    if category_id == ALL_CATEGORIES_ID {
        return works.iter().collect();
    }
    works
        .iter()
        .filter(|work| work.category_key() == Some(category_id))
        .collect()
}

/// Parse a remembered category id, falling back to "Tous" when it is missing,
/// malformed, or no longer part of the catalog.
pub fn resolve_selected_category(saved: Option<&str>, catalog: &Catalog) -> u64 {
    saved
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|id| catalog.category(*id).is_some())
        .unwrap_or(ALL_CATEGORIES_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::work::Category;

    fn work(id: u64, category: Option<Category>, category_id: Option<u64>) -> Work {
        Work {
            id,
            title: format!("Work {id}"),
            image_url: format!("http://localhost:5678/images/{id}.png"),
            category_id,
            category,
        }
    }

    fn catalog() -> Catalog {
        Catalog::with_all_category(
            vec![
                work(1, Some(Category::new(1, "Objets")), Some(1)),
                work(2, Some(Category::new(2, "Appartements")), Some(2)),
                work(3, None, Some(2)),
            ],
            vec![Category::new(1, "Objets"), Category::new(2, "Appartements")],
        )
    }

    #[test]
    fn all_category_returns_every_work() {
        let catalog = catalog();
        assert_eq!(filter_works(&catalog.works, ALL_CATEGORIES_ID).len(), 3);
    }

    // Works without a nested category are still matched by their flat id.
    #[test]
    fn filter_matches_nested_or_flat_category() {
        let catalog = catalog();
        let ids: Vec<u64> = filter_works(&catalog.works, 2).iter().map(|w| w.id).collect();
        assert_eq!(ids, [2, 3]);
        assert!(filter_works(&catalog.works, 9).is_empty());
    }

    #[test]
    fn saved_category_falls_back_to_all() {
        let catalog = catalog();
        assert_eq!(resolve_selected_category(Some("2"), &catalog), 2);
        assert_eq!(resolve_selected_category(Some("42"), &catalog), 0);
        assert_eq!(resolve_selected_category(Some("abc"), &catalog), 0);
        assert_eq!(resolve_selected_category(None, &catalog), 0);
    }
}
