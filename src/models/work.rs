// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Portfolio works and categories as served by the REST API.

use serde::{Deserialize, Serialize};

use crate::utils::slugify;

/// Id of the pseudo category that selects every work.
pub const ALL_CATEGORIES_ID: u64 = 0;
/// Display name of the pseudo category.
pub const ALL_CATEGORIES_NAME: &str = "Tous";

/// Work category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

impl Category {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The "Tous" entry shown before the server categories.
    pub fn all() -> Self {
        Self::new(ALL_CATEGORIES_ID, ALL_CATEGORIES_NAME)
    }

    pub fn is_all(&self) -> bool {
        self.id == ALL_CATEGORIES_ID
    }

    /// Stable ASCII key for the filter button (e.g. "Hotels & restaurants" -> "hotels-restaurants").
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// A single gallery item.
///
/// Listings embed the full `category`; the create endpoint only returns
/// `categoryId`, so both are optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: u64,
    pub title: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Work {
    /// Category id from the embedded category, falling back to `categoryId`.
    pub fn category_key(&self) -> Option<u64> {
        self.category
            .as_ref()
            .map(|c| c.id)
            .or(self.category_id)
    }
}

/// Upload payload for a new work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewWork {
    pub image: std::path::PathBuf,
    pub title: String,
    pub category_id: u64,
}

/// Works plus categories, with "Tous" always first in `categories`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub works: Vec<Work>,
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog from server categories, prepending the "Tous" entry once.
    pub fn with_all_category(works: Vec<Work>, categories: Vec<Category>) -> Self {
        let mut merged = vec![Category::all()];
        merged.extend(categories.into_iter().filter(|c| !c.is_all()));
        Self {
            works,
            categories: merged,
        }
    }

    /// Categories a new work can be filed under (everything but "Tous").
    pub fn assignable_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| !c.is_all())
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}
