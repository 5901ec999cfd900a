use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single catalog record as exported by the storefront.
///
/// Only `stone_type` is guaranteed by the export; every other field may be
/// absent and is backfilled with a display fallback at formatting time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub stone_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
}

/// The full product table, loaded once at startup and never mutated.
///
/// Handlers share it behind an `Arc`; lookups are plain linear scans since
/// the dataset is a few hundred records at most.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from a JSON array on disk.
    ///
    /// A missing or malformed file is fatal for the caller; there is no
    /// partial-load or reload path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        let products: Vec<Product> = serde_json::from_str(&raw)
            .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })?;
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Consume the catalog, e.g. to rewrite records before saving them back.
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct category labels, sorted ascending.
    pub fn stone_types(&self) -> Vec<String> {
        let mut labels: Vec<String> =
            self.products.iter().map(|product| product.stone_type.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Up to `limit` distinct labels, used to suggest categories when a
    /// query matches nothing.
    pub fn sample_stone_types(&self, limit: usize) -> Vec<String> {
        let mut labels = self.stone_types();
        labels.truncate(limit);
        labels
    }
}
