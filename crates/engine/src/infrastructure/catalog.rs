//! Card catalog loading.
//!
//! The catalog ships with the engine as JSON. `GACHA_CATALOG_PATH` can point
//! at a replacement file with the same shape.

use std::path::Path;

use gacha_domain::{CardCatalog, CardCatalogEntry, DomainError};

const BUNDLED_CATALOG: &str = include_str!("../../data/cards.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] DomainError),
}

/// Parse and validate a JSON array of catalog entries.
pub fn parse_catalog(json: &str) -> Result<CardCatalog, CatalogLoadError> {
    let entries: Vec<CardCatalogEntry> = serde_json::from_str(json)?;
    Ok(CardCatalog::new(entries)?)
}

pub fn bundled_catalog() -> Result<CardCatalog, CatalogLoadError> {
    parse_catalog(BUNDLED_CATALOG)
}

/// Load from `path` when given, otherwise the bundled catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<CardCatalog, CatalogLoadError> {
    let Some(path) = path else {
        let catalog = bundled_catalog()?;
        tracing::info!(cards = catalog.len(), "Loaded bundled card catalog");
        return Ok(catalog);
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_catalog(&json)?;
    tracing::info!(
        path = %path.display(),
        cards = catalog.len(),
        "Loaded card catalog"
    );
    Ok(catalog)
}
