//! Catalogue import from the pack-keyed JSON source file.
//!
//! The file maps pack ids to card numbers to card details:
//!
//! ```json
//! { "genetic-apex-a1": { "1": { "name": "Bulbasaur", "image_url": "…",
//!   "pack": "Genetic Apex A1", "rarity": "◊" } } }
//! ```
//!
//! Both the server start-up and the `import-catalogue` binary go through
//! [`import_catalogue_file`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{CardNumber, CardValidationError, CatalogueCard, PackId};

/// Errors returned while importing the catalogue.
#[derive(Debug, Error)]
pub enum CatalogueImportError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid catalogue JSON.
    #[error("catalogue parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// An entry failed domain validation.
    #[error("invalid catalogue entry {pack}/{number}: {source}")]
    InvalidCard {
        pack: String,
        number: String,
        #[source]
        source: CardValidationError,
    },
    /// Writing to the catalogue store failed.
    #[error("catalogue store error: {0}")]
    Store(#[from] CatalogueRepositoryError),
}

#[derive(Debug, Deserialize)]
struct CardSource {
    name: String,
    #[serde(default)]
    image_url: String,
    pack: String,
    #[serde(default)]
    rarity: String,
}

type CatalogueSource = BTreeMap<String, BTreeMap<String, CardSource>>;

fn invalid(pack: &str, number: &str) -> impl FnOnce(CardValidationError) -> CatalogueImportError {
    let pack = pack.to_owned();
    let number = number.to_owned();
    move |source| CatalogueImportError::InvalidCard {
        pack,
        number,
        source,
    }
}

/// Parse catalogue JSON into validated cards, ordered by pack id then number.
pub fn parse_catalogue(json: &str) -> Result<Vec<CatalogueCard>, CatalogueImportError> {
    let source: CatalogueSource = serde_json::from_str(json)?;
    let mut cards = Vec::new();
    for (pack_key, entries) in source {
        let pack = PackId::new(&pack_key).map_err(invalid(&pack_key, "*"))?;
        for (number_key, entry) in entries {
            let number =
                CardNumber::new(&number_key).map_err(invalid(&pack_key, &number_key))?;
            let card = CatalogueCard::new(
                pack.clone(),
                number,
                entry.name,
                entry.image_url,
                entry.pack,
                entry.rarity,
            )
            .map_err(invalid(&pack_key, &number_key))?;
            cards.push(card);
        }
    }
    Ok(cards)
}

fn read_catalogue(path: &Path) -> Result<String, CatalogueImportError> {
    let read_error = |source| CatalogueImportError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "catalogue path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(Path::new(file_name)).map_err(read_error)
}

/// Read the catalogue at `path` and upsert every card into `catalogue`.
///
/// Returns the number of rows written.
pub async fn import_catalogue_file<R>(
    path: &Path,
    catalogue: &R,
) -> Result<usize, CatalogueImportError>
where
    R: CatalogueRepository + ?Sized,
{
    let cards = parse_catalogue(&read_catalogue(path)?)?;
    let written = catalogue.upsert_cards(&cards).await?;
    info!(path = %path.display(), cards = cards.len(), written, "catalogue imported");
    Ok(written)
}
