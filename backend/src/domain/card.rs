//! Card catalogue primitives.
//!
//! Cards are addressed by pack and in-pack number. The combined card id is
//! the lowercase string `"{pack}-{number}"`; pack ids contain dashes, so the
//! id is always split on its *last* dash.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors raised by card identifier constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardValidationError {
    /// Pack id is empty or not a dash-separated slug.
    #[error("pack id must be a lowercase slug such as genetic-apex-a1")]
    InvalidPack,
    /// Card number is empty or contains non-alphanumeric characters.
    #[error("card number must be alphanumeric")]
    InvalidNumber,
    /// Card id lacks the `{pack}-{number}` shape.
    #[error("card id must look like {{pack}}-{{number}}")]
    InvalidCardId,
    /// A required display field was blank.
    #[error("card {field} must not be empty")]
    EmptyField {
        /// Name of the blank field.
        field: &'static str,
    },
}

static PACK_RE: OnceLock<Regex> = OnceLock::new();
static NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn pack_regex() -> &'static Regex {
    PACK_RE.get_or_init(|| {
        Regex::new("^[a-z0-9]+(-[a-z0-9]+)*$")
            .unwrap_or_else(|error| panic!("pack id regex failed to compile: {error}"))
    })
}

fn number_regex() -> &'static Regex {
    NUMBER_RE.get_or_init(|| {
        Regex::new("^[a-z0-9]+$")
            .unwrap_or_else(|error| panic!("card number regex failed to compile: {error}"))
    })
}

/// Catalogue pack slug, e.g. `genetic-apex-a1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackId(String);

impl PackId {
    /// Validate and construct a pack id. Input is lowercased first.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CardValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if pack_regex().is_match(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(CardValidationError::InvalidPack)
        }
    }

    /// Borrow the slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PackId {
    type Error = CardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PackId> for String {
    fn from(value: PackId) -> Self {
        value.0
    }
}

/// Card number within a pack. Usually numeric, but promo packs use letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardNumber(String);

impl CardNumber {
    /// Validate and construct a card number. Input is lowercased first.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CardValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if number_regex().is_match(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(CardValidationError::InvalidNumber)
        }
    }

    /// Borrow the raw number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Numeric value when the number is purely decimal.
    #[must_use]
    pub fn numeric_value(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for CardNumber {
    // Decimal numbers sort numerically ahead of alphanumeric ones.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_value(), other.numeric_value()) {
            (Some(left), Some(right)) => left.cmp(&right).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for CardNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CardNumber {
    type Error = CardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardNumber> for String {
    fn from(value: CardNumber) -> Self {
        value.0
    }
}

/// Canonical card identifier, `"{pack}-{number}"` in lowercase.
///
/// # Examples
/// ```
/// use tradepost::domain::CardId;
///
/// let id = CardId::parse("Genetic-Apex-A1-12").expect("valid card id");
/// assert_eq!(id.as_str(), "genetic-apex-a1-12");
/// assert_eq!(id.pack().as_str(), "genetic-apex-a1");
/// assert_eq!(id.number().as_str(), "12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId {
    raw: String,
    pack: PackId,
    number: CardNumber,
}

impl CardId {
    /// Combine a pack and number into a card id.
    #[must_use]
    pub fn from_parts(pack: PackId, number: CardNumber) -> Self {
        let raw = format!("{pack}-{number}");
        Self { raw, pack, number }
    }

    /// Parse a card id by splitting on its last dash.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, CardValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        let (pack, number) = normalised
            .rsplit_once('-')
            .ok_or(CardValidationError::InvalidCardId)?;
        let pack = PackId::new(pack).map_err(|_| CardValidationError::InvalidCardId)?;
        let number = CardNumber::new(number).map_err(|_| CardValidationError::InvalidCardId)?;
        Ok(Self::from_parts(pack, number))
    }

    /// Borrow the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Pack component.
    #[must_use]
    pub fn pack(&self) -> &PackId {
        &self.pack
    }

    /// Number component.
    #[must_use]
    pub fn number(&self) -> &CardNumber {
        &self.number
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for CardId {
    type Error = CardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CardId> for String {
    fn from(value: CardId) -> Self {
        value.raw
    }
}

/// Display names of packs in release order. Unknown packs sort after these.
const PACK_RELEASE_ORDER: &[&str] = &["Genetic Apex A1", "Mythical Islands A2"];

/// Rank used when ordering catalogue output.
#[must_use]
pub fn pack_rank(pack_name: &str) -> usize {
    PACK_RELEASE_ORDER
        .iter()
        .position(|known| *known == pack_name)
        .unwrap_or(PACK_RELEASE_ORDER.len())
}

/// Immutable catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueCard {
    /// Pack the card belongs to.
    pub pack: PackId,
    /// Number within the pack.
    pub number: CardNumber,
    /// Display name.
    pub name: String,
    /// Artwork location.
    pub image_url: String,
    /// Pack display name, e.g. `Genetic Apex A1`.
    pub pack_name: String,
    /// Rarity marker as printed in the catalogue source.
    pub rarity: String,
}

impl CatalogueCard {
    /// Build a catalogue entry, rejecting blank display fields.
    pub fn new(
        pack: PackId,
        number: CardNumber,
        name: impl Into<String>,
        image_url: impl Into<String>,
        pack_name: impl Into<String>,
        rarity: impl Into<String>,
    ) -> Result<Self, CardValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CardValidationError::EmptyField { field: "name" });
        }
        let pack_name = pack_name.into();
        if pack_name.trim().is_empty() {
            return Err(CardValidationError::EmptyField { field: "pack name" });
        }
        Ok(Self {
            pack,
            number,
            name,
            image_url: image_url.into(),
            pack_name,
            rarity: rarity.into(),
        })
    }

    /// Canonical id of this card.
    #[must_use]
    pub fn id(&self) -> CardId {
        CardId::from_parts(self.pack.clone(), self.number.clone())
    }
}

/// Sort cards by pack release order, then pack id, then card number.
pub fn sort_catalogue(cards: &mut [CatalogueCard]) {
    cards.sort_by(|left, right| {
        pack_rank(&left.pack_name)
            .cmp(&pack_rank(&right.pack_name))
            .then_with(|| left.pack.cmp(&right.pack))
            .then_with(|| left.number.cmp(&right.number))
    });
}
