use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Number of items generated when no valid count is supplied.
pub const DEFAULT_COUNT: usize = 6;

/// What goes between two consecutive items.
///
/// # Variants
/// - `Space`: a single space.
/// - `Symbol`: one random character of the active symbol alphabet.
/// - `None`: items are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorMode {
	#[default]
	Space,
	Symbol,
	None,
}

impl FromStr for SeparatorMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"space" => Ok(SeparatorMode::Space),
			"symbol" => Ok(SeparatorMode::Symbol),
			"none" => Ok(SeparatorMode::None),
			other => Err(format!("Separator must be 'space', 'symbol' or 'none', got '{other}'")),
		}
	}
}

impl fmt::Display for SeparatorMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SeparatorMode::Space => f.write_str("space"),
			SeparatorMode::Symbol => f.write_str("symbol"),
			SeparatorMode::None => f.write_str("none"),
		}
	}
}

/// Caller-selected options for one generation.
///
/// `Constraints` is plain data: the generator reads it and never mutates it.
/// Use [`Constraints::normalized`] to get the view the generator actually
/// works with.
///
/// # Invariants (after normalization)
/// - every `must_*` flag implies its `may_*` flag
/// - `separator` is never `Symbol` unless symbols are allowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
	/// Lower-case letters may appear.
	pub may_letters: bool,

	/// Every letter gets a random case.
	pub must_capitals: bool,

	/// Items may be title-cased.
	pub may_capitals: bool,

	/// Digits may appear.
	pub may_numbers: bool,

	/// Every item contains at least one digit.
	pub must_numbers: bool,

	/// Non-alphanumeric characters may appear.
	pub may_symbols: bool,

	/// Every item contains at least one non-alphanumeric character.
	pub must_symbols: bool,

	/// Keep `<>&"'` out of the symbol alphabet.
	pub xml_safe: bool,

	/// Number of items. `None` or `Some(0)` fall back to [`DEFAULT_COUNT`].
	///
	/// Read leniently: anything that is not a positive integer is `None`.
	#[serde(deserialize_with = "lenient_count")]
	pub count: Option<usize>,

	/// Truncate the final string to this many characters.
	///
	/// Non-numeric input means no limit; a negative value is an error.
	#[serde(deserialize_with = "lenient_max_len")]
	pub max_len: Option<usize>,

	pub separator: SeparatorMode,
}

impl Default for Constraints {
	fn default() -> Self {
		Self {
			may_letters: true,
			must_capitals: false,
			may_capitals: true,
			may_numbers: true,
			must_numbers: false,
			may_symbols: false,
			must_symbols: false,
			xml_safe: true,
			count: None,
			max_len: None,
			separator: SeparatorMode::Space,
		}
	}
}

impl Constraints {
	/// Constraints with every class disabled, a starting point for builders.
	pub fn none() -> Self {
		Self {
			may_letters: false,
			may_capitals: false,
			may_numbers: false,
			..Self::default()
		}
	}

	/// Returns a copy with the coupling rules applied.
	///
	/// - a required class is also an allowed class
	/// - without symbols, a `Symbol` separator becomes `Space`
	pub fn normalized(&self) -> Self {
		let mut normalized = self.clone();
		normalized.may_capitals |= normalized.must_capitals;
		normalized.may_numbers |= normalized.must_numbers;
		normalized.may_symbols |= normalized.must_symbols;

		if !normalized.may_symbols && normalized.separator == SeparatorMode::Symbol {
			log::warn!("symbol separator requested without symbols, using a space instead");
			normalized.separator = SeparatorMode::Space;
		}
		normalized
	}

	/// True when at least one character class is allowed.
	pub fn any_class_allowed(&self) -> bool {
		self.may_letters || self.may_capitals || self.may_numbers || self.may_symbols
	}

	/// True when items are dictionary words rather than synthesized strings.
	pub fn uses_words(&self) -> bool {
		self.may_letters || self.may_capitals
	}

	/// Effective number of items.
	pub fn item_count(&self) -> usize {
		match self.count {
			Some(count) if count > 0 => count,
			_ => DEFAULT_COUNT,
		}
	}
}

/// Parses a raw item count.
///
/// Anything that is not a positive integer yields `None`, which
/// [`Constraints::item_count`] turns into [`DEFAULT_COUNT`].
pub fn parse_count(raw: &str) -> Option<usize> {
	match raw.trim().parse::<i64>() {
		Ok(count) if count > 0 => usize::try_from(count).ok(),
		_ => None,
	}
}

/// Parses a raw maximum length.
///
/// - empty or non-numeric input means "no limit" (`Ok(None)`)
/// - a negative value is rejected
pub fn parse_max_len(raw: &str) -> Result<Option<usize>, String> {
	let raw = raw.trim();
	if raw.is_empty() {
		return Ok(None);
	}
	match raw.parse::<i64>() {
		Ok(len) if len < 0 => Err(format!("max_len must be >= 0, got {len}")),
		Ok(len) => Ok(usize::try_from(len).ok()),
		Err(_) => Ok(None),
	}
}

/// A number as it may arrive: native (JSON) or as text (query strings).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
	Number(i64),
	Text(String),
}

impl RawNumber {
	fn into_text(self) -> String {
		match self {
			RawNumber::Number(n) => n.to_string(),
			RawNumber::Text(s) => s,
		}
	}
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
	let raw = Option::<RawNumber>::deserialize(deserializer)?;
	Ok(raw.and_then(|raw| parse_count(&raw.into_text())))
}

fn lenient_max_len<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
	match Option::<RawNumber>::deserialize(deserializer)? {
		Some(raw) => parse_max_len(&raw.into_text()).map_err(de::Error::custom),
		None => Ok(None),
	}
}
