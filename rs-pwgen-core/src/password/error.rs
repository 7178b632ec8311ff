use std::fmt;

use thiserror::Error;

/// Character classes an alphabet can back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
	Numbers,
	Symbols,
}

impl fmt::Display for CharacterClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CharacterClass::Numbers => f.write_str("numbers"),
			CharacterClass::Symbols => f.write_str("symbols"),
		}
	}
}

/// Failures reported by [`Generator::generate`](super::generator::Generator::generate).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
	/// Letters, capitals, numbers and symbols are all disallowed.
	#[error("no character class selected, nothing to build a password from")]
	NoCharacterClassSelected,

	/// Letters were requested but the word list has no usable entry.
	#[error("word list is empty or still loading")]
	WordListUnavailable,

	/// The rejection sampling loop hit its cap without finding a word.
	#[error("no word satisfied the active constraints after {attempts} attempts")]
	ConstraintsUnsatisfiable { attempts: usize },

	/// An alphabet required by the active constraints has no characters.
	#[error("the {0} alphabet is empty")]
	EmptyAlphabet(CharacterClass),
}

/// Failures while retrieving or decoding a word list.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("failed to read word list: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid word list cache: {0}")]
	Cache(#[from] postcard::Error),

	/// Transport failure, only produced by the `http` feature.
	#[error("failed to fetch word list: {0}")]
	Http(String),
}
