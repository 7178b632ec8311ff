//! Constraint-driven password and passphrase generation.
//!
//! This crate provides:
//! - Word-based passphrases drawn from a dictionary
//! - Synthetic items built from digit and symbol alphabets
//! - Per-item capitalization, required digits/symbols, separators
//! - Pluggable entropy, with a reproducible mode for tests
//!
//! Word lists can be read from memory, files (with a binary cache), or
//! over HTTP with the `http` feature.

/// Core generation types and logic.
pub mod password;

/// File helpers (reading, cache paths, folder listing).
pub mod io;

pub use password::{
	generate, Constraints, GenerationError, Generator, LoadError, RandomSource, SeparatorMode, SystemRandom,
	WordList,
};
