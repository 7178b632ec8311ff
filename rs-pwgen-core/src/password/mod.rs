//! Top-level module for password generation.
//!
//! This module provides:
//! - Character alphabets (`Alphabet`, `Alphabets`)
//! - Caller-selected options (`Constraints`, `SeparatorMode`)
//! - Dictionary loading (`WordList`, `WordSource`)
//! - Entropy sources (`RandomSource` and its implementations)
//! - The generation algorithm (`Generator`)

/// Digit, symbol and XML-unsafe alphabets.
pub mod alphabet;

/// Caller-selected constraints and their normalization rules.
pub mod constraints;

/// Error types for generation and word-list loading.
pub mod error;

/// Item selection, capitalization, forced classes, separators.
pub mod generator;

/// Uniform integer sources: OS-seeded, seeded, replayed.
pub mod random;

/// Word list loading from text, files, HTTP, or a binary cache.
pub mod word_list;

pub use alphabet::{Alphabet, Alphabets};
pub use constraints::{Constraints, SeparatorMode, DEFAULT_COUNT};
pub use error::{CharacterClass, GenerationError, LoadError};
pub use generator::{generate, Generator, DEFAULT_MAX_ATTEMPTS};
pub use random::{RandomSource, ReplayRandom, SeededRandom, SystemRandom};
pub use word_list::{FileSource, WordList, WordSource};
#[cfg(feature = "http")]
pub use word_list::HttpSource;
