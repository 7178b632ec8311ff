use std::path::{Path, PathBuf};
#[cfg(feature = "http")]
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::LoadError;
use crate::io::{build_output_path, get_filename, read_file};

/// Provider of raw word-list text.
///
/// The text is one candidate word per line; transport is up to the
/// implementation.
pub trait WordSource {
	fn fetch_text(&self) -> Result<String, LoadError>;
}

impl WordSource for str {
	fn fetch_text(&self) -> Result<String, LoadError> {
		Ok(self.to_owned())
	}
}

impl WordSource for String {
	fn fetch_text(&self) -> Result<String, LoadError> {
		Ok(self.clone())
	}
}

/// Word list stored in a local text file.
#[derive(Debug, Clone)]
pub struct FileSource {
	path: PathBuf,
}

impl FileSource {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self { path: path.as_ref().to_path_buf() }
	}
}

impl WordSource for FileSource {
	fn fetch_text(&self) -> Result<String, LoadError> {
		Ok(read_file(&self.path)?)
	}
}

/// Word list served over HTTP(S), fetched with a blocking GET.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
	url: String,
	timeout: Duration,
}

#[cfg(feature = "http")]
impl HttpSource {
	pub fn new(url: &str) -> Self {
		Self { url: url.to_owned(), timeout: Duration::new(5, 0) }
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

#[cfg(feature = "http")]
impl WordSource for HttpSource {
	fn fetch_text(&self) -> Result<String, LoadError> {
		let fetch = || -> reqwest::Result<String> {
			let client = reqwest::blocking::Client::builder()
				.timeout(self.timeout)
				.build()?;
			client
				.get(&self.url)
				.send()?
				.error_for_status()?
				.text()
		};
		fetch().map_err(|e| LoadError::Http(e.to_string()))
	}
}

/// Ordered list of candidate dictionary words.
///
/// Loaded once and never mutated afterwards. Empty lines are kept as entries
/// (they count towards the average and are skipped at draw time), so indices
/// match the lines of the source text.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WordList {
	name: String,
	words: Vec<String>,
	average_len: f64,
	usable: usize,
}

impl WordList {
	/// Builds a word list from raw text, one word per line.
	///
	/// A trailing `\r` is removed from each line.
	pub fn parse(name: &str, raw: &str) -> Self {
		let words: Vec<String> = raw
			.split('\n')
			.map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
			.collect();
		Self::from_words(name, words)
	}

	/// Builds a word list from already split words.
	pub fn from_words(name: &str, words: Vec<String>) -> Self {
		let total: usize = words.iter().map(|w| w.chars().count()).sum();
		let average_len = if words.is_empty() {
			0.0
		} else {
			total as f64 / words.len() as f64
		};
		let usable = words.iter().filter(|w| !w.is_empty()).count();

		Self { name: name.to_owned(), words, average_len, usable }
	}

	/// Loads a word list from any [`WordSource`].
	pub fn load<S: WordSource + ?Sized>(name: &str, source: &S) -> Result<Self, LoadError> {
		let text = source.fetch_text()?;
		let list = Self::parse(name, &text);
		log::debug!(
			"loaded word list '{}': {} entries, average length {:.2}",
			list.name, list.words.len(), list.average_len
		);
		Ok(list)
	}

	/// Loads a word list from a text file, named after the file stem.
	pub fn from_file<P: AsRef<Path>>(filepath: P) -> Result<Self, LoadError> {
		let name = get_filename(&filepath)?;
		Self::load(&name, &FileSource::new(filepath))
	}

	/// Loads a word list from a text file, going through a binary cache.
	///
	/// - If `<stem>.bin` exists next to the file, it is decoded with `postcard`.
	/// - Otherwise the text file is parsed and the cache is written for next time.
	pub fn from_file_cached<P: AsRef<Path>>(filepath: P) -> Result<Self, LoadError> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		if binary_data_path.exists() {
			let bytes = std::fs::read(&binary_data_path)?;
			let list: Self = postcard::from_bytes(&bytes)?;
			log::debug!("word list '{}' read from cache {}", list.name, binary_data_path.display());
			return Ok(list);
		}

		let list = Self::from_file(&filepath)?;
		let bytes = postcard::to_stdvec(&list)?;
		std::fs::write(&binary_data_path, bytes)?;
		Ok(list)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Number of entries, empty lines included.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// True when no entry can ever be drawn.
	pub fn is_empty(&self) -> bool {
		self.usable == 0
	}

	/// Arithmetic mean of entry lengths in characters.
	pub fn average_len(&self) -> f64 {
		self.average_len
	}

	/// Length of a synthesized item: the rounded average.
	pub fn synthetic_len(&self) -> usize {
		self.average_len.round() as usize
	}

	pub(crate) fn get(&self, index: usize) -> Option<&str> {
		self.words.get(index).map(String::as_str)
	}
}
