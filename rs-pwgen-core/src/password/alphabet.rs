use super::random::RandomSource;

/// Decimal digits.
pub const DIGITS: &str = "0123456789";

/// Symbols always available when symbols are allowed.
pub const SYMBOLS: &str = "!#$%()*+,-./-:;=?@[\\]^_`{|}~";

/// Characters that need escaping in XML, only added when `xml_safe` is off.
pub const XML_UNSAFE: &str = "<>&\"'";

/// An ordered, fixed set of characters.
///
/// Order matters: the same random index always selects the same character,
/// which keeps generation reproducible under a replayed random source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alphabet {
	chars: Vec<char>,
}

impl Alphabet {
	pub fn new(chars: &str) -> Self {
		Self { chars: chars.chars().collect() }
	}

	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Appends every character of `other`, keeping duplicates.
	pub fn extend(&mut self, other: &Alphabet) {
		self.chars.extend_from_slice(&other.chars);
	}

	/// Draws one character uniformly.
	///
	/// Returns `None` on an empty alphabet.
	pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<char> {
		if self.chars.is_empty() {
			return None;
		}
		self.chars.get(rng.next_uniform(self.chars.len())).copied()
	}
}

/// The three alphabets used by the generator.
///
/// Defaults to [`DIGITS`], [`SYMBOLS`] and [`XML_UNSAFE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabets {
	pub digits: Alphabet,
	pub symbols: Alphabet,
	pub xml_unsafe: Alphabet,
}

impl Default for Alphabets {
	fn default() -> Self {
		Self::new(DIGITS, SYMBOLS, XML_UNSAFE)
	}
}

impl Alphabets {
	pub fn new(digits: &str, symbols: &str, xml_unsafe: &str) -> Self {
		Self {
			digits: Alphabet::new(digits),
			symbols: Alphabet::new(symbols),
			xml_unsafe: Alphabet::new(xml_unsafe),
		}
	}

	/// Symbol alphabet in effect for the given `xml_safe` setting.
	pub fn symbol_set(&self, xml_safe: bool) -> Alphabet {
		let mut set = self.symbols.clone();
		if !xml_safe {
			set.extend(&self.xml_unsafe);
		}
		set
	}

	/// Concatenation of the enabled numeric and symbol alphabets, used to
	/// synthesize items when no letters are allowed.
	pub fn synthetic_set(&self, numbers: bool, symbols: bool, xml_safe: bool) -> Alphabet {
		let mut set = Alphabet::default();
		if numbers {
			set.extend(&self.digits);
		}
		if symbols {
			set.extend(&self.symbol_set(xml_safe));
		}
		set
	}
}
