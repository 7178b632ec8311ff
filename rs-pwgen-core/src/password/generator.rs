use super::alphabet::{Alphabet, Alphabets};
use super::constraints::{Constraints, SeparatorMode};
use super::error::{CharacterClass, GenerationError};
use super::random::RandomSource;
use super::word_list::WordList;

/// Default cap on word draws per item.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Password generator over a loaded word list.
///
/// # Responsibilities
/// - Pick one item per position, from the word list or synthesized from
///   the numeric and symbol alphabets
/// - Apply capitalization and forced character classes per item
/// - Join items with the selected separator and truncate the result
///
/// The generator holds no per-call state. Constraints and entropy are
/// passed to [`Generator::generate`], so one generator can serve any number
/// of callers.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
	word_list: &'a WordList,
	alphabets: Alphabets,
	max_attempts: usize,
}

impl<'a> Generator<'a> {
	/// Creates a generator with the default alphabets and retry cap.
	pub fn new(word_list: &'a WordList) -> Self {
		Self {
			word_list,
			alphabets: Alphabets::default(),
			max_attempts: DEFAULT_MAX_ATTEMPTS,
		}
	}

	/// Replaces the digit, symbol and XML-unsafe alphabets.
	pub fn with_alphabets(mut self, alphabets: Alphabets) -> Self {
		self.alphabets = alphabets;
		self
	}

	/// Sets how many words may be drawn for one item before giving up.
	///
	/// A value of `0` is raised to `1`.
	pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
		self.max_attempts = max_attempts.max(1);
		self
	}

	pub fn alphabets(&self) -> &Alphabets {
		&self.alphabets
	}

	pub fn max_attempts(&self) -> usize {
		self.max_attempts
	}

	/// Generates one password.
	///
	/// # Errors
	/// - [`GenerationError::NoCharacterClassSelected`] if no class is allowed
	/// - [`GenerationError::WordListUnavailable`] if letters are wanted and
	///   the word list has no usable entry
	/// - [`GenerationError::ConstraintsUnsatisfiable`] if no word passes the
	///   filters within the retry cap
	/// - [`GenerationError::EmptyAlphabet`] if a required alphabet is empty
	///
	/// # Notes
	/// - `constraints` is read through [`Constraints::normalized`].
	/// - With a deterministic `rng` the output is fully reproducible.
	pub fn generate<R: RandomSource + ?Sized>(
		&self,
		constraints: &Constraints,
		rng: &mut R,
	) -> Result<String, GenerationError> {
		let constraints = constraints.normalized();

		if !constraints.any_class_allowed() {
			return Err(GenerationError::NoCharacterClassSelected);
		}
		if constraints.uses_words() && self.word_list.is_empty() {
			return Err(GenerationError::WordListUnavailable);
		}

		let symbols = self.alphabets.symbol_set(constraints.xml_safe);
		self.check_alphabets(&constraints, &symbols)?;

		let count = constraints.item_count();
		let mut result = String::new();
		for index in 0..count {
			let item = self.item(&constraints, &symbols, rng)?;
			result.push_str(&item);

			if index + 1 < count {
				match constraints.separator {
					SeparatorMode::Space => result.push(' '),
					SeparatorMode::Symbol => {
						if let Some(c) = symbols.pick(rng) {
							result.push(c);
						}
					}
					SeparatorMode::None => (),
				}
			}
		}

		if let Some(max_len) = constraints.max_len {
			result = truncate(&result, max_len);
		}

		log::debug!(
			"generated {} item(s) from '{}' ({} chars)",
			count,
			self.word_list.name(),
			result.chars().count()
		);
		Ok(result)
	}

	/// Fails early when an alphabet the constraints rely on is empty.
	fn check_alphabets(&self, constraints: &Constraints, symbols: &Alphabet) -> Result<(), GenerationError> {
		let needs_digits = constraints.must_numbers
			|| (!constraints.uses_words() && constraints.may_numbers && !constraints.may_symbols);
		if needs_digits && self.alphabets.digits.is_empty() {
			return Err(GenerationError::EmptyAlphabet(CharacterClass::Numbers));
		}

		let needs_symbols = constraints.must_symbols
			|| constraints.separator == SeparatorMode::Symbol
			|| (!constraints.uses_words() && constraints.may_symbols && !constraints.may_numbers);
		if needs_symbols && symbols.is_empty() {
			return Err(GenerationError::EmptyAlphabet(CharacterClass::Symbols));
		}

		if !constraints.uses_words()
			&& self.alphabets.synthetic_set(constraints.may_numbers, constraints.may_symbols, constraints.xml_safe).is_empty()
		{
			let class = if constraints.may_numbers { CharacterClass::Numbers } else { CharacterClass::Symbols };
			return Err(GenerationError::EmptyAlphabet(class));
		}
		Ok(())
	}

	/// Builds one item: candidate, capitalization, forced classes.
	fn item<R: RandomSource + ?Sized>(
		&self,
		constraints: &Constraints,
		symbols: &Alphabet,
		rng: &mut R,
	) -> Result<String, GenerationError> {
		let mut word = if constraints.uses_words() {
			self.pick_word(constraints, rng)?
		} else {
			self.synthesize(constraints, rng)
		};

		if constraints.must_capitals {
			word = randomize_case(&word, rng);
		} else if constraints.may_capitals && rng.next_uniform(2) == 1 {
			word = title_case(&word);
		}

		if constraints.must_numbers && !has_digit(&word) {
			if let Some(c) = self.alphabets.digits.pick(rng) {
				word.push(c);
			}
		}
		if constraints.must_symbols && !has_symbol(&word) {
			if let Some(c) = symbols.pick(rng) {
				word.push(c);
			}
		}

		if !constraints.may_capitals && constraints.may_letters {
			word = word.to_lowercase();
		} else if !constraints.may_letters && constraints.may_capitals {
			word = word.to_uppercase();
		}

		Ok(word)
	}

	/// Rejection sampling over the word list.
	///
	/// A word is accepted when it is non-empty, has digits only if numbers
	/// are allowed, and has non-alphanumeric characters only if symbols are.
	fn pick_word<R: RandomSource + ?Sized>(
		&self,
		constraints: &Constraints,
		rng: &mut R,
	) -> Result<String, GenerationError> {
		for _ in 0..self.max_attempts {
			let Some(word) = self.word_list.get(rng.next_uniform(self.word_list.len())) else {
				continue;
			};
			if word.is_empty() {
				continue;
			}
			if !constraints.may_numbers && has_digit(word) {
				continue;
			}
			if !constraints.may_symbols && has_symbol(word) {
				continue;
			}
			return Ok(word.to_owned());
		}

		log::warn!(
			"no acceptable word in '{}' after {} attempts",
			self.word_list.name(),
			self.max_attempts
		);
		Err(GenerationError::ConstraintsUnsatisfiable { attempts: self.max_attempts })
	}

	/// Builds a pseudo-word from digits and/or symbols, as long as an
	/// average dictionary word.
	fn synthesize<R: RandomSource + ?Sized>(&self, constraints: &Constraints, rng: &mut R) -> String {
		let set = self.alphabets.synthetic_set(constraints.may_numbers, constraints.may_symbols, constraints.xml_safe);
		(0..self.word_list.synthetic_len())
			.filter_map(|_| set.pick(rng))
			.collect()
	}
}

/// Generates one password with the default alphabets and retry cap.
pub fn generate<R: RandomSource + ?Sized>(
	constraints: &Constraints,
	word_list: &WordList,
	rng: &mut R,
) -> Result<String, GenerationError> {
	Generator::new(word_list).generate(constraints, rng)
}

fn has_digit(word: &str) -> bool {
	word.chars().any(|c| c.is_ascii_digit())
}

fn has_symbol(word: &str) -> bool {
	word.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Upper-cases each letter with probability ½.
fn randomize_case<R: RandomSource + ?Sized>(word: &str, rng: &mut R) -> String {
	let mut out = String::with_capacity(word.len());
	for c in word.chars() {
		if !c.is_alphabetic() {
			out.push(c);
		} else if rng.next_uniform(2) == 1 {
			out.extend(c.to_uppercase());
		} else {
			out.extend(c.to_lowercase());
		}
	}
	out
}

fn title_case(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Keeps the first `max_len` characters (UTF-8 aware).
fn truncate(s: &str, max_len: usize) -> String {
	s.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::password::random::{ReplayRandom, SeededRandom};

	fn fruit() -> WordList {
		WordList::from_words("fruit", vec!["apple".to_owned(), "banana".to_owned()])
	}

	fn letters_only() -> Constraints {
		Constraints { may_letters: true, count: Some(1), ..Constraints::none() }
	}

	#[test]
	fn plain_word_with_constant_source() {
		let list = fruit();
		let mut rng = ReplayRandom::constant(0);
		assert_eq!(generate(&letters_only(), &list, &mut rng).unwrap(), "apple");
	}

	#[test]
	fn forced_symbol_is_appended() {
		let list = fruit();
		let generator = Generator::new(&list).with_alphabets(Alphabets::new("0123456789", "!#$", ""));
		let constraints = Constraints { must_symbols: true, ..letters_only() };
		// word index 0, then symbol index 1
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generator.generate(&constraints, &mut rng).unwrap(), "apple#");
	}

	#[test]
	fn no_class_selected() {
		let list = fruit();
		let mut rng = ReplayRandom::constant(0);
		let result = generate(&Constraints::none(), &list, &mut rng);
		assert_eq!(result, Err(GenerationError::NoCharacterClassSelected));
		assert_eq!(rng.draws(), 0);
	}

	#[test]
	fn letters_need_a_word_list() {
		let list = WordList::parse("empty", "\n\n");
		let mut rng = ReplayRandom::constant(0);
		let result = generate(&letters_only(), &list, &mut rng);
		assert_eq!(result, Err(GenerationError::WordListUnavailable));
	}

	#[test]
	fn numbers_only_do_not_need_words() {
		let list = WordList::parse("empty", "");
		let constraints = Constraints { may_numbers: true, must_numbers: true, count: Some(2), ..Constraints::none() };
		let mut rng = SeededRandom::new(1);
		// synthetic items are empty, the forced digit is still there
		let password = generate(&constraints, &list, &mut rng).unwrap();
		assert_eq!(password.chars().count(), 3);
		assert!(password.split(' ').all(|item| item.len() == 1 && has_digit(item)));
	}

	#[test]
	fn unsatisfiable_constraints_are_bounded() {
		let list = WordList::from_words("digits", vec!["abc1".to_owned(), "x-y".to_owned()]);
		let generator = Generator::new(&list).with_max_attempts(50);
		let mut rng = SeededRandom::new(3);
		let result = generator.generate(&letters_only(), &mut rng);
		assert_eq!(result, Err(GenerationError::ConstraintsUnsatisfiable { attempts: 50 }));
	}

	#[test]
	fn words_with_digits_or_symbols_are_rejected() {
		let list = WordList::from_words(
			"mixed",
			vec!["r2d2".to_owned(), "".to_owned(), "o'neil".to_owned(), "plain".to_owned()],
		);
		let mut rng = ReplayRandom::new(vec![0, 1, 2, 3]);
		assert_eq!(generate(&letters_only(), &list, &mut rng).unwrap(), "plain");
		assert_eq!(rng.draws(), 4);
	}

	#[test]
	fn synthetic_items_use_average_length() {
		let list = WordList::from_words("w", vec!["abcd".to_owned(), "abcdef".to_owned()]);
		let constraints = Constraints {
			may_numbers: true,
			count: Some(3),
			separator: SeparatorMode::None,
			..Constraints::none()
		};
		let mut rng = ReplayRandom::constant(7);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "777777777777777");
	}

	#[test]
	fn title_case_on_heads() {
		let list = fruit();
		let constraints = Constraints { may_capitals: true, ..letters_only() };
		// word index 1, coin 1
		let mut rng = ReplayRandom::new(vec![1, 1]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "Banana");

		let mut rng = ReplayRandom::new(vec![1, 0]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "banana");
	}

	#[test]
	fn must_capitals_randomizes_each_letter() {
		let list = fruit();
		let constraints = Constraints { must_capitals: true, ..letters_only() };
		// word 0, then case draws for a-p-p-l-e
		let mut rng = ReplayRandom::new(vec![0, 1, 0, 1, 0, 1]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "ApPlE");
	}

	#[test]
	fn capitals_without_letters_upper_cases() {
		let list = fruit();
		let constraints = Constraints { may_capitals: true, count: Some(1), ..Constraints::none() };
		let mut rng = ReplayRandom::constant(0);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "APPLE");
	}

	#[test]
	fn must_capitals_without_letters_upper_cases() {
		let list = fruit();
		let constraints = Constraints { must_capitals: true, count: Some(1), ..Constraints::none() };
		// the per-letter draws would give "ApPlE", letters being off wins
		let mut rng = ReplayRandom::new(vec![0, 1, 0, 1, 0, 1]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "APPLE");

		let constraints = Constraints { count: Some(4), ..constraints };
		for seed in 0..20 {
			let password = generate(&constraints, &list, &mut SeededRandom::new(seed)).unwrap();
			assert!(!password.chars().any(|c| c.is_lowercase()), "{password}");
		}
	}

	#[test]
	fn separators() {
		let list = fruit();
		let generator = Generator::new(&list).with_alphabets(Alphabets::new("0123456789", "!#$", ""));

		let space = Constraints { count: Some(2), ..letters_only() };
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generator.generate(&space, &mut rng).unwrap(), "apple banana");

		let none = Constraints { separator: SeparatorMode::None, ..space.clone() };
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generator.generate(&none, &mut rng).unwrap(), "applebanana");

		let symbol = Constraints { separator: SeparatorMode::Symbol, may_symbols: true, ..space };
		// word 0, separator 2, word 1
		let mut rng = ReplayRandom::new(vec![0, 2, 1]);
		assert_eq!(generator.generate(&symbol, &mut rng).unwrap(), "apple$banana");
	}

	#[test]
	fn truncation_is_a_plain_cut() {
		let list = fruit();
		let constraints = Constraints { count: Some(2), max_len: Some(7), ..letters_only() };
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "apple b");

		let constraints = Constraints { max_len: Some(50), ..constraints };
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "apple banana");

		let constraints = Constraints { max_len: Some(0), ..constraints };
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generate(&constraints, &list, &mut rng).unwrap(), "");
	}

	#[test]
	fn xml_unsafe_symbols_follow_the_flag() {
		let list = WordList::from_words("w", vec!["abc".to_owned()]);
		let generator = Generator::new(&list).with_alphabets(Alphabets::new("0", "!", "<"));
		let constraints = Constraints { must_symbols: true, xml_safe: false, ..letters_only() };
		// word 0, symbol index 1 lands on the XML extension
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generator.generate(&constraints, &mut rng).unwrap(), "abc<");

		let constraints = Constraints { xml_safe: true, ..constraints };
		let mut rng = ReplayRandom::new(vec![0, 1]);
		assert_eq!(generator.generate(&constraints, &mut rng).unwrap(), "abc!");
	}

	#[test]
	fn empty_digit_alphabet_is_reported() {
		let list = fruit();
		let generator = Generator::new(&list).with_alphabets(Alphabets::new("", "!", ""));
		let constraints = Constraints { must_numbers: true, ..letters_only() };
		let mut rng = ReplayRandom::constant(0);
		assert_eq!(
			generator.generate(&constraints, &mut rng),
			Err(GenerationError::EmptyAlphabet(CharacterClass::Numbers))
		);
	}

	#[test]
	fn zero_count_defaults_to_six() {
		let list = fruit();
		let constraints = Constraints { count: Some(0), ..letters_only() };
		let mut rng = SeededRandom::new(9);
		let password = generate(&constraints, &list, &mut rng).unwrap();
		assert_eq!(password.split(' ').count(), 6);
	}

	#[test]
	fn title_case_helper() {
		assert_eq!(title_case("élan"), "Élan");
		assert_eq!(title_case(""), "");
	}
}
