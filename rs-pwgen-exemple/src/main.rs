use rs_pwgen_core::password::{
    Constraints, GenerationError, Generator, HttpSource, RandomSource, SeededRandom, SeparatorMode,
    SystemRandom, WordList,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // First argument: a word list path or an http(s) URL
    // Text files get a .bin cache next to them on first load
    let source = std::env::args().nth(1).unwrap_or_else(|| "./data/dicelist.txt".to_owned());
    let words = if source.starts_with("http://") || source.starts_with("https://") {
        WordList::load("remote", &HttpSource::new(&source))?
    } else {
        WordList::from_file_cached(&source)?
    };
    println!(
        "Word list '{}': {} entries, average length {:.2}",
        words.name(),
        words.len(),
        words.average_len()
    );

    // The default source prefers the OS entropy source and says so
    let mut rng = SystemRandom::new();
    if !rng.is_cryptographic() {
        log::warn!("No cryptographic random source available, do not use these passwords");
    }

    // Retry cap for the word search: a list without any acceptable word
    // fails instead of spinning forever
    let generator = Generator::new(&words).with_max_attempts(1_000);

    // Defaults: six lower/title-cased words separated by spaces
    let mut constraints = Constraints::default();
    println!("Default: {}", generator.generate(&constraints, &mut rng)?);

    // Four words, every word with a digit and a symbol, symbol separators,
    // at most 32 characters
    constraints.count = Some(4);
    constraints.must_numbers = true;
    constraints.must_symbols = true;
    constraints.separator = SeparatorMode::Symbol;
    constraints.max_len = Some(32);
    println!("Strong:  {}", generator.generate(&constraints, &mut rng)?);

    // Random case on every letter
    constraints.must_capitals = true;
    println!("Mixed:   {}", generator.generate(&constraints, &mut rng)?);

    // No letters at all: items are synthesized from digits and symbols
    let pin = Constraints {
        may_numbers: true,
        count: Some(3),
        separator: SeparatorMode::None,
        ..Constraints::none()
    };
    println!("Digits:  {}", generator.generate(&pin, &mut rng)?);

    // Same seed, same password
    let first = generator.generate(&constraints, &mut SeededRandom::new(2015))?;
    let second = generator.generate(&constraints, &mut SeededRandom::new(2015))?;
    println!("Seeded:  {} == {}", first, second);

    // Nothing selected
    match generator.generate(&Constraints::none(), &mut rng) {
        Err(GenerationError::NoCharacterClassSelected) => println!("Nothing selected: rejected as expected"),
        other => println!("Should not happen: {:?}", other),
    }

    // Letters requested but the list is empty
    let empty = WordList::default();
    match Generator::new(&empty).generate(&Constraints::default(), &mut rng) {
        Err(e) => println!("Empty list: {}", e),
        Ok(_) => println!("Should not happen"),
    }

    // Generate 10 passphrases using the defaults
    let constraints = Constraints { count: Some(5), ..Constraints::default() };
    for i in 0..10 {
        println!("Generated passphrase {}: {}", i + 1, generator.generate(&constraints, &mut rng)?);
    }

    Ok(())
}
