use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed integers.
///
/// The generator only ever asks for an index in `[0, max_exclusive)`, so this
/// is the whole seam between generation and entropy.
pub trait RandomSource {
	/// Returns an integer in `[0, max_exclusive)`.
	///
	/// `max_exclusive` must be positive; `0` yields `0`.
	fn next_uniform(&mut self, max_exclusive: usize) -> usize;

	/// Whether values come from a cryptographically strong source.
	fn is_cryptographic(&self) -> bool;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
	fn next_uniform(&mut self, max_exclusive: usize) -> usize {
		(**self).next_uniform(max_exclusive)
	}

	fn is_cryptographic(&self) -> bool {
		(**self).is_cryptographic()
	}
}

#[derive(Debug)]
enum Engine {
	Os(StdRng),
	Fallback(SmallRng),
}

/// Default random source.
///
/// Seeded from the operating system entropy source when it is available.
/// Otherwise a fast non-cryptographic generator seeded from the clock is used
/// and [`RandomSource::is_cryptographic`] reports `false`, so callers can warn
/// their users.
#[derive(Debug)]
pub struct SystemRandom {
	engine: Engine,
}

impl SystemRandom {
	pub fn new() -> Self {
		Self::from_os_result(StdRng::try_from_os_rng())
	}

	/// Picks the engine from the outcome of seeding from the OS.
	fn from_os_result<E: fmt::Display>(os: Result<StdRng, E>) -> Self {
		match os {
			Ok(rng) => Self::from_engine(Engine::Os(rng)),
			Err(e) => {
				log::warn!("OS entropy source unavailable ({e}), falling back to a non-cryptographic generator");
				Self::from_engine(Engine::Fallback(SmallRng::seed_from_u64(clock_seed())))
			}
		}
	}

	fn from_engine(engine: Engine) -> Self {
		Self { engine }
	}
}

impl Default for SystemRandom {
	fn default() -> Self {
		Self::new()
	}
}

impl RandomSource for SystemRandom {
	fn next_uniform(&mut self, max_exclusive: usize) -> usize {
		if max_exclusive <= 1 {
			return 0;
		}
		match &mut self.engine {
			Engine::Os(rng) => rng.random_range(0..max_exclusive),
			Engine::Fallback(rng) => rng.random_range(0..max_exclusive),
		}
	}

	fn is_cryptographic(&self) -> bool {
		matches!(self.engine, Engine::Os(_))
	}
}

fn clock_seed() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs() ^ (u64::from(d.subsec_nanos()) << 32))
		.unwrap_or(0)
}

/// Reproducible random source for a given seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
	rng: StdRng,
}

impl SeededRandom {
	pub fn new(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl RandomSource for SeededRandom {
	fn next_uniform(&mut self, max_exclusive: usize) -> usize {
		if max_exclusive <= 1 {
			return 0;
		}
		self.rng.random_range(0..max_exclusive)
	}

	fn is_cryptographic(&self) -> bool {
		false
	}
}

/// Replays a fixed sequence of values, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound so it always lands in
/// range. Used to pin generation down to an exact expected output.
#[derive(Debug, Clone)]
pub struct ReplayRandom {
	values: Vec<usize>,
	position: usize,
}

impl ReplayRandom {
	pub fn new(values: Vec<usize>) -> Self {
		Self { values, position: 0 }
	}

	/// A source that always returns `value` (modulo the bound).
	pub fn constant(value: usize) -> Self {
		Self::new(vec![value])
	}

	/// Number of values handed out so far.
	pub fn draws(&self) -> usize {
		self.position
	}
}

impl RandomSource for ReplayRandom {
	fn next_uniform(&mut self, max_exclusive: usize) -> usize {
		if self.values.is_empty() || max_exclusive == 0 {
			return 0;
		}
		let value = self.values[self.position % self.values.len()];
		self.position += 1;
		value % max_exclusive
	}

	fn is_cryptographic(&self) -> bool {
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn system_random_stays_in_range() {
		let mut rng = SystemRandom::new();
		for bound in [1, 2, 7, 1000] {
			for _ in 0..100 {
				assert!(rng.next_uniform(bound) < bound);
			}
		}
		assert_eq!(rng.next_uniform(0), 0);
	}

	#[test]
	fn failed_os_seeding_falls_back() {
		let mut rng = SystemRandom::from_os_result(Err::<StdRng, _>("no entropy"));
		assert!(!rng.is_cryptographic());
		for bound in [2, 7, 1000] {
			for _ in 0..100 {
				assert!(rng.next_uniform(bound) < bound);
			}
		}
		assert_eq!(rng.next_uniform(1), 0);

		let rng = SystemRandom::from_engine(Engine::Os(StdRng::seed_from_u64(1)));
		assert!(rng.is_cryptographic());
		let rng = SystemRandom::from_engine(Engine::Fallback(SmallRng::seed_from_u64(1)));
		assert!(!rng.is_cryptographic());
	}

	#[test]
	fn seeded_random_is_reproducible() {
		let mut a = SeededRandom::new(42);
		let mut b = SeededRandom::new(42);
		let left: Vec<usize> = (0..32).map(|_| a.next_uniform(1000)).collect();
		let right: Vec<usize> = (0..32).map(|_| b.next_uniform(1000)).collect();
		assert_eq!(left, right);
		assert!(!a.is_cryptographic());
	}

	#[test]
	fn replay_cycles_and_wraps() {
		let mut rng = ReplayRandom::new(vec![0, 5]);
		assert_eq!(rng.next_uniform(10), 0);
		assert_eq!(rng.next_uniform(3), 2);
		assert_eq!(rng.next_uniform(10), 0);
		assert_eq!(rng.draws(), 3);
	}

	#[test]
	fn uniform_enough() {
		let mut rng = SeededRandom::new(7);
		let mut buckets = [0usize; 4];
		for _ in 0..4000 {
			buckets[rng.next_uniform(4)] += 1;
		}
		for count in buckets {
			assert!((800..1200).contains(&count), "skewed bucket: {count}");
		}
	}
}
