//! Client secret generation.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::auth::Secret;

/// Length of generated client passwords.
pub const GENERATED_PASSWORD_LEN: usize = 32;

/// Source of passwords for newly bound OAuth2 clients.
pub trait PasswordGenerator
where
	Self: Send + Sync,
{
	/// Returns a fresh password.
	fn generate(&self) -> Secret;
}

/// Generates [`GENERATED_PASSWORD_LEN`] alphanumeric characters from the thread RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPasswordGenerator;
impl PasswordGenerator for RandomPasswordGenerator {
	fn generate(&self) -> Secret {
		Secret::new(
			rand::rng()
				.sample_iter(Alphanumeric)
				.take(GENERATED_PASSWORD_LEN)
				.map(char::from)
				.collect::<String>(),
		)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn random_passwords_are_alphanumeric_and_distinct() {
		let first = RandomPasswordGenerator.generate();
		let second = RandomPasswordGenerator.generate();

		assert_eq!(first.expose().len(), GENERATED_PASSWORD_LEN);
		assert!(first.expose().chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first, second);
	}
}
