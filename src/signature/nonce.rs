//! Random nonce generation.
//!
//! Nonces are drawn uniformly from `[A-Za-z0-9]`. Uniqueness is not tracked
//! here; the receiving side decides whether to remember them.

use rand::distributions::Alphanumeric;
use rand::{CryptoRng, Rng};

/// Generate a nonce of `length` characters using the thread-local CSPRNG.
pub fn generate_nonce(length: usize) -> String {
    generate_nonce_with(&mut rand::thread_rng(), length)
}

/// Generate a nonce from a caller-supplied cryptographic RNG.
///
/// Tests pass a seeded `StdRng` to get reproducible output.
pub fn generate_nonce_with<R>(rng: &mut R, length: usize) -> String
where
    R: Rng + CryptoRng,
{
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_nonce_length_and_alphabet() {
        for length in [1, 16, 64] {
            let nonce = generate_nonce(length);
            assert_eq!(nonce.len(), length);
            assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_zero_length_nonce() {
        assert_eq!(generate_nonce(0), "");
    }

    #[test]
    fn test_successive_nonces_differ() {
        let first = generate_nonce(16);
        let second = generate_nonce(16);
        assert_ne!(first, second);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(generate_nonce_with(&mut a, 16), generate_nonce_with(&mut b, 16));

        let mut c = StdRng::seed_from_u64(8);
        let mut d = StdRng::seed_from_u64(7);
        assert_ne!(generate_nonce_with(&mut c, 16), generate_nonce_with(&mut d, 16));
    }

    #[test]
    fn test_all_symbol_classes_appear() {
        let mut rng = StdRng::seed_from_u64(42);
        let sample = generate_nonce_with(&mut rng, 2_000);
        assert!(sample.chars().any(|c| c.is_ascii_lowercase()));
        assert!(sample.chars().any(|c| c.is_ascii_uppercase()));
        assert!(sample.chars().any(|c| c.is_ascii_digit()));
    }
}
