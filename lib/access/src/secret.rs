//! Random secret and temporary password generation.
//!
//! All randomness comes from the operating system CSPRNG. Opaque tokens are
//! URL-safe base64 without padding so they can travel in URLs and cookies
//! unescaped.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Generates a URL-safe random secret from `n_bytes` of OS randomness.
#[must_use]
pub fn url_safe_secret(n_bytes: usize) -> String {
    let mut buf = vec![0u8; n_bytes];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(&buf)
}

/// Generates a temporary password of `len` characters from letters and
/// digits, containing at least one of each by construction.
///
/// # Panics
///
/// Panics if `len < 2`; a password cannot contain a letter and a digit in
/// fewer characters.
#[must_use]
pub fn temp_password(len: usize) -> String {
    assert!(len >= 2, "temporary password must be at least 2 characters");

    let mut chars = Vec::with_capacity(len);
    chars.push(LETTERS[OsRng.gen_range(0..LETTERS.len())]);
    chars.push(DIGITS[OsRng.gen_range(0..DIGITS.len())]);

    for _ in 2..len {
        // Uniform over the combined alphabet.
        let idx = OsRng.gen_range(0..LETTERS.len() + DIGITS.len());
        let c = if idx < LETTERS.len() {
            LETTERS[idx]
        } else {
            DIGITS[idx - LETTERS.len()]
        };
        chars.push(c);
    }

    // Shuffle so the guaranteed letter and digit are not always first.
    chars.shuffle(&mut OsRng);
    String::from_utf8(chars).expect("alphabet is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_safe_secret_has_no_padding_or_unsafe_chars() {
        let secret = url_safe_secret(32);
        assert!(!secret.contains('='));
        assert!(!secret.contains('+'));
        assert!(!secret.contains('/'));
    }

    #[test]
    fn url_safe_secret_length_scales_with_bytes() {
        // base64 without padding: ceil(4n/3) characters.
        assert_eq!(url_safe_secret(32).len(), 43);
        assert_eq!(url_safe_secret(48).len(), 64);
        assert_eq!(url_safe_secret(64).len(), 86);
    }

    #[test]
    fn url_safe_secrets_are_unique() {
        let a = url_safe_secret(32);
        let b = url_safe_secret(32);
        assert_ne!(a, b);
    }

    #[test]
    fn temp_password_has_requested_length() {
        assert_eq!(temp_password(12).len(), 12);
    }

    #[test]
    fn temp_password_contains_letter_and_digit() {
        for _ in 0..50 {
            let pw = temp_password(12);
            assert!(pw.chars().any(|c| c.is_ascii_alphabetic()), "no letter in {pw}");
            assert!(pw.chars().any(|c| c.is_ascii_digit()), "no digit in {pw}");
        }
    }

    #[test]
    fn temp_password_uses_only_letters_and_digits() {
        let pw = temp_password(64);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    #[should_panic(expected = "at least 2 characters")]
    fn temp_password_rejects_tiny_length() {
        let _ = temp_password(1);
    }
}
