//! Verification-code generation.

use rand::Rng;

/// Length of verification codes sent by email.
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Alphabet for verification codes: uppercase letters and digits.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random fixed-length verification code.
///
/// Codes are compared case-insensitively on confirmation, so the generated
/// form is always uppercase.
#[must_use]
pub fn generate_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..VERIFICATION_CODE_LENGTH)
        .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length() {
        assert_eq!(generate_verification_code().len(), VERIFICATION_CODE_LENGTH);
    }

    #[test]
    fn test_code_alphabet() {
        for _ in 0..100 {
            let code = generate_verification_code();
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_verification_code()).collect();
        // 36^6 possibilities; 50 draws colliding into one bucket would mean
        // a broken RNG.
        assert!(codes.len() > 1);
    }
}
