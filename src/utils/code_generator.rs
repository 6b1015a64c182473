//! Short code generation.
//!
//! Codes are drawn from the operating system's secure random source so they
//! cannot be predicted from previously issued codes.

/// Number of characters in a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Alphabet short codes are drawn from (`a-z`, `A-Z`, `0-9`).
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of the alphabet size that fits in a byte.
///
/// Bytes at or above this value are rejected so every index is equally likely.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// The secure random source could not produce bytes.
#[derive(Debug, thiserror::Error)]
#[error("secure random source unavailable: {0}")]
pub struct GenerationError(#[from] getrandom::Error);

/// Generates a random short code of [`CODE_LENGTH`] characters.
///
/// Each character is an independent, uniformly distributed pick from
/// [`ALPHABET`], giving 62^6 possible codes.
///
/// # Errors
///
/// Returns [`GenerationError`] if the system random number generator fails.
/// The failure only affects the current attempt.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> Result<String, GenerationError> {
    let mut code = String::with_capacity(CODE_LENGTH);
    let mut buffer = [0u8; 16];

    while code.len() < CODE_LENGTH {
        getrandom::fill(&mut buffer)?;

        for &byte in buffer.iter().filter(|&&b| b < ACCEPT_BELOW) {
            code.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
            if code.len() == CODE_LENGTH {
                break;
            }
        }
    }

    Ok(code)
}

/// Returns true if `code` has the shape of a generated short code.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
