use crate::error::SimError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// One generated input value subjected to hashing. Immutable once built;
/// duplicates across generation calls are permitted and are distinct from
/// hash collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(s: impl Into<String>) -> Self {
        Token(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token(s.to_owned())
    }
}

/// Generate `count` tokens of exactly `length` characters, each drawn
/// independently and uniformly from the alphanumeric alphabet
/// (letters + digits). `length` must be at least 1.
pub fn generate_tokens<R: Rng>(
    rng: &mut R,
    count: usize,
    length: usize,
) -> Result<Vec<Token>, SimError> {
    if length < 1 {
        return Err(SimError::InvalidArgument(format!(
            "token length must be >= 1, got {length}"
        )));
    }
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let s: String = (0..length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        out.push(Token(s));
    }
    Ok(out)
}

/// Generate `count` tokens of `byte_length` random bytes each, rendered as a
/// lowercase hex string (so the token text is `2 * byte_length` characters).
/// `byte_length` must be at least 1.
pub fn generate_hex_tokens<R: Rng>(
    rng: &mut R,
    count: usize,
    byte_length: usize,
) -> Result<Vec<Token>, SimError> {
    if byte_length < 1 {
        return Err(SimError::InvalidArgument(format!(
            "token byte length must be >= 1, got {byte_length}"
        )));
    }
    let mut out = Vec::with_capacity(count);
    let mut buf = vec![0u8; byte_length];
    for _ in 0..count {
        rng.fill(buf.as_mut_slice());
        let mut s = String::with_capacity(byte_length * 2);
        for b in &buf {
            use fmt::Write;
            // writing into a String cannot fail
            let _ = write!(s, "{b:02x}");
        }
        out.push(Token(s));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn tokens_have_exact_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let toks = generate_tokens(&mut rng, 50, 8).unwrap();
        assert_eq!(toks.len(), 50);
        for t in &toks {
            assert_eq!(t.len(), 8);
            assert!(t.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn hex_tokens_render_two_chars_per_byte() {
        let mut rng = StdRng::seed_from_u64(7);
        let toks = generate_hex_tokens(&mut rng, 10, 8).unwrap();
        for t in &toks {
            assert_eq!(t.len(), 16);
            assert!(t.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn zero_count_is_valid() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_tokens(&mut rng, 0, 4).unwrap().is_empty());
    }

    #[test]
    fn zero_length_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_tokens(&mut rng, 1, 0).is_err());
        assert!(generate_hex_tokens(&mut rng, 1, 0).is_err());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate_tokens(&mut StdRng::seed_from_u64(42), 20, 6).unwrap();
        let b = generate_tokens(&mut StdRng::seed_from_u64(42), 20, 6).unwrap();
        assert_eq!(a, b);
    }
}
