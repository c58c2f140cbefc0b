use crate::util::random_urlsafe_string;

const TOKEN_BYTES: usize = 32;

/// Mints opaque session tokens. Injected into the session manager so tests
/// can substitute a deterministic generator.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 256 bits from the OS CSPRNG, base64url without padding.
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        random_urlsafe_string(TOKEN_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct_and_urlsafe() {
        let generator = RandomTokenGenerator;
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
        // 32 bytes -> 43 base64url characters, no padding
        assert_eq!(a.len(), 43);
        assert!(
            a.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
