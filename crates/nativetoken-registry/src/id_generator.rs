//! Random token id allocation

use nativetoken_core::types::{DEFAULT_TOKEN_VERSION, TOKEN_UNIQUE_ID_MASK};
use nativetoken_core::{RandomEffects, Result, TokenError, TokenId, TokenType};
use std::collections::HashSet;
use tracing::debug;

/// Allocates token ids whose 20-bit unique portion is not yet in use
#[derive(Debug, Clone)]
pub struct TokenIdGenerator {
    max_retry: u32,
    shell_process_name: String,
}

impl TokenIdGenerator {
    /// Generator trying up to `max_retry` draws per allocation
    pub fn new(max_retry: u32, shell_process_name: impl Into<String>) -> Self {
        Self {
            max_retry,
            shell_process_name: shell_process_name.into(),
        }
    }

    /// Draw until a unique id outside `existing` turns up
    pub fn generate<R: RandomEffects>(
        &self,
        random: &R,
        existing: &HashSet<u32>,
        process_name: &str,
    ) -> Result<TokenId> {
        generate_unique_token_id(
            random,
            existing,
            process_name,
            &self.shell_process_name,
            self.max_retry,
        )
    }
}

/// Allocate a token id whose unique portion is not in `existing`.
///
/// An entropy failure aborts at once. Running out of retries yields
/// `IdSpaceExhausted`.
pub fn generate_unique_token_id<R: RandomEffects>(
    random: &R,
    existing: &HashSet<u32>,
    process_name: &str,
    shell_name: &str,
    max_retry: u32,
) -> Result<TokenId> {
    let token_type = if process_name == shell_name {
        TokenType::Shell
    } else {
        TokenType::Native
    };
    for attempt in 1..=max_retry {
        let unique_id = random.random_u32()? & TOKEN_UNIQUE_ID_MASK;
        if existing.contains(&unique_id) {
            debug!("Unique id {:#07x} already taken (attempt {})", unique_id, attempt);
            continue;
        }
        return Ok(TokenId::new(unique_id, token_type, DEFAULT_TOKEN_VERSION));
    }
    Err(TokenError::IdSpaceExhausted {
        attempts: max_retry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use nativetoken_testkit::{FailingRandomHandler, MockRandomHandler, ScriptedRandomHandler};

    fn generator() -> TokenIdGenerator {
        TokenIdGenerator::new(1000, "hdcd")
    }

    #[test]
    fn test_masks_to_twenty_bits() {
        let random = ScriptedRandomHandler::new([0xfff1_2345]);
        let id = generator()
            .generate(&random, &HashSet::new(), "foo")
            .unwrap();
        assert_eq!(id.unique_id(), 0x1_2345);
        assert_eq!(id.reserved(), 0);
        assert_eq!(id.version(), 1);
        assert_eq!(id.token_type(), Some(TokenType::Native));
    }

    #[test]
    fn test_skips_taken_ids() {
        let random = ScriptedRandomHandler::new([5, 0x0010_0005, 6]);
        let existing = HashSet::from([5]);
        let id = generator().generate(&random, &existing, "foo").unwrap();
        assert_eq!(id.unique_id(), 6);
        assert_eq!(random.consumed(), 3);
    }

    #[test]
    fn test_shell_process_gets_shell_type() {
        let random = MockRandomHandler::deterministic();
        let id = generator()
            .generate(&random, &HashSet::new(), "hdcd")
            .unwrap();
        assert_eq!(id.token_type(), Some(TokenType::Shell));

        let id = generator()
            .generate(&random, &HashSet::new(), "hdcd_helper")
            .unwrap();
        assert_eq!(id.token_type(), Some(TokenType::Native));
    }

    #[test]
    fn test_retry_bound() {
        let random = ScriptedRandomHandler::new(std::iter::repeat(9).take(5));
        let generator = TokenIdGenerator::new(3, "hdcd");
        assert_matches!(
            generator.generate(&random, &HashSet::from([9]), "foo"),
            Err(TokenError::IdSpaceExhausted { attempts: 3 })
        );
        assert_eq!(random.consumed(), 3);
        assert_eq!(random.remaining(), 2);
    }

    #[test]
    fn test_entropy_failure_aborts() {
        assert_matches!(
            generator().generate(&FailingRandomHandler, &HashSet::new(), "foo"),
            Err(TokenError::Entropy { .. })
        );
    }

    #[test]
    fn test_free_function_zero_retries() {
        let random = ScriptedRandomHandler::new([1]);
        assert_matches!(
            generate_unique_token_id(&random, &HashSet::new(), "foo", "hdcd", 0),
            Err(TokenError::IdSpaceExhausted { attempts: 0 })
        );
        assert_eq!(random.consumed(), 0);
    }
}
