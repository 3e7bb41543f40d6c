//! Static bearer-token identity verifier.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use kirchhoff_core::error::{CoreError, CoreResult};
use kirchhoff_core::results::CallerId;
use kirchhoff_core::traits::IdentityVerifier;

/// Resolves tokens from a fixed token → user ID table.
///
/// Note: Custom Debug impl masks tokens to prevent accidental exposure in logs.
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Register a token for `user_id`.
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

impl fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("tokens", &format_args!("<{} masked>", self.tokens.len()))
            .finish()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> CoreResult<CallerId> {
        self.tokens
            .get(token)
            .map(|user| CallerId(user.clone()))
            .ok_or_else(|| CoreError::Unauthorized("invalid or expired token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirchhoff_core::traits::authenticate;

    #[tokio::test]
    async fn known_token_resolves_to_user() {
        let verifier = StaticTokenVerifier::default().with_token("tok-1", "user-1");
        let caller = authenticate(&verifier, Some("Bearer tok-1")).await.unwrap();
        assert_eq!(caller.as_str(), "user-1");
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let verifier = StaticTokenVerifier::default().with_token("tok-1", "user-1");
        let err = authenticate(&verifier, Some("Bearer nope")).await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
        assert!(authenticate(&verifier, None).await.is_err());
    }

    #[test]
    fn debug_masks_tokens() {
        let verifier = StaticTokenVerifier::default().with_token("secret-token", "user-1");
        let debug = format!("{verifier:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("1 masked"));
    }
}
