//! Registered participants and the bearer tokens that identify them.

use derive_getters::Getters;
use derive_more::Display;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strictly_tictactoe::{Participant, ParticipantId};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Shortest accepted display name.
pub const MIN_USERNAME_LEN: usize = 3;
/// Longest accepted display name.
pub const MAX_USERNAME_LEN: usize = 32;

/// User directory failure.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum UserError {
    /// Name outside the accepted length range.
    #[display("Username must be between 3 and 32 characters, got {_0}")]
    InvalidUsername(usize),
    /// Another participant already uses the name.
    #[display("Username '{_0}' is already taken")]
    UsernameTaken(String),
    /// No participant goes by the name.
    #[display("User '{_0}' not found")]
    UnknownUser(String),
}

impl std::error::Error for UserError {}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Registration {
    /// The new participant.
    participant: Participant,
    /// Opaque token to present as `Authorization: Bearer <token>`.
    access_token: String,
    /// Always `bearer`.
    token_type: String,
}

#[derive(Debug, Default)]
struct Directory {
    by_name: HashMap<String, Participant>,
    tokens: HashMap<String, ParticipantId>,
    by_id: HashMap<ParticipantId, Participant>,
    last_id: u64,
}

/// In-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    inner: Arc<RwLock<Directory>>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `username` and issues its token.
    ///
    /// # Errors
    ///
    /// [`UserError::InvalidUsername`] for names of the wrong length (after
    /// trimming), [`UserError::UsernameTaken`] for duplicates.
    #[instrument(skip(self))]
    pub fn register(&self, username: &str) -> Result<Registration, UserError> {
        let username = username.trim();
        let len = username.chars().count();
        if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
            warn!(len, "Rejected username length");
            return Err(UserError::InvalidUsername(len));
        }

        let mut dir = self.inner.write();
        if dir.by_name.contains_key(username) {
            warn!("Username already taken");
            return Err(UserError::UsernameTaken(username.to_string()));
        }

        dir.last_id += 1;
        let participant = Participant::new(ParticipantId::new(dir.last_id), username);
        let token = Uuid::new_v4().simple().to_string();
        dir.by_name
            .insert(username.to_string(), participant.clone());
        dir.by_id.insert(*participant.id(), participant.clone());
        dir.tokens.insert(token.clone(), *participant.id());
        info!(participant = %participant.id(), "User registered");

        Ok(Registration {
            participant,
            access_token: token,
            token_type: "bearer".to_string(),
        })
    }

    /// Resolves a bearer token.
    pub fn authenticate(&self, token: &str) -> Option<Participant> {
        let dir = self.inner.read();
        let found = dir
            .tokens
            .get(token)
            .and_then(|id| dir.by_id.get(id))
            .cloned();
        if found.is_none() {
            debug!("Unknown token");
        }
        found
    }

    /// Looks a participant up by display name.
    ///
    /// # Errors
    ///
    /// [`UserError::UnknownUser`] if nobody registered the name.
    pub fn by_name(&self, username: &str) -> Result<Participant, UserError> {
        self.inner
            .read()
            .by_name
            .get(username)
            .cloned()
            .ok_or_else(|| UserError::UnknownUser(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_register_then_authenticate() {
        let users = UserDirectory::new();
        let reg = users.register("alice").expect("register");
        assert_eq!(reg.token_type(), "bearer");
        assert_eq!(users.authenticate(reg.access_token()), Some(reg.participant().clone()));
        assert_eq!(users.by_name("alice"), Ok(reg.participant().clone()));
        assert_eq!(users.by_name("carol"), Err(UserError::UnknownUser("carol".to_string())));
        assert!(users.authenticate("bogus").is_none());
    }

    #[test]
    fn test_ids_and_tokens_are_distinct() {
        let users = UserDirectory::new();
        let a = users.register("alice").expect("alice");
        let b = users.register("bob").expect("bob");
        assert_ne!(a.participant().id(), b.participant().id());
        assert_ne!(a.access_token(), b.access_token());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let users = UserDirectory::new();
        users.register("alice").expect("first");
        assert_eq!(
            users.register(" alice "),
            Err(UserError::UsernameTaken("alice".to_string()))
        );
    }

    #[rstest]
    #[case("ab")]
    #[case("   ")]
    #[case("abcdefghijklmnopqrstuvwxyz0123456")]
    fn test_length_limits(#[case] name: &str) {
        assert!(matches!(
            UserDirectory::new().register(name),
            Err(UserError::InvalidUsername(_))
        ));
    }
}
