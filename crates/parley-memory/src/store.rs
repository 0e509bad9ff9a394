//! Per-user session store.
//!
//! Each user gets one [`Session`] behind its own async mutex. Holding the
//! returned [`SessionHandle`] lock for a whole exchange serializes messages
//! from the same user while different users proceed in parallel.

use crate::profile::Profile;
use parley_core::{context::Turn, message::UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared, lockable session for one user.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Bounded conversation history for one user (oldest first), plus what the
/// bot knows about them.
#[derive(Debug, Clone)]
pub struct Session {
    turns: Vec<Turn>,
    max_turns: usize,
    language: Option<String>,
    profile: Option<Profile>,
}

impl Session {
    /// Create an empty session keeping at most `max_turns` turns.
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns: max_turns.max(1),
            language: None,
            profile: None,
        }
    }

    /// Append a turn, then drop the oldest turns beyond the window.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        if self.turns.len() > self.max_turns {
            let excess = self.turns.len() - self.max_turns;
            self.turns.drain(..excess);
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Language detected on the user's most recent message.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }
}

/// In-process map from user id to session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<UserId, SessionHandle>>>,
    max_turns: usize,
}

impl SessionStore {
    /// Create an empty store whose sessions keep at most `max_turns` turns.
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_turns,
        }
    }

    /// Return the user's session, creating an empty one on first contact.
    pub async fn get_or_create(&self, user_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!("session created for {user_id}");
                Arc::new(Mutex::new(Session::new(self.max_turns)))
            })
            .clone()
    }

    async fn get(&self, user_id: &str) -> Option<SessionHandle> {
        self.sessions.lock().await.get(user_id).cloned()
    }

    /// Copy of the user's turns, or `None` if the user never wrote.
    pub async fn snapshot(&self, user_id: &str) -> Option<Vec<Turn>> {
        let handle = self.get(user_id).await?;
        let session = handle.lock().await;
        Some(session.turns().to_vec())
    }

    /// Store the user's profile, replacing any earlier one.
    pub async fn set_profile(&self, user_id: &str, profile: Profile) {
        let handle = self.get_or_create(user_id).await;
        handle.lock().await.set_profile(profile);
        debug!("profile saved for {user_id}");
    }

    /// The user's profile, if they ever set one.
    pub async fn profile(&self, user_id: &str) -> Option<Profile> {
        let handle = self.get(user_id).await?;
        let session = handle.lock().await;
        session.profile().cloned()
    }

    /// Number of users with a session.
    pub async fn user_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
