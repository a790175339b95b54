// Credential store handed to the API client at construction time

use crate::venue::AuthUser;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<AuthUser>,
}

// Shared handle to the signed-in user's credentials.
// Clones point at the same state, so the host can keep one handle and give
// another to the client.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(Some(token.into()));
        session
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        self.state.write().token = token;
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state.read().user.clone()
    }

    pub fn sign_in(&self, user: AuthUser) {
        let mut state = self.state.write();
        state.token = Some(user.access_token.clone());
        state.user = Some(user);
    }

    pub fn sign_out(&self) {
        let mut state = self.state.write();
        state.token = None;
        state.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().token.is_some()
    }

    pub fn is_venue_manager(&self) -> bool {
        self.state
            .read()
            .user
            .as_ref()
            .map_or(false, |user| user.venue_manager)
    }
}
