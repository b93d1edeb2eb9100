//! Session token state

use super::protocol::Token;

/// Protocol progress derived from the held tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Unauthenticated,
    /// Account token held
    Authenticated,
    /// Account and session tokens held
    LoggedIn,
}

/// Account and session tokens
///
/// A session token is only ever held together with an account token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    account_id: Option<Token>,
    session_id: Option<Token>,
}

impl Session {
    pub const fn new() -> Self {
        Self {
            account_id: None,
            session_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.account_id, &self.session_id) {
            (Some(_), Some(_)) => SessionState::LoggedIn,
            (Some(_), None) => SessionState::Authenticated,
            (None, _) => SessionState::Unauthenticated,
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Store a new account token, dropping any session issued for the old one
    pub fn set_account(&mut self, token: Token) {
        self.account_id = Some(token);
        self.session_id = None;
    }

    /// Store a session token; refused without an account token
    pub fn set_session(&mut self, token: Token) -> bool {
        if self.account_id.is_none() {
            return false;
        }
        self.session_id = Some(token);
        true
    }

    /// Drop both tokens
    pub fn clear(&mut self) {
        self.account_id = None;
        self.session_id = None;
    }
}
