//! Session errors

use crate::traits::TransportError;

/// Protocol step that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Authenticate,
    Login,
    Fetch,
}

/// Errors surfaced by the session client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Network failure, never retried inline
    Transport(TransportError),
    /// Non-200 status from a protocol step
    Rejected { step: Step, status: u16 },
    /// 200 response whose token was empty, null or unparsable
    InvalidToken(Step),
    /// Step attempted without the token it needs
    NotAuthenticated,
    /// Fetch still rejected after one re-login
    SessionExpired { status: u16 },
    /// Request URL or body does not fit its buffer
    RequestTooLarge,
}

impl From<TransportError> for SessionError {
    fn from(e: TransportError) -> Self {
        SessionError::Transport(e)
    }
}

impl SessionError {
    /// Step the error belongs to, if any
    pub fn step(&self) -> Option<Step> {
        match self {
            SessionError::Rejected { step, .. } | SessionError::InvalidToken(step) => Some(*step),
            SessionError::SessionExpired { .. } => Some(Step::Fetch),
            _ => None,
        }
    }
}
