//! Error types for the SPC web session client

use std::fmt;
use thiserror::Error;

/// Why a login attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    /// The panel rendered an explicit "Access denied" marker
    AccessDenied,
    /// The panel answered with the login form again without saying why
    StillOnLoginPage,
}

impl fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessDenied => f.write_str("access denied"),
            Self::StillOnLoginPage => f.write_str("still on login page"),
        }
    }
}

/// Everything the session client can fail with.
///
/// The set is closed so callers can match on it exhaustively, e.g. to
/// mark a panel unavailable while still logging distinct messages.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials rejected, or the login endpoint misbehaved
    #[error("SPC login failed: {0}")]
    Login(LoginFailure),

    /// An expected fragment is missing from a page
    #[error("{0}")]
    Parse(String),

    /// The panel refused a command, or the command itself is invalid
    #[error("{0}")]
    Command(String),

    /// Transport failure, timeout or non-success HTTP status
    #[error("SPC communication error: {0}")]
    Communication(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_messages() {
        assert_eq!(
            Error::Login(LoginFailure::AccessDenied).to_string(),
            "SPC login failed: access denied"
        );
        assert_eq!(
            Error::Login(LoginFailure::StillOnLoginPage).to_string(),
            "SPC login failed: still on login page"
        );
    }

    #[test]
    fn test_command_message_is_verbatim() {
        let err = Error::Command("Exit delay in progress".to_string());
        assert_eq!(err.to_string(), "Exit delay in progress");
    }
}
