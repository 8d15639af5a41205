//! # Session Gate
//!
//! Which top-level view is showing. There is no credential check: signing in
//! always succeeds, and there is no way back out for the rest of the process.
//!
//! ```text
//! LoggedOut ──login()──▶ LoggedIn
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn,
}

impl Session {
    /// Moves to `LoggedIn`. Idempotent.
    pub fn login(&mut self) {
        *self = Session::LoggedIn;
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn)
    }
}
