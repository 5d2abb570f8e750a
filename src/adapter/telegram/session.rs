//! Per-user interaction modes.

use dashmap::DashMap;

/// What plain text messages from a user are interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Every link is turned into a QR code.
    Qr,
    /// Portfolio commands are accepted.
    Portfolio,
}

/// Concurrent map of user ID to [`Mode`]. Users without an entry are idle.
#[derive(Debug, Default)]
pub struct Sessions {
    modes: DashMap<u64, Mode>,
}

impl Sessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self, user_id: u64) -> Mode {
        self.modes.get(&user_id).map_or(Mode::Idle, |entry| *entry)
    }

    pub fn set(&self, user_id: u64, mode: Mode) {
        if mode == Mode::Idle {
            self.modes.remove(&user_id);
        } else {
            self.modes.insert(user_id, mode);
        }
    }

    /// Return the user to idle, yielding the mode they were in.
    pub fn reset(&self, user_id: u64) -> Mode {
        self.modes
            .remove(&user_id)
            .map_or(Mode::Idle, |(_, mode)| mode)
    }

    /// Number of users in a non-idle mode.
    #[must_use]
    pub fn active(&self) -> usize {
        self.modes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_is_idle() {
        assert_eq!(Sessions::new().mode(1), Mode::Idle);
    }

    #[test]
    fn modes_are_kept_per_user() {
        let sessions = Sessions::new();
        sessions.set(1, Mode::Qr);
        sessions.set(2, Mode::Portfolio);

        assert_eq!(sessions.mode(1), Mode::Qr);
        assert_eq!(sessions.mode(2), Mode::Portfolio);
        assert_eq!(sessions.active(), 2);
    }

    #[test]
    fn reset_returns_previous_mode() {
        let sessions = Sessions::new();
        sessions.set(1, Mode::Portfolio);

        assert_eq!(sessions.reset(1), Mode::Portfolio);
        assert_eq!(sessions.reset(1), Mode::Idle);
        assert_eq!(sessions.active(), 0);
    }

    #[test]
    fn setting_idle_drops_the_entry() {
        let sessions = Sessions::new();
        sessions.set(1, Mode::Qr);
        sessions.set(1, Mode::Idle);
        assert_eq!(sessions.active(), 0);
    }
}
