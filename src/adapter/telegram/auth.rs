//! Allow-list check for incoming messages.

use tracing::warn;

/// Reply sent to users outside the allow-list.
pub const ACCESS_DENIED: &str = "⛔ Access denied\n\n\
    You are not authorized to use this bot.\n\
    Please contact the administrator to request access.";

/// Check if a user may talk to the bot.
///
/// An empty allow-list admits everyone.
pub fn is_authorized(user_id: u64, allowed: &[u64]) -> bool {
    if allowed.is_empty() || allowed.contains(&user_id) {
        return true;
    }

    warn!(user_id, "Ignoring Telegram message from unauthorized user");
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allow_list_admits_everyone() {
        assert!(is_authorized(42, &[]));
    }

    #[test]
    fn listed_user_is_authorized() {
        assert!(is_authorized(42, &[7, 42]));
    }

    #[test]
    fn unlisted_user_is_rejected() {
        assert!(!is_authorized(43, &[7, 42]));
    }
}
