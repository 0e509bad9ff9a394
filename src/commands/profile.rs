//! `/setinfo` and `/viewinfo`.

use parley_memory::{Profile, SessionStore};
use tracing::debug;

const USAGE: &str = "/setinfo Name, Birthday (YYYY-MM-DD), Birthplace";

pub(super) async fn handle_setinfo(sessions: &SessionStore, sender_id: &str, args: &str) -> String {
    if args.is_empty() {
        return format!("Please send your details in this format:\n{USAGE}");
    }
    match Profile::parse(args) {
        Ok(profile) => {
            sessions.set_profile(sender_id, profile).await;
            "Your details have been saved.".to_string()
        }
        Err(e) => {
            debug!("rejected /setinfo from {sender_id}: {e}");
            format!("Invalid format. Please use: {USAGE}")
        }
    }
}

pub(super) async fn handle_viewinfo(sessions: &SessionStore, sender_id: &str) -> String {
    match sessions.profile(sender_id).await {
        Some(p) => format!(
            "Your details:\nName: {}\nBirthday: {}\nBirthplace: {}",
            p.name, p.birthday, p.birthplace
        ),
        None => "You haven't entered any details yet. Use /setinfo.".to_string(),
    }
}
