use async_trait::async_trait;
use modwatch_destiny::{NotifyError, Notifier};
use modwatch_storage::UserCredential;
use tracing::info;

/// Reports unowned mods through the log instead of a chat channel.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user: &UserCredential, mod_names: &[String]) -> Result<(), NotifyError> {
        info!(
            user = %user.bungie_username,
            discord_channel_id = user.discord_channel_id.as_deref().unwrap_or("-"),
            mods = %mod_names.join(", "),
            "Ada-1 is selling {} mod(s) {} does not own",
            mod_names.len(),
            user.bungie_username
        );
        Ok(())
    }
}
