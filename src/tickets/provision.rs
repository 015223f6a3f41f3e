use crate::platform::{
    ChannelParams, ChannelRef, ChatPlatform, PermissionOverwrite, PlatformError,
    PERMISSION_READ_MESSAGE_HISTORY, PERMISSION_SEND_MESSAGES, PERMISSION_VIEW_CHANNEL,
};
use std::sync::Arc;

/// Creates the private ticket channel: parented under the configured
/// category, hidden from the guild's everyone role, visible to the creator
/// only. Single attempt; failures propagate to the caller as-is.
pub struct ChannelProvisioner {
    platform: Arc<dyn ChatPlatform>,
}

impl ChannelProvisioner {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self { platform }
    }

    pub fn channel_name(username: &str, ticket_id: &str) -> String {
        format!("{username}-ticket-{ticket_id}")
    }

    pub async fn create(
        &self,
        guild_id: &str,
        parent_id: &str,
        name: &str,
        owner_user_id: &str,
        everyone_role_id: &str,
    ) -> Result<ChannelRef, PlatformError> {
        let params = ChannelParams {
            name: name.to_string(),
            parent_id: parent_id.to_string(),
            overwrites: vec![
                PermissionOverwrite::deny_role(everyone_role_id, PERMISSION_VIEW_CHANNEL),
                PermissionOverwrite::allow_member(
                    owner_user_id,
                    PERMISSION_VIEW_CHANNEL
                        | PERMISSION_SEND_MESSAGES
                        | PERMISSION_READ_MESSAGE_HISTORY,
                ),
            ],
        };

        self.platform.create_channel(guild_id, &params).await
    }

    pub async fn delete(&self, channel: &ChannelRef) -> Result<(), PlatformError> {
        self.platform.delete_channel(channel).await
    }
}
