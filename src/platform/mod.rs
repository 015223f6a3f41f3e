use crate::messages::ReplyMessage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod discord;

/// Permission bits shared with the platform wire format.
pub const PERMISSION_VIEW_CHANNEL: u64 = 1 << 10;
pub const PERMISSION_SEND_MESSAGES: u64 = 1 << 11;
pub const PERMISSION_READ_MESSAGE_HISTORY: u64 = 1 << 16;

/// The resolved context of one inbound interaction. `is_cached_guild` is
/// false when the trigger could not be tied to a fully-cached guild
/// membership, in which case no guild-scoped work may run.
#[derive(Debug, Clone)]
pub struct InteractionContext {
    pub id: String,
    pub token: String,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub everyone_role_id: Option<String>,
    pub is_cached_guild: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: String,
    pub guild_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionOverwrite {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OverwriteKind,
    pub allow: String,
    pub deny: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum OverwriteKind {
    Role,
    Member,
}

impl From<OverwriteKind> for u8 {
    fn from(kind: OverwriteKind) -> Self {
        match kind {
            OverwriteKind::Role => 0,
            OverwriteKind::Member => 1,
        }
    }
}

impl PermissionOverwrite {
    pub fn deny_role(role_id: &str, deny: u64) -> Self {
        Self {
            id: role_id.to_string(),
            kind: OverwriteKind::Role,
            allow: "0".to_string(),
            deny: deny.to_string(),
        }
    }

    pub fn allow_member(user_id: &str, allow: u64) -> Self {
        Self {
            id: user_id.to_string(),
            kind: OverwriteKind::Member,
            allow: allow.to_string(),
            deny: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelParams {
    pub name: String,
    #[serde(rename = "parent_id")]
    pub parent_id: String,
    #[serde(rename = "permission_overwrites")]
    pub overwrites: Vec<PermissionOverwrite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextInputStyle {
    Short,
    Paragraph,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInput {
    pub custom_id: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub max_length: Option<u32>,
    pub style: TextInputStyle,
    pub required: bool,
    pub prefill: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSpec {
    pub custom_id: String,
    pub title: String,
    pub inputs: Vec<FormInput>,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited { retry_after: Option<u64> },
    #[error("API error [{code:?}]: {message}")]
    Api {
        code: Option<String>,
        message: String,
    },
}

/// Abstract chat-platform boundary. The workflow engine only ever issues
/// these calls; the wire protocol lives behind the implementation.
#[async_trait::async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn reply_ephemeral(
        &self,
        ctx: &InteractionContext,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError>;

    async fn defer_reply(&self, ctx: &InteractionContext) -> Result<(), PlatformError>;

    async fn edit_reply(
        &self,
        ctx: &InteractionContext,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError>;

    async fn post_to_channel(
        &self,
        channel_id: &str,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError>;

    async fn show_form(
        &self,
        ctx: &InteractionContext,
        form: &FormSpec,
    ) -> Result<(), PlatformError>;

    async fn create_channel(
        &self,
        guild_id: &str,
        params: &ChannelParams,
    ) -> Result<ChannelRef, PlatformError>;

    async fn delete_channel(&self, channel: &ChannelRef) -> Result<(), PlatformError>;
}
