use crate::commands::{CommandSurface, HaltHandler};
use crate::messages::{
    self, code_block, error_label, info_label, inline_code, relative_timestamp, warning_label,
    Embed, ReplyMessage,
};
use crate::platform::{ChatPlatform, InteractionContext};
use chrono::{DateTime, Utc};
use log::error;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionKind {
    BotNotAllowed,
    NoDmPermission,
    ClientMissingPermissions(Vec<String>),
    MemberMissingPermissions(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    Cooldown { ends_at: DateTime<Utc> },
    InvalidArguments(Vec<String>),
    MissingArguments(Vec<String>),
    UncaughtError(String),
    Precondition(PreconditionKind),
}

/// A failed command execution, as reported by the framework's precondition
/// and execution machinery.
#[derive(Debug, Clone)]
pub struct HaltSignal {
    pub command: String,
    pub surface: CommandSurface,
    pub reason: HaltReason,
    pub interaction: Option<InteractionContext>,
    pub channel_id: Option<String>,
}

/// Shared final-fallback halt handler: classifies the reason, renders the
/// matching embed, and emits it through the surface's response channel.
pub struct HaltDispatcher {
    platform: Arc<dyn ChatPlatform>,
}

impl HaltDispatcher {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self { platform }
    }

    pub fn render(reason: &HaltReason) -> Embed {
        match reason {
            HaltReason::Cooldown { ends_at } => Embed::new(messages::COLOUR_DEFAULT)
                .author("Cooldown Active")
                .description(format!(
                    "You are on an active cooldown. You may re-use this command {}",
                    relative_timestamp(*ends_at)
                )),
            HaltReason::InvalidArguments(options) => Embed::new(messages::COLOUR_ERROR)
                .author("Invalid Arguments")
                .description(format!(
                    "Invalid value given to option(s): {}",
                    join_inline_code(options)
                )),
            HaltReason::MissingArguments(options) => Embed::new(messages::COLOUR_ERROR)
                .author("Invalid Arguments")
                .description(format!(
                    "Missing required argument(s): {}",
                    join_inline_code(options)
                )),
            HaltReason::UncaughtError(detail) => Embed::new(messages::COLOUR_ERROR)
                .author("Error")
                .description(code_block("ts", detail)),
            HaltReason::Precondition(PreconditionKind::BotNotAllowed) => {
                Embed::new(messages::COLOUR_ERROR)
                    .author("No Bot Permission")
                    .description("Bots are not allowed to execute this command")
            }
            HaltReason::Precondition(PreconditionKind::NoDmPermission) => {
                Embed::new(messages::COLOUR_WARNING)
                    .author("No DM Access")
                    .description(
                        "You are not allowed to use this command in DMs and must be executed in a server",
                    )
            }
            HaltReason::Precondition(PreconditionKind::ClientMissingPermissions(permissions)) => {
                Embed::new(messages::COLOUR_ERROR)
                    .author("Missing Bot Permissions")
                    .description(
                        [
                            error_label(
                                "I am missing the required permissions to execute this command",
                            ),
                            warning_label(&format!(
                                "Missing permissions {}",
                                join_inline_code(permissions)
                            )),
                            info_label("Contact the server staff or developer if this issue persists"),
                        ]
                        .join("\n"),
                    )
            }
            HaltReason::Precondition(PreconditionKind::MemberMissingPermissions(permissions)) => {
                Embed::new(messages::COLOUR_ERROR)
                    .author("Missing Permissions")
                    .description(
                        [
                            error_label(
                                "You are missing the required permissions to execute this command",
                            ),
                            warning_label(&format!(
                                "Missing permissions {}",
                                join_inline_code(permissions)
                            )),
                            info_label(
                                "Contact the server staff or developer if you think this is a mistake",
                            ),
                        ]
                        .join("\n"),
                    )
            }
        }
    }

    /// Emits the rendered embed on the correct response channel for the
    /// surface. A failed emission is logged once with enough context to
    /// diagnose, never retried, never re-surfaced to the user.
    pub async fn dispatch(&self, signal: &HaltSignal) -> bool {
        let message = ReplyMessage::embed(Self::render(&signal.reason));

        match signal.surface {
            CommandSurface::Slash | CommandSurface::ContextMenu => {
                let Some(ctx) = signal.interaction.as_ref() else {
                    error!(
                        "[CRITICAL HALT FAILURE] no interaction attached to {:?} halt for {} {}",
                        signal.reason, signal.surface, signal.command
                    );
                    return true;
                };
                if let Err(e) = self.platform.reply_ephemeral(ctx, &message).await {
                    error!(
                        "[HALT FAILURE] Failed to reply to interaction at {}: {} for {:?} halt: {e}",
                        signal.surface, signal.command, signal.reason
                    );
                }
            }
            CommandSurface::Message => {
                let Some(channel_id) = signal.channel_id.as_deref() else {
                    error!(
                        "[CRITICAL HALT FAILURE] no channel attached to {:?} halt for {} {}",
                        signal.reason, signal.surface, signal.command
                    );
                    return true;
                };
                if let Err(e) = self.platform.post_to_channel(channel_id, &message).await {
                    error!(
                        "[HALT FAILURE] Failed to post to channel at {}: {} for {:?} halt: {e}",
                        signal.surface, signal.command, signal.reason
                    );
                }
            }
        }

        true
    }
}

#[async_trait::async_trait]
impl HaltHandler for HaltDispatcher {
    async fn handle(&self, signal: &HaltSignal) -> bool {
        self.dispatch(signal).await
    }
}

fn join_inline_code(items: &[String]) -> String {
    items
        .iter()
        .map(|item| inline_code(item))
        .collect::<Vec<_>>()
        .join(" ")
}
