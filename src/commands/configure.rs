use crate::messages::{
    self, error_label, success_label, tip_label, Embed, ReplyMessage,
};
use crate::platform::{ChatPlatform, InteractionContext};
use crate::tickets::store::{ConfigStore, StoreError};
use crate::tickets::{CreationMethod, TicketConfig};
use log::{error, warn};
use std::sync::Arc;

/// Parsed `/configure` subcommand.
#[derive(Debug, Clone)]
pub enum ConfigureAction {
    System {
        create_channel_id: String,
        parent_channel_id: String,
        transcripts_channel_id: String,
        creation_method: CreationMethod,
        embed_title: Option<String>,
        embed_description: Option<String>,
    },
    EnableSystem,
    DisableSystem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    ContextUnavailable,
    Updated,
    Toggled { enabled: bool },
    AlreadyInState { enabled: bool },
    NoConfiguration,
    StoreFailed,
}

pub struct ConfigureCommand {
    platform: Arc<dyn ChatPlatform>,
    configs: Arc<dyn ConfigStore>,
}

impl ConfigureCommand {
    pub fn new(platform: Arc<dyn ChatPlatform>, configs: Arc<dyn ConfigStore>) -> Self {
        Self { platform, configs }
    }

    pub async fn handle(
        &self,
        ctx: &InteractionContext,
        action: ConfigureAction,
    ) -> ConfigureOutcome {
        let guild_id = match (&ctx.guild_id, ctx.is_cached_guild) {
            (Some(guild_id), true) => guild_id.clone(),
            _ => {
                self.reply_immediate(
                    ctx,
                    error_embed("This can only be used from a server I am a member of"),
                )
                .await;
                return ConfigureOutcome::ContextUnavailable;
            }
        };

        if let Err(e) = self.platform.defer_reply(ctx).await {
            warn!("Failed to defer configure reply: {e}");
        }

        match action {
            ConfigureAction::System {
                create_channel_id,
                parent_channel_id,
                transcripts_channel_id,
                creation_method,
                embed_title,
                embed_description,
            } => {
                // An existing config keeps its enabled state across the
                // wholesale rewrite; a fresh one starts enabled.
                let enabled = match self.configs.get(&guild_id).await {
                    Ok(Some(existing)) => existing.enabled,
                    Ok(None) => true,
                    Err(e) => {
                        error!("Failed to read ticket config for guild {guild_id}: {e}");
                        self.edit_with(ctx, database_error_embed()).await;
                        return ConfigureOutcome::StoreFailed;
                    }
                };

                let config = TicketConfig {
                    guild_id: guild_id.clone(),
                    create_channel_id,
                    parent_channel_id,
                    transcripts_channel_id,
                    creation_method: creation_method.to_string(),
                    embed_title,
                    embed_description,
                    enabled,
                };

                if let Err(e) = self.configs.upsert(&config).await {
                    error!("Failed to upsert ticket config for guild {guild_id}: {e}");
                    self.edit_with(ctx, database_error_embed()).await;
                    return ConfigureOutcome::StoreFailed;
                }

                self.edit_with(
                    ctx,
                    success_embed("Successfully sent the configuration data to the database"),
                )
                .await;
                ConfigureOutcome::Updated
            }
            ConfigureAction::EnableSystem => self.toggle(ctx, &guild_id, true).await,
            ConfigureAction::DisableSystem => self.toggle(ctx, &guild_id, false).await,
        }
    }

    async fn toggle(
        &self,
        ctx: &InteractionContext,
        guild_id: &str,
        enabled: bool,
    ) -> ConfigureOutcome {
        let verb = if enabled { "enabled" } else { "disabled" };

        let config = match self.configs.get(guild_id).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                self.edit_with(
                    ctx,
                    error_embed_with_tip(
                        "The configuration was unable to be fetched from the database",
                        "Try running /configure system to add configuration data if you never did",
                    ),
                )
                .await;
                return ConfigureOutcome::NoConfiguration;
            }
            Err(e) => {
                error!("Failed to read ticket config for guild {guild_id}: {e}");
                self.edit_with(ctx, database_error_embed()).await;
                return ConfigureOutcome::StoreFailed;
            }
        };

        if config.enabled == enabled {
            self.edit_with(
                ctx,
                Embed::new(messages::COLOUR_SUCCESS)
                    .author("Success?")
                    .description(format!(
                        "{}\n\nLooks like the system was already {verb}. But hey, you achieved \
                         your goal anyways",
                        success_label(&format!("Successfully {verb} the ticketing system"))
                    )),
            )
            .await;
            return ConfigureOutcome::AlreadyInState { enabled };
        }

        match self.configs.set_enabled(guild_id, enabled).await {
            Ok(()) => {
                self.edit_with(
                    ctx,
                    success_embed(&format!("Successfully {verb} the ticketing system")),
                )
                .await;
                ConfigureOutcome::Toggled { enabled }
            }
            Err(StoreError::NotFound) => {
                self.edit_with(
                    ctx,
                    error_embed_with_tip(
                        "The configuration was unable to be fetched from the database",
                        "Try running /configure system to add configuration data if you never did",
                    ),
                )
                .await;
                ConfigureOutcome::NoConfiguration
            }
            Err(e) => {
                error!("Failed to toggle ticket system for guild {guild_id}: {e}");
                self.edit_with(ctx, database_error_embed()).await;
                ConfigureOutcome::StoreFailed
            }
        }
    }

    async fn reply_immediate(&self, ctx: &InteractionContext, embed: Embed) {
        if let Err(e) = self
            .platform
            .reply_ephemeral(ctx, &ReplyMessage::embed(embed))
            .await
        {
            warn!("Failed to reply to configure interaction: {e}");
        }
    }

    async fn edit_with(&self, ctx: &InteractionContext, embed: Embed) {
        if let Err(e) = self
            .platform
            .edit_reply(ctx, &ReplyMessage::embed(embed))
            .await
        {
            warn!("Failed to edit configure reply: {e}");
        }
    }
}

fn error_embed(message: &str) -> Embed {
    Embed::new(messages::COLOUR_ERROR)
        .author("Error")
        .description(error_label(message))
}

fn error_embed_with_tip(message: &str, tip: &str) -> Embed {
    Embed::new(messages::COLOUR_ERROR)
        .author("Error")
        .description(format!("{}\n\n{}", error_label(message), tip_label(tip)))
}

fn database_error_embed() -> Embed {
    error_embed("The database could not be updated. Please try again later")
}

fn success_embed(message: &str) -> Embed {
    Embed::new(messages::COLOUR_SUCCESS)
        .author("Success")
        .description(success_label(message))
}
