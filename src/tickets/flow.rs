use crate::messages::{
    self, channel_mention, error_label, info_label, success_label, tip_label, ActionRow, Button,
    ButtonStyle, Embed, ReplyMessage,
};
use crate::platform::{
    ChannelRef, ChatPlatform, FormInput, FormSpec, InteractionContext, TextInputStyle,
};
use crate::tickets::provision::ChannelProvisioner;
use crate::tickets::store::{ConfigStore, StoreError, TicketStore};
use crate::tickets::{id, CreationMethod, Ticket, FORM_EXTRA_NOTES_DEFAULT};
use log::{error, warn};
use std::sync::Arc;

pub const TICKET_CREATE_BUTTON_ID: &str = "ticket-create-button";
pub const TICKET_LOCK_BUTTON_ID: &str = "ticket-lock-button";
pub const TICKET_CLOSE_BUTTON_ID: &str = "ticket-close-button";
pub const TICKET_CREATE_MODAL_ID: &str = "ticket-create-modal";
pub const FORM_TOPIC_ID: &str = "ticket-topic";
pub const FORM_DESCRIPTION_ID: &str = "ticket-description";
pub const FORM_EXTRA_NOTES_ID: &str = "ticket-extra-notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Button,
    ModalSubmit,
    Command,
}

#[derive(Debug, Clone)]
pub struct TicketForm {
    pub topic: String,
    pub description: String,
    pub extra_notes: Option<String>,
}

impl TicketForm {
    pub fn extra_notes_or_default(&self) -> &str {
        self.extra_notes.as_deref().unwrap_or(FORM_EXTRA_NOTES_DEFAULT)
    }
}

/// One inbound request to open a ticket, from any of the creation surfaces.
#[derive(Debug, Clone)]
pub struct TicketTrigger {
    pub ctx: InteractionContext,
    pub kind: TriggerKind,
    pub form: Option<TicketForm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    ContextUnavailable,
    NoConfiguration,
    OpenTicketLimitExceeded { open_channel_id: String },
    UnknownCreationMethod,
    ChannelCreateFailed,
    PersistenceFailure,
}

/// Terminal outcomes of one creation request. Exactly one externally
/// observable response is emitted for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    FormRequested,
    Success(ChannelRef),
    Failure(FailureReason),
}

pub struct TicketCreationFlow {
    platform: Arc<dyn ChatPlatform>,
    configs: Arc<dyn ConfigStore>,
    tickets: Arc<dyn TicketStore>,
    provisioner: ChannelProvisioner,
}

impl TicketCreationFlow {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        configs: Arc<dyn ConfigStore>,
        tickets: Arc<dyn TicketStore>,
    ) -> Self {
        let provisioner = ChannelProvisioner::new(Arc::clone(&platform));
        Self {
            platform,
            configs,
            tickets,
            provisioner,
        }
    }

    /// Runs the guard chain and, if it passes, provisions the ticket. Never
    /// returns without having emitted (or attempted) exactly one response.
    pub async fn handle(&self, trigger: &TicketTrigger) -> FlowOutcome {
        let ctx = &trigger.ctx;

        let guild_id = match (&ctx.guild_id, ctx.is_cached_guild) {
            (Some(guild_id), true) => guild_id.clone(),
            _ => {
                self.reply_immediate(
                    ctx,
                    error_embed("This can only be used from a server I am a member of"),
                )
                .await;
                return FlowOutcome::Failure(FailureReason::ContextUnavailable);
            }
        };

        if let Err(e) = self.platform.defer_reply(ctx).await {
            warn!("Failed to defer ticket-create reply: {e}");
        }

        let config = match self.configs.get(&guild_id).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                self.edit_with(
                    ctx,
                    error_embed_with_tip(
                        "No ticket configuration exists for this server",
                        "Ask a staff member to run /configure system first",
                    ),
                )
                .await;
                return FlowOutcome::Failure(FailureReason::NoConfiguration);
            }
            Err(e) => {
                error!("Failed to read ticket config for guild {guild_id}: {e}");
                self.edit_with(ctx, try_again_embed()).await;
                return FlowOutcome::Failure(FailureReason::PersistenceFailure);
            }
        };

        match self.tickets.find_open(&guild_id, &ctx.user_id).await {
            Ok(Some(open)) => {
                self.edit_with(ctx, limit_exceeded_embed(&open.channel_id)).await;
                return FlowOutcome::Failure(FailureReason::OpenTicketLimitExceeded {
                    open_channel_id: open.channel_id,
                });
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to query open tickets for guild {guild_id}: {e}");
                self.edit_with(ctx, try_again_embed()).await;
                return FlowOutcome::Failure(FailureReason::PersistenceFailure);
            }
        }

        let method = match config.method() {
            Ok(method) => method,
            Err(raw) => {
                warn!("Unrecognised creation method {raw:?} stored for guild {guild_id}");
                self.edit_with(
                    ctx,
                    error_embed("Something went wrong while handling your request"),
                )
                .await;
                return FlowOutcome::Failure(FailureReason::UnknownCreationMethod);
            }
        };

        match method {
            CreationMethod::Button => {
                self.provision(trigger, &guild_id, &config.parent_channel_id, None)
                    .await
            }
            // The form is mandatory for these methods; only a submission
            // with fields may provision.
            CreationMethod::ButtonModal | CreationMethod::Command | CreationMethod::CommandModal => {
                match trigger.form.as_ref() {
                    Some(form) => {
                        self.provision(trigger, &guild_id, &config.parent_channel_id, Some(form))
                            .await
                    }
                    None => self.request_form(ctx).await,
                }
            }
        }
    }

    async fn request_form(&self, ctx: &InteractionContext) -> FlowOutcome {
        if let Err(e) = self.platform.show_form(ctx, &create_ticket_form()).await {
            error!("Failed to show ticket form: {e}");
        }
        FlowOutcome::FormRequested
    }

    async fn provision(
        &self,
        trigger: &TicketTrigger,
        guild_id: &str,
        parent_id: &str,
        form: Option<&TicketForm>,
    ) -> FlowOutcome {
        let ctx = &trigger.ctx;
        let ticket_id = id::generate();
        let name = ChannelProvisioner::channel_name(&ctx.username, &ticket_id);
        // The everyone role shares the guild's id on this platform.
        let everyone_role = ctx.everyone_role_id.clone().unwrap_or_else(|| guild_id.to_string());

        let channel = match self
            .provisioner
            .create(guild_id, parent_id, &name, &ctx.user_id, &everyone_role)
            .await
        {
            Ok(channel) => channel,
            Err(e) => {
                error!("Failed to create ticket channel in guild {guild_id}: {e}");
                self.edit_with(ctx, try_again_embed()).await;
                return FlowOutcome::Failure(FailureReason::ChannelCreateFailed);
            }
        };

        let record = Ticket {
            guild_id: guild_id.to_string(),
            channel_id: channel.id.clone(),
            ticket_id: ticket_id.clone(),
            creator_id: ctx.user_id.clone(),
            closed: false,
        };

        match self.tickets.create(&record).await {
            Ok(()) => {}
            Err(StoreError::OpenTicketExists) => {
                // Lost the race to a concurrent request from the same member.
                self.rollback_channel(&channel).await;
                let open_channel_id = self
                    .tickets
                    .find_open(guild_id, &ctx.user_id)
                    .await
                    .ok()
                    .flatten()
                    .map(|t| t.channel_id)
                    .unwrap_or_default();
                self.edit_with(ctx, limit_exceeded_embed(&open_channel_id)).await;
                return FlowOutcome::Failure(FailureReason::OpenTicketLimitExceeded {
                    open_channel_id,
                });
            }
            Err(e) => {
                error!("Failed to persist ticket {ticket_id} in guild {guild_id}: {e}");
                self.rollback_channel(&channel).await;
                self.edit_with(ctx, try_again_embed()).await;
                return FlowOutcome::Failure(FailureReason::PersistenceFailure);
            }
        }

        let intro = intro_message(ctx, &ticket_id, form);
        if let Err(e) = self.platform.post_to_channel(&channel.id, &intro).await {
            warn!("Failed to post intro message into ticket channel {}: {e}", channel.id);
        }

        self.edit_with(ctx, success_embed(&channel.id)).await;
        FlowOutcome::Success(channel)
    }

    async fn rollback_channel(&self, channel: &ChannelRef) {
        // Best effort; an orphaned channel is the accepted degraded outcome.
        if let Err(e) = self.provisioner.delete(channel).await {
            error!("Failed to delete orphaned ticket channel {}: {e}", channel.id);
        }
    }

    async fn reply_immediate(&self, ctx: &InteractionContext, embed: Embed) {
        if let Err(e) = self
            .platform
            .reply_ephemeral(ctx, &ReplyMessage::embed(embed))
            .await
        {
            warn!("Failed to reply to ticket-create interaction: {e}");
        }
    }

    async fn edit_with(&self, ctx: &InteractionContext, embed: Embed) {
        if let Err(e) = self
            .platform
            .edit_reply(ctx, &ReplyMessage::embed(embed))
            .await
        {
            warn!("Failed to edit ticket-create reply: {e}");
        }
    }
}

pub fn create_ticket_form() -> FormSpec {
    FormSpec {
        custom_id: TICKET_CREATE_MODAL_ID.to_string(),
        title: "Create a Ticket".to_string(),
        inputs: vec![
            FormInput {
                custom_id: FORM_TOPIC_ID.to_string(),
                label: "What is the Topic of your support?".to_string(),
                placeholder: Some("Enter ticket topic/title...".to_string()),
                max_length: Some(crate::tickets::FORM_TOPIC_MAX as u32),
                style: TextInputStyle::Short,
                required: true,
                prefill: None,
            },
            FormInput {
                custom_id: FORM_DESCRIPTION_ID.to_string(),
                label: "Please describe your issue/reason for the support".to_string(),
                placeholder: Some("Enter ticket description...".to_string()),
                max_length: Some(crate::tickets::FORM_DESCRIPTION_MAX as u32),
                style: TextInputStyle::Paragraph,
                required: true,
                prefill: None,
            },
            FormInput {
                custom_id: FORM_EXTRA_NOTES_ID.to_string(),
                label: "Any additional information if applicable".to_string(),
                placeholder: Some("Enter additional info...".to_string()),
                max_length: Some(crate::tickets::FORM_EXTRA_NOTES_MAX as u32),
                style: TextInputStyle::Paragraph,
                required: false,
                prefill: Some(FORM_EXTRA_NOTES_DEFAULT.to_string()),
            },
        ],
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

fn try_again_embed() -> Embed {
    error_embed("Something went wrong on our end. Please try again later")
}

fn limit_exceeded_embed(open_channel_id: &str) -> Embed {
    error_embed(&format!(
        "You have exceeded the number of open tickets you can have at once. \
         Please first close your ticket at {}",
        channel_mention(open_channel_id)
    ))
}

fn success_embed(channel_id: &str) -> Embed {
    Embed::new(messages::COLOUR_SUCCESS)
        .author("Success")
        .description(format!(
            "{}\n\n{}",
            success_label("Successfully created your ticket!"),
            info_label(&format!(
                "You can find your ticket at {}",
                channel_mention(channel_id)
            ))
        ))
}

fn intro_message(ctx: &InteractionContext, ticket_id: &str, form: Option<&TicketForm>) -> ReplyMessage {
    let mut embed = Embed::new(messages::COLOUR_DEFAULT)
        .author_with_icon(ctx.username.clone(), ctx.avatar_url.clone())
        .title(format!("Ticket - {ticket_id}"))
        .description(format!(
            "Thank you for contacting support. We will be with you momentarily, \
             please wait up to `48 hours`\n\n{}",
            tip_label("While you wait, why don't you tell us a bit more about your query")
        ));

    if let Some(form) = form {
        embed = embed
            .field("Topic", &form.topic, false)
            .field("Description", &form.description, true)
            .field("Extra Notes", form.extra_notes_or_default(), true);
    }

    ReplyMessage::embed(embed).components(vec![ActionRow::buttons(vec![
        Button::new(
            TICKET_LOCK_BUTTON_ID,
            "Lock Ticket",
            "\u{1f510}",
            ButtonStyle::Secondary,
        ),
        Button::new(
            TICKET_CLOSE_BUTTON_ID,
            "Close Ticket",
            "\u{1f4c1}",
            ButtonStyle::Danger,
        ),
    ])])
}
