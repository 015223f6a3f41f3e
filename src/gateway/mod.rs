use crate::commands::configure::{ConfigureAction, ConfigureCommand};
use crate::commands::halt::{HaltReason, HaltSignal};
use crate::commands::CommandSurface;
use crate::platform::InteractionContext;
use crate::shared::state::AppState;
use crate::tickets::flow::{
    TicketCreationFlow, TicketForm, TicketTrigger, TriggerKind, FORM_DESCRIPTION_ID,
    FORM_EXTRA_NOTES_ID, FORM_TOPIC_ID, TICKET_CREATE_BUTTON_ID, TICKET_CREATE_MODAL_ID,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use log::{info, warn};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const INTERACTION_PING: u64 = 1;
const INTERACTION_COMMAND: u64 = 2;
const INTERACTION_COMPONENT: u64 = 3;
const INTERACTION_MODAL_SUBMIT: u64 = 5;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/interactions", post(handle_interaction))
        .with_state(state)
}

/// Maps raw inbound interaction payloads onto the workflow engine. The
/// framework's precondition evaluation (cooldowns, permissions) happens
/// upstream; this only routes what arrives.
async fn handle_interaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let kind = payload["type"].as_u64().unwrap_or(0);

    if kind == INTERACTION_PING {
        return (StatusCode::OK, Json(json!({ "type": 1 }))).into_response();
    }

    let ctx = interaction_context(&payload);

    match kind {
        INTERACTION_COMPONENT => {
            if payload["data"]["custom_id"].as_str() == Some(TICKET_CREATE_BUTTON_ID) {
                spawn_flow(state, ctx, TriggerKind::Button, None);
            } else {
                info!(
                    "Ignoring component interaction {:?}",
                    payload["data"]["custom_id"].as_str()
                );
            }
        }
        INTERACTION_MODAL_SUBMIT => {
            if payload["data"]["custom_id"].as_str() == Some(TICKET_CREATE_MODAL_ID) {
                let form = modal_form(&payload);
                spawn_flow(state, ctx, TriggerKind::ModalSubmit, form);
            } else {
                info!(
                    "Ignoring modal submission {:?}",
                    payload["data"]["custom_id"].as_str()
                );
            }
        }
        INTERACTION_COMMAND => match payload["data"]["name"].as_str() {
            Some("ticket") => {
                let form = inline_ticket_form(&payload);
                spawn_flow(state, ctx, TriggerKind::Command, form);
            }
            Some("configure") => {
                tokio::spawn(async move {
                    run_configure(state, ctx, payload).await;
                });
            }
            other => info!("Ignoring unknown command {other:?}"),
        },
        other => warn!("Unhandled interaction type {other}"),
    }

    StatusCode::ACCEPTED.into_response()
}

fn spawn_flow(
    state: Arc<AppState>,
    ctx: InteractionContext,
    kind: TriggerKind,
    form: Option<TicketForm>,
) {
    tokio::spawn(async move {
        let flow = TicketCreationFlow::new(
            Arc::clone(&state.platform),
            Arc::clone(&state.configs),
            Arc::clone(&state.tickets),
        );
        flow.handle(&TicketTrigger { ctx, kind, form }).await;
    });
}

async fn run_configure(state: Arc<AppState>, ctx: InteractionContext, payload: Value) {
    let action = match parse_configure_action(&payload) {
        Ok(action) => action,
        Err(reason) => {
            let signal = HaltSignal {
                command: "configure".to_string(),
                surface: CommandSurface::Slash,
                reason,
                interaction: Some(ctx),
                channel_id: None,
            };
            state.registry.dispatch_halt(&signal).await;
            return;
        }
    };

    let command = ConfigureCommand::new(Arc::clone(&state.platform), Arc::clone(&state.configs));
    command.handle(&ctx, action).await;
}

fn interaction_context(payload: &Value) -> InteractionContext {
    let user = if payload["member"]["user"].is_object() {
        &payload["member"]["user"]
    } else {
        &payload["user"]
    };

    let user_id = user["id"].as_str().unwrap_or_default().to_string();
    let avatar_url = user["avatar"].as_str().map(|hash| {
        format!("https://cdn.discordapp.com/avatars/{user_id}/{hash}.png")
    });

    let guild_id = payload["guild_id"].as_str().map(str::to_string);
    let is_cached_guild = guild_id.is_some() && payload["member"].is_object();

    InteractionContext {
        id: payload["id"].as_str().unwrap_or_default().to_string(),
        token: payload["token"].as_str().unwrap_or_default().to_string(),
        everyone_role_id: guild_id.clone(),
        guild_id,
        channel_id: payload["channel_id"].as_str().map(str::to_string),
        user_id,
        username: user["username"].as_str().unwrap_or_default().to_string(),
        avatar_url,
        is_cached_guild,
    }
}

fn modal_form(payload: &Value) -> Option<TicketForm> {
    let mut values = HashMap::new();
    for row in payload["data"]["components"].as_array()? {
        for component in row["components"].as_array()? {
            if let (Some(id), Some(value)) =
                (component["custom_id"].as_str(), component["value"].as_str())
            {
                values.insert(id.to_string(), value.to_string());
            }
        }
    }

    Some(TicketForm {
        topic: values.get(FORM_TOPIC_ID)?.clone(),
        description: values.get(FORM_DESCRIPTION_ID)?.clone(),
        extra_notes: values.get(FORM_EXTRA_NOTES_ID).filter(|v| !v.is_empty()).cloned(),
    })
}

fn command_options(options: &Value) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if let Some(options) = options.as_array() {
        for option in options {
            if let (Some(name), Some(value)) = (
                option["name"].as_str(),
                option["value"].as_str().map(str::to_string).or_else(|| {
                    option["value"].as_bool().map(|b| b.to_string())
                }),
            ) {
                values.insert(name.to_string(), value);
            }
        }
    }
    values
}

fn inline_ticket_form(payload: &Value) -> Option<TicketForm> {
    let options = command_options(&payload["data"]["options"]);
    Some(TicketForm {
        topic: options.get("topic")?.clone(),
        description: options.get("description")?.clone(),
        extra_notes: options.get("extra-notes").cloned(),
    })
}

fn parse_configure_action(payload: &Value) -> Result<ConfigureAction, HaltReason> {
    let subcommand = &payload["data"]["options"][0];

    match subcommand["name"].as_str() {
        Some("enable-system") => Ok(ConfigureAction::EnableSystem),
        Some("disable-system") => Ok(ConfigureAction::DisableSystem),
        Some("system") => {
            let options = command_options(&subcommand["options"]);

            let mut missing = Vec::new();
            for required in [
                "ticket-create-channel",
                "ticket-parent-channel",
                "transcripts-channel",
                "ticket-create-type",
            ] {
                if !options.contains_key(required) {
                    missing.push(required.to_string());
                }
            }
            if !missing.is_empty() {
                return Err(HaltReason::MissingArguments(missing));
            }

            let creation_method = options["ticket-create-type"]
                .parse()
                .map_err(|_| {
                    HaltReason::InvalidArguments(vec!["ticket-create-type".to_string()])
                })?;

            Ok(ConfigureAction::System {
                create_channel_id: options["ticket-create-channel"].clone(),
                parent_channel_id: options["ticket-parent-channel"].clone(),
                transcripts_channel_id: options["transcripts-channel"].clone(),
                creation_method,
                embed_title: options.get("embed-title").cloned(),
                embed_description: options.get("embed-description").cloned(),
            })
        }
        other => Err(HaltReason::InvalidArguments(vec![format!(
            "subcommand {other:?}"
        )])),
    }
}
