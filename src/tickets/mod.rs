pub mod flow;
pub mod id;
pub mod provision;
pub mod store;

use crate::shared::schema::{ticket_configs, tickets};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

pub const EMBED_TITLE_MAX: usize = 256;
pub const EMBED_DESCRIPTION_MAX: usize = 2000;
pub const FORM_TOPIC_MAX: usize = 256;
pub const FORM_DESCRIPTION_MAX: usize = 1024;
pub const FORM_EXTRA_NOTES_MAX: usize = 1024;
pub const FORM_EXTRA_NOTES_DEFAULT: &str = "No additional information";

/// How users are allowed to open tickets in a guild. Persisted as text;
/// unrecognised stored values surface as `UnknownCreationMethod` at dispatch
/// time rather than failing the config read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreationMethod {
    Button,
    ButtonModal,
    Command,
    CommandModal,
}

impl std::fmt::Display for CreationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Button => write!(f, "Button"),
            Self::ButtonModal => write!(f, "ButtonModal"),
            Self::Command => write!(f, "Command"),
            Self::CommandModal => write!(f, "CommandModal"),
        }
    }
}

impl std::str::FromStr for CreationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Button" | "button" => Ok(Self::Button),
            "ButtonModal" | "button-modal" => Ok(Self::ButtonModal),
            "Command" | "command" => Ok(Self::Command),
            "CommandModal" | "command-modal" => Ok(Self::CommandModal),
            other => Err(other.to_string()),
        }
    }
}

/// Per-guild ticketing configuration. One row per guild, written wholesale by
/// the upsert; `enabled` is the only field with a partial-update path.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = ticket_configs)]
pub struct TicketConfig {
    pub guild_id: String,
    pub create_channel_id: String,
    pub parent_channel_id: String,
    pub transcripts_channel_id: String,
    pub creation_method: String,
    pub embed_title: Option<String>,
    pub embed_description: Option<String>,
    pub enabled: bool,
}

impl TicketConfig {
    pub fn method(&self) -> Result<CreationMethod, String> {
        self.creation_method.parse()
    }
}

/// One ticket, keyed by its channel. `ticket_id` is a 4-digit display label
/// with no uniqueness guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = tickets)]
pub struct Ticket {
    pub guild_id: String,
    pub channel_id: String,
    pub ticket_id: String,
    pub creator_id: String,
    pub closed: bool,
}
