#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use ticketserver::messages::ReplyMessage;
use ticketserver::platform::{
    ChannelParams, ChannelRef, ChatPlatform, FormSpec, InteractionContext, PlatformError,
};
use ticketserver::tickets::store::{ConfigStore, StoreError, TicketStore};
use ticketserver::tickets::{Ticket, TicketConfig};
use tokio::sync::{Mutex, RwLock};

pub fn guild_context(guild_id: &str, user_id: &str, username: &str) -> InteractionContext {
    InteractionContext {
        id: "interaction-1".to_string(),
        token: "token-1".to_string(),
        guild_id: Some(guild_id.to_string()),
        channel_id: Some("origin-channel".to_string()),
        user_id: user_id.to_string(),
        username: username.to_string(),
        avatar_url: None,
        everyone_role_id: Some(guild_id.to_string()),
        is_cached_guild: true,
    }
}

pub fn config(guild_id: &str, parent_id: &str, method: &str) -> TicketConfig {
    TicketConfig {
        guild_id: guild_id.to_string(),
        create_channel_id: "create-channel".to_string(),
        parent_channel_id: parent_id.to_string(),
        transcripts_channel_id: "transcripts-channel".to_string(),
        creation_method: method.to_string(),
        embed_title: None,
        embed_description: None,
        enabled: true,
    }
}

pub struct MemoryConfigStore {
    configs: RwLock<HashMap<String, TicketConfig>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn with(config: TicketConfig) -> Self {
        let store = Self::new();
        store
            .configs
            .write()
            .await
            .insert(config.guild_id.clone(), config);
        store
    }

    pub async fn get_raw(&self, guild_id: &str) -> Option<TicketConfig> {
        self.configs.read().await.get(guild_id).cloned()
    }
}

#[async_trait::async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, guild_id: &str) -> Result<Option<TicketConfig>, StoreError> {
        Ok(self.configs.read().await.get(guild_id).cloned())
    }

    async fn upsert(&self, config: &TicketConfig) -> Result<(), StoreError> {
        self.configs
            .write()
            .await
            .insert(config.guild_id.clone(), config.clone());
        Ok(())
    }

    async fn set_enabled(&self, guild_id: &str, enabled: bool) -> Result<(), StoreError> {
        let mut configs = self.configs.write().await;
        match configs.get_mut(guild_id) {
            Some(config) => {
                config.enabled = enabled;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

pub struct MemoryTicketStore {
    tickets: RwLock<Vec<Ticket>>,
    pub fail_create: AtomicBool,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(Vec::new()),
            fail_create: AtomicBool::new(false),
        }
    }

    pub async fn insert_raw(&self, ticket: Ticket) {
        self.tickets.write().await.push(ticket);
    }

    pub async fn all(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }
}

#[async_trait::async_trait]
impl TicketStore for MemoryTicketStore {
    async fn find_open(
        &self,
        guild_id: &str,
        creator_id: &str,
    ) -> Result<Option<Ticket>, StoreError> {
        Ok(self
            .tickets
            .read()
            .await
            .iter()
            .find(|t| t.guild_id == guild_id && t.creator_id == creator_id && !t.closed)
            .cloned())
    }

    async fn create(&self, ticket: &Ticket) -> Result<(), StoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Query("injected failure".to_string()));
        }

        let mut tickets = self.tickets.write().await;
        let open_exists = tickets
            .iter()
            .any(|t| t.guild_id == ticket.guild_id && t.creator_id == ticket.creator_id && !t.closed);
        if open_exists {
            return Err(StoreError::OpenTicketExists);
        }
        tickets.push(ticket.clone());
        Ok(())
    }
}

/// Wraps a ticket store so the first open-ticket lookup sees nothing,
/// simulating a concurrent request that persisted between the flow's guard
/// check and its insert.
pub struct RacingTicketStore {
    pub inner: MemoryTicketStore,
    skipped_first_find: AtomicBool,
}

impl RacingTicketStore {
    pub fn new(inner: MemoryTicketStore) -> Self {
        Self {
            inner,
            skipped_first_find: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl TicketStore for RacingTicketStore {
    async fn find_open(
        &self,
        guild_id: &str,
        creator_id: &str,
    ) -> Result<Option<Ticket>, StoreError> {
        if !self.skipped_first_find.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_open(guild_id, creator_id).await
    }

    async fn create(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.inner.create(ticket).await
    }
}

#[derive(Debug, Clone)]
pub enum PlatformCall {
    ReplyEphemeral(ReplyMessage),
    Defer,
    EditReply(ReplyMessage),
    Post {
        channel_id: String,
        message: ReplyMessage,
    },
    ShowForm(FormSpec),
    CreateChannel {
        guild_id: String,
        params: ChannelParams,
    },
    DeleteChannel(ChannelRef),
}

/// Records every platform call in order; individual operations can be made
/// to fail for compensation-path tests.
pub struct RecordingPlatform {
    pub calls: Mutex<Vec<PlatformCall>>,
    next_channel: AtomicUsize,
    pub fail_create_channel: AtomicBool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_channel: AtomicUsize::new(1),
            fail_create_channel: AtomicBool::new(false),
        }
    }

    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().await.clone()
    }

    pub async fn created_channels(&self) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|c| matches!(c, PlatformCall::CreateChannel { .. }))
            .count()
    }

    pub async fn deleted_channels(&self) -> Vec<ChannelRef> {
        self.calls()
            .await
            .iter()
            .filter_map(|c| match c {
                PlatformCall::DeleteChannel(channel) => Some(channel.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn last_edit_description(&self) -> Option<String> {
        self.calls().await.iter().rev().find_map(|c| match c {
            PlatformCall::EditReply(message) => {
                message.embeds.first().and_then(|e| e.description.clone())
            }
            _ => None,
        })
    }

    async fn record(&self, call: PlatformCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait::async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn reply_ephemeral(
        &self,
        _ctx: &InteractionContext,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::ReplyEphemeral(message.clone())).await;
        Ok(())
    }

    async fn defer_reply(&self, _ctx: &InteractionContext) -> Result<(), PlatformError> {
        self.record(PlatformCall::Defer).await;
        Ok(())
    }

    async fn edit_reply(
        &self,
        _ctx: &InteractionContext,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::EditReply(message.clone())).await;
        Ok(())
    }

    async fn post_to_channel(
        &self,
        channel_id: &str,
        message: &ReplyMessage,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::Post {
            channel_id: channel_id.to_string(),
            message: message.clone(),
        })
        .await;
        Ok(())
    }

    async fn show_form(
        &self,
        _ctx: &InteractionContext,
        form: &FormSpec,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::ShowForm(form.clone())).await;
        Ok(())
    }

    async fn create_channel(
        &self,
        guild_id: &str,
        params: &ChannelParams,
    ) -> Result<ChannelRef, PlatformError> {
        if self.fail_create_channel.load(Ordering::SeqCst) {
            return Err(PlatformError::Api {
                code: Some("403".to_string()),
                message: "missing access".to_string(),
            });
        }

        self.record(PlatformCall::CreateChannel {
            guild_id: guild_id.to_string(),
            params: params.clone(),
        })
        .await;

        let n = self.next_channel.fetch_add(1, Ordering::SeqCst);
        Ok(ChannelRef {
            id: format!("chan-{n}"),
            guild_id: guild_id.to_string(),
        })
    }

    async fn delete_channel(&self, channel: &ChannelRef) -> Result<(), PlatformError> {
        self.record(PlatformCall::DeleteChannel(channel.clone())).await;
        Ok(())
    }
}
