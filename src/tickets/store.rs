use crate::shared::schema::{ticket_configs, tickets};
use crate::shared::utils::DbPool;
use crate::tickets::{Ticket, TicketConfig};
use diesel::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    Pool(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Record not found")]
    NotFound,
    #[error("An open ticket already exists for this member")]
    OpenTicketExists,
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}

/// Per-guild configuration records.
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, guild_id: &str) -> Result<Option<TicketConfig>, StoreError>;
    async fn upsert(&self, config: &TicketConfig) -> Result<(), StoreError>;
    async fn set_enabled(&self, guild_id: &str, enabled: bool) -> Result<(), StoreError>;
}

/// Ticket records. `create` is conditional: it refuses to insert while the
/// creator already has an open ticket in the guild, closing the window where
/// two racing requests both pass the flow's open-ticket guard.
#[async_trait::async_trait]
pub trait TicketStore: Send + Sync {
    async fn find_open(
        &self,
        guild_id: &str,
        creator_id: &str,
    ) -> Result<Option<Ticket>, StoreError>;
    async fn create(&self, ticket: &Ticket) -> Result<(), StoreError>;
}

pub struct DieselConfigStore {
    pool: DbPool,
}

impl DieselConfigStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConfigStore for DieselConfigStore {
    async fn get(&self, guild_id: &str) -> Result<Option<TicketConfig>, StoreError> {
        let mut conn = self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;

        ticket_configs::table
            .filter(ticket_configs::guild_id.eq(guild_id))
            .first::<TicketConfig>(&mut conn)
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn upsert(&self, config: &TicketConfig) -> Result<(), StoreError> {
        let mut conn = self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;

        diesel::insert_into(ticket_configs::table)
            .values(config)
            .on_conflict(ticket_configs::guild_id)
            .do_update()
            .set(config)
            .execute(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn set_enabled(&self, guild_id: &str, enabled: bool) -> Result<(), StoreError> {
        let mut conn = self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;

        let updated =
            diesel::update(ticket_configs::table.filter(ticket_configs::guild_id.eq(guild_id)))
                .set(ticket_configs::enabled.eq(enabled))
                .execute(&mut conn)
                .map_err(|e| StoreError::Query(e.to_string()))?;

        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct DieselTicketStore {
    pool: DbPool,
}

impl DieselTicketStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TicketStore for DieselTicketStore {
    async fn find_open(
        &self,
        guild_id: &str,
        creator_id: &str,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut conn = self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;

        tickets::table
            .filter(tickets::guild_id.eq(guild_id))
            .filter(tickets::creator_id.eq(creator_id))
            .filter(tickets::closed.eq(false))
            .first::<Ticket>(&mut conn)
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn create(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut conn = self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;

        conn.transaction::<_, StoreError, _>(|conn| {
            let open: Option<Ticket> = tickets::table
                .filter(tickets::guild_id.eq(&ticket.guild_id))
                .filter(tickets::creator_id.eq(&ticket.creator_id))
                .filter(tickets::closed.eq(false))
                .first(conn)
                .optional()
                .map_err(|e| StoreError::Query(e.to_string()))?;

            if open.is_some() {
                return Err(StoreError::OpenTicketExists);
            }

            diesel::insert_into(tickets::table)
                .values(ticket)
                .execute(conn)
                .map_err(|e| StoreError::Query(e.to_string()))?;

            Ok(())
        })
    }
}
