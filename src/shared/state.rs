use crate::commands::CommandRegistry;
use crate::config::AppConfig;
use crate::platform::ChatPlatform;
use crate::shared::utils::DbPool;
use crate::tickets::store::{ConfigStore, TicketStore};
use std::sync::Arc;

pub struct AppState {
    pub config: AppConfig,
    pub conn: DbPool,
    pub platform: Arc<dyn ChatPlatform>,
    pub configs: Arc<dyn ConfigStore>,
    pub tickets: Arc<dyn TicketStore>,
    pub registry: Arc<CommandRegistry>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            conn: self.conn.clone(),
            platform: Arc::clone(&self.platform),
            configs: Arc::clone(&self.configs),
            tickets: Arc::clone(&self.tickets),
            registry: Arc::clone(&self.registry),
        }
    }
}
