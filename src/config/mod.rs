use std::env;

#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub server: String,
    pub port: u32,
    pub database: String,
}

#[derive(Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub application_id: String,
}

impl AppConfig {
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database.username,
            self.database.password,
            self.database.server,
            self.database.port,
            self.database.database
        )
    }

    pub fn from_env() -> Result<Self, env::VarError> {
        let get_str =
            |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        let database = DatabaseConfig {
            username: get_str("TABLES_USERNAME", "gbuser"),
            password: get_str("TABLES_PASSWORD", ""),
            server: get_str("TABLES_SERVER", "localhost"),
            port: env::var("TABLES_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5432),
            database: get_str("TABLES_DATABASE", "ticketserver"),
        };

        let server = ServerConfig {
            host: get_str("SERVER_HOST", "127.0.0.1"),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8085),
        };

        let discord = DiscordConfig {
            bot_token: env::var("DISCORD_BOT_TOKEN")?,
            application_id: env::var("DISCORD_APPLICATION_ID")?,
        };

        Ok(Self {
            server,
            database,
            discord,
        })
    }
}
