/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables, with sensible defaults for local development, and the
 * optional PostgreSQL database connection.
 *
 * # Variables
 *
 * | Variable              | Default                                          |
 * |-----------------------|--------------------------------------------------|
 * | `SERVER_PORT`         | `8001`                                           |
 * | `DATABASE_URL`        | unset (in-memory history and stream directory)   |
 * | `JWT_SECRET`          | development secret, logged as a warning          |
 * | `CHAT_SESSION_BUFFER` | `64` outbound frames per connection              |
 * | `CORS_ORIGINS`        | `http://localhost:3000,http://127.0.0.1:3000`    |
 * | `CHAT_STREAMS`        | `demo:demo:Demo stream`                          |
 *
 * `CHAT_STREAMS` lists the live streams known to the in-memory stream
 * directory as comma-separated `id:streamer[:title]` entries. It is ignored
 * when the database provides the directory.
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 * Unparseable values fall back to their defaults, and a database that
 * cannot be reached leaves the server on the in-memory collaborators.
 */

use sqlx::PgPool;

use crate::backend::streams::StreamInfo;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8001;

/// Default number of outbound frames buffered per chat connection
pub const DEFAULT_SESSION_BUFFER: usize = 64;

/// Secret used when `JWT_SECRET` is unset
const DEVELOPMENT_JWT_SECRET: &str = "streamchat-development-secret-change-me";

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

const DEFAULT_CHAT_STREAMS: &str = "demo:demo:Demo stream";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    pub port: u16,
    /// PostgreSQL connection string, if any
    pub database_url: Option<String>,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Outbound frames buffered per chat connection before it is dropped
    pub session_buffer: usize,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Live streams seeded into the in-memory stream directory
    pub streams: Vec<StreamInfo>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("session_buffer", &self.session_buffer)
            .field("cors_origins", &self.cors_origins)
            .field("streams", &self.streams)
            .finish_non_exhaustive()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            session_buffer: DEFAULT_SESSION_BUFFER,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            streams: parse_streams(DEFAULT_CHAT_STREAMS),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_or(lookup("SERVER_PORT"), "SERVER_PORT", defaults.port);
        let session_buffer = parse_or(lookup("CHAT_SESSION_BUFFER"), "CHAT_SESSION_BUFFER", defaults.session_buffer).max(1);

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let jwt_secret = match lookup("JWT_SECRET").filter(|secret| !secret.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("[Server] JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| split_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        let streams = match lookup("CHAT_STREAMS") {
            Some(raw) => parse_streams(&raw),
            None => defaults.streams,
        };

        Self {
            port,
            database_url,
            jwt_secret,
            session_buffer,
            cors_origins,
            streams,
        }
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("[Server] Invalid {} value {:?}, using {}", key, value, default);
            default
        }),
        None => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `id:streamer[:title]` entries into live streams
///
/// Entries without a stream ID or streamer are skipped with a warning.
fn parse_streams(raw: &str) -> Vec<StreamInfo> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, ':').map(str::trim);
            let stream_id = parts.next().filter(|id| !id.is_empty());
            let streamer = parts.next().filter(|name| !name.is_empty());
            match (stream_id, streamer) {
                (Some(stream_id), Some(streamer)) => Some(StreamInfo {
                    stream_id: stream_id.to_string(),
                    streamer_username: streamer.to_string(),
                    title: parts.next().filter(|t| !t.is_empty()).unwrap_or(stream_id).to_string(),
                    is_live: true,
                }),
                _ => {
                    tracing::warn!("[Server] Ignoring CHAT_STREAMS entry {:?}", entry);
                    None
                }
            }
        })
        .collect()
}

/// Load and initialize database connection pool
///
/// This function:
/// 1. Creates a PostgreSQL connection pool for `database_url`
/// 2. Runs database migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is successfully configured
/// - `None` if no URL is given or the connection fails
///
/// # Errors
///
/// Errors are logged but do not prevent server startup.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("[Server] DATABASE_URL not set. Chat history will be kept in memory.");
        return None;
    };

    tracing::info!("[Server] Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("[Server] Failed to create database connection pool: {:?}", e);
            tracing::warn!("[Server] Falling back to in-memory chat history.");
            return None;
        }
    };

    tracing::info!("[Server] Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("[Server] Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("[Server] Failed to run database migrations: {}", e);
            tracing::warn!("[Server] Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
