mod config_cmd;
mod endpoints_cmd;
mod sent_cmd;
mod sync_cmd;

pub use config_cmd::ConfigCommand;
pub use endpoints_cmd::EndpointsCommand;
pub use sent_cmd::SentCommand;
pub use sync_cmd::SyncCommand;

use smssync::config::Config;
use smssync::db::{init_db, SqliteMessageStore};
use smssync::sync::{FileLogSink, ReqwestTransport, ResultSyncClient, StoreError, TransportError};

/// The client as wired up for the CLI.
pub type AppClient = ResultSyncClient<ReqwestTransport, SqliteMessageStore, FileLogSink>;

/// Builds the sync client from configuration.
pub async fn open_client(config: &Config) -> Result<AppClient, CommandError> {
    let transport = ReqwestTransport::new(config.http_timeout())?;
    let pool = init_db(&config.database_path.value).await?;
    let store = SqliteMessageStore::new(pool);
    let log = FileLogSink::new(config.log_path.value.clone());

    Ok(ResultSyncClient::new(transport, store, log))
}

/// Errors from CLI commands
#[derive(Debug)]
pub enum CommandError {
    /// No enabled endpoints configured
    NoEndpoints,
    Transport(TransportError),
    Database(sqlx::Error),
    Store(StoreError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NoEndpoints => write!(
                f,
                "No enabled endpoints configured. Add endpoints to your config file."
            ),
            CommandError::Transport(e) => write!(f, "HTTP client error: {}", e),
            CommandError::Database(e) => write!(f, "Database error: {}", e),
            CommandError::Store(e) => write!(f, "Message store error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::NoEndpoints => None,
            CommandError::Transport(e) => Some(e),
            CommandError::Database(e) => Some(e),
            CommandError::Store(e) => Some(e),
        }
    }
}

impl From<TransportError> for CommandError {
    fn from(e: TransportError) -> Self {
        CommandError::Transport(e)
    }
}

impl From<sqlx::Error> for CommandError {
    fn from(e: sqlx::Error) -> Self {
        CommandError::Database(e)
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        CommandError::Store(e)
    }
}
