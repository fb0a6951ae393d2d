pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod export;
pub mod import;
pub mod migrations;
pub mod record;
pub mod setup;
pub mod state;
pub mod store;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use import::field_map::{FieldKind, FieldMap, FieldSpec, FileSlot};
pub use import::transcode::DateLocale;
pub use record::{ClientFiles, ClientRecord};
pub use store::{ClientStore, MemoryClientStore, SqliteClientStore, StoredClient};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
