pub mod memory;
pub mod sqlite;

use serde::Serialize;

use crate::ClientResult;
use crate::record::ClientRecord;

pub use memory::MemoryClientStore;
pub use sqlite::SqliteClientStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredClient {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub record: ClientRecord,
}

/// Persistence for client records. Calls are synchronous and each one is a
/// single round trip; callers stop at the first error.
pub trait ClientStore {
    /// Every stored client, oldest first.
    fn list_all(&self) -> ClientResult<Vec<StoredClient>>;

    /// Stores a new client and returns its id.
    fn insert(&mut self, record: &ClientRecord) -> ClientResult<String>;

    /// Merges `record` into an existing client: its fields and bound file
    /// slots overwrite the stored ones, the rest is kept.
    fn update(&mut self, id: &str, record: &ClientRecord) -> ClientResult<()>;
}

pub(crate) fn new_client_id() -> String {
    format!("cli_{}", ulid::Ulid::new())
}

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
