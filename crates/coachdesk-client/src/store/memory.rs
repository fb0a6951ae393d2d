use crate::record::ClientRecord;
use crate::store::{ClientStore, StoredClient, new_client_id, now_timestamp};
use crate::{ClientError, ClientResult};

/// Keeps clients in a `Vec`. Dry runs reconcile against a copy of the real
/// snapshot held here, so their counts match a committed run.
#[derive(Debug, Clone, Default)]
pub struct MemoryClientStore {
    clients: Vec<StoredClient>,
    fail_on_call: Option<usize>,
    calls: usize,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &[StoredClient]) -> Self {
        Self {
            clients: snapshot.to_vec(),
            ..Self::default()
        }
    }

    /// Makes the `call`-th write (1-based) fail instead of persisting.
    pub fn failing_on_write(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn clients(&self) -> &[StoredClient] {
        &self.clients
    }

    fn begin_write(&mut self) -> ClientResult<()> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(ClientError::new(
                "store_unavailable",
                &format!("In-memory store refused write {}.", self.calls),
                Vec::new(),
            ));
        }
        Ok(())
    }
}

impl ClientStore for MemoryClientStore {
    fn list_all(&self) -> ClientResult<Vec<StoredClient>> {
        Ok(self.clients.clone())
    }

    fn insert(&mut self, record: &ClientRecord) -> ClientResult<String> {
        self.begin_write()?;
        let id = new_client_id();
        let timestamp = now_timestamp();
        self.clients.push(StoredClient {
            id: id.clone(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
            record: record.clone(),
        });
        Ok(id)
    }

    fn update(&mut self, id: &str, record: &ClientRecord) -> ClientResult<()> {
        self.begin_write()?;
        let stored = self
            .clients
            .iter_mut()
            .find(|client| client.id == id)
            .ok_or_else(|| ClientError::client_not_found(id))?;
        stored.record.merge_from(record);
        stored.updated_at = now_timestamp();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryClientStore;
    use crate::import::field_map::FileSlot;
    use crate::record::ClientRecord;
    use crate::store::ClientStore;

    #[test]
    fn update_merges_into_the_stored_record() {
        let mut stored = ClientRecord::default().with_field("FullName", "Mona");
        stored.files.set(FileSlot::Tests, "https://x/tests".to_string());

        let mut store = MemoryClientStore::new();
        let inserted = store.insert(&stored);
        assert!(inserted.is_ok());
        if let Ok(id) = inserted {
            assert!(id.starts_with("cli_"));
            let incoming = ClientRecord::default().with_field("Email", "m@x.io");
            assert!(store.update(&id, &incoming).is_ok());

            let listed = store.list_all();
            assert!(listed.is_ok());
            if let Ok(clients) = listed {
                assert_eq!(clients.len(), 1);
                assert_eq!(clients[0].record.field("Email"), "m@x.io");
                assert_eq!(clients[0].record.field("FullName"), "Mona");
                assert_eq!(clients[0].record.files.tests, "https://x/tests");
            }
        }
    }

    #[test]
    fn update_of_unknown_id_fails() {
        let mut store = MemoryClientStore::new();
        let updated = store.update("cli_missing", &ClientRecord::default());
        assert!(updated.is_err());
        if let Err(error) = updated {
            assert_eq!(error.code, "client_not_found");
        }
    }

    #[test]
    fn configured_write_fails_and_later_writes_proceed() {
        let mut store = MemoryClientStore::new().failing_on_write(2);
        assert!(store.insert(&ClientRecord::default()).is_ok());
        assert!(store.insert(&ClientRecord::default()).is_err());
        assert!(store.insert(&ClientRecord::default()).is_ok());
        assert_eq!(store.clients().len(), 2);
    }
}
