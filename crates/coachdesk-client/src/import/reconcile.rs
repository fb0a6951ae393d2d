use tracing::{debug, info};

use crate::{ClientError, ClientResult};
use crate::contracts::types::ImportSummary;
use crate::record::ClientRecord;
use crate::store::{ClientStore, StoredClient};

/// Writes each record as an update of its match in `snapshot`, or as a new
/// client. Matching only looks at the snapshot taken before the run, so two
/// rows for the same new client are both inserted.
///
/// Stops at the first failed write. Writes made before it stay in the store
/// and their counts travel in the `persistence_failure` error data.
pub fn reconcile(
    records: &[ClientRecord],
    snapshot: &[StoredClient],
    store: &mut dyn ClientStore,
) -> ClientResult<ImportSummary> {
    let keys = snapshot
        .iter()
        .map(|client| {
            (
                client.id.as_str(),
                client.record.client_code().to_string(),
                client.record.phone_digits(),
            )
        })
        .collect::<Vec<(&str, String, String)>>();

    let mut summary = ImportSummary::default();
    for (index, record) in records.iter().enumerate() {
        let row = index + 1;
        let code = record.client_code();
        let phone = record.phone_digits();

        let matched = keys.iter().find(|(_, stored_code, stored_phone)| {
            (!code.is_empty() && code == stored_code.as_str())
                || (!phone.is_empty() && &phone == stored_phone)
        });

        match matched {
            Some((id, _, _)) => {
                debug!(row, client_id = *id, "updating matched client");
                store
                    .update(id, record)
                    .map_err(|cause| ClientError::persistence_failure(row, &summary, &cause))?;
                summary.updated_count += 1;
            }
            None => {
                let id = store
                    .insert(record)
                    .map_err(|cause| ClientError::persistence_failure(row, &summary, &cause))?;
                debug!(row, client_id = id.as_str(), "inserted new client");
                summary.new_count += 1;
            }
        }
    }

    info!(
        new_count = summary.new_count,
        updated_count = summary.updated_count,
        "reconciliation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::reconcile;
    use crate::record::ClientRecord;
    use crate::store::{ClientStore, MemoryClientStore, StoredClient};

    fn stored(id: &str, code: &str, phone: &str) -> StoredClient {
        StoredClient {
            id: id.to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            record: ClientRecord::default()
                .with_field("ClientCode", code)
                .with_field("PhoneNumber", phone),
        }
    }

    fn incoming(code: &str, phone: &str, name: &str) -> ClientRecord {
        ClientRecord::default()
            .with_field("ClientCode", code)
            .with_field("PhoneNumber", phone)
            .with_field("FullName", name)
    }

    #[test]
    fn matches_by_code_then_phone_and_inserts_the_rest() {
        let snapshot = vec![
            stored("cli_a", "C-1", ""),
            stored("cli_b", "", "+20 100 200 3000"),
        ];
        let mut store = MemoryClientStore::from_snapshot(&snapshot);
        let records = vec![
            incoming(" C-1 ", "", "Code match"),
            incoming("", "٢٠١٠٠٢٠٠٣٠٠٠", "Phone match"),
            incoming("C-9", "555", "New"),
        ];

        let summary = reconcile(&records, &snapshot, &mut store);
        assert!(summary.is_ok());
        if let Ok(summary) = summary {
            assert_eq!(summary.updated_count, 2);
            assert_eq!(summary.new_count, 1);
        }

        let clients = store.clients();
        assert_eq!(clients.len(), 3);
        assert_eq!(clients[0].record.field("FullName"), "Code match");
        assert_eq!(clients[1].record.field("FullName"), "Phone match");
        assert_eq!(clients[2].record.field("FullName"), "New");
    }

    #[test]
    fn empty_code_and_phone_never_match() {
        let snapshot = vec![stored("cli_a", "", "")];
        let mut store = MemoryClientStore::from_snapshot(&snapshot);

        let summary = reconcile(&[incoming("", "", "Anon")], &snapshot, &mut store);
        assert!(summary.is_ok());
        if let Ok(summary) = summary {
            assert_eq!(summary.new_count, 1);
            assert_eq!(summary.updated_count, 0);
        }
    }

    #[test]
    fn first_snapshot_match_wins() {
        let snapshot = vec![stored("cli_a", "C-1", ""), stored("cli_b", "C-1", "")];
        let mut store = MemoryClientStore::from_snapshot(&snapshot);

        assert!(reconcile(&[incoming("C-1", "", "Winner")], &snapshot, &mut store).is_ok());
        assert_eq!(store.clients()[0].record.field("FullName"), "Winner");
        assert_eq!(store.clients()[1].record.field("FullName"), "");
    }

    #[test]
    fn duplicate_new_rows_are_both_inserted() {
        let mut store = MemoryClientStore::new();
        let records = vec![incoming("C-5", "", "One"), incoming("C-5", "", "Two")];

        let summary = reconcile(&records, &[], &mut store);
        assert!(summary.is_ok());
        if let Ok(summary) = summary {
            assert_eq!(summary.new_count, 2);
        }
        assert_eq!(store.clients().len(), 2);
    }

    #[test]
    fn repeated_rows_for_a_stored_client_are_all_updates() {
        let snapshot = vec![stored("cli_a", "C-1", "")];
        let mut store = MemoryClientStore::from_snapshot(&snapshot);
        let records = vec![incoming("C-1", "", "First"), incoming("C-1", "", "Last")];

        let summary = reconcile(&records, &snapshot, &mut store);
        assert!(summary.is_ok());
        if let Ok(summary) = summary {
            assert_eq!(summary.updated_count, 2);
        }
        assert_eq!(store.clients()[0].record.field("FullName"), "Last");
    }

    #[test]
    fn phone_match_applies_even_when_the_codes_differ() {
        let snapshot = vec![stored("cli_a", "C-1", "0100 111")];
        let mut store = MemoryClientStore::from_snapshot(&snapshot);
        let records = vec![
            incoming("C-7", "0100111", "A"),
            incoming("C-8", "+0100-111", "B"),
        ];

        let summary = reconcile(&records, &snapshot, &mut store);
        assert!(summary.is_ok());
        if let Ok(summary) = summary {
            assert_eq!(summary.updated_count, 2);
            assert_eq!(summary.new_count, 0);
        }
        assert_eq!(store.clients().len(), 1);
        assert_eq!(store.clients()[0].record.field("FullName"), "B");
        assert_eq!(store.clients()[0].record.client_code(), "C-8");
    }

    #[test]
    fn halts_on_first_failed_write_with_partial_counts() {
        let mut store = MemoryClientStore::new().failing_on_write(2);
        let records = vec![
            incoming("C-1", "", "One"),
            incoming("C-2", "", "Two"),
            incoming("C-3", "", "Three"),
        ];

        let result = reconcile(&records, &[], &mut store);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "persistence_failure");
            let data = error.data.unwrap_or_default();
            assert_eq!(data["row"], 2);
            assert_eq!(data["summary"]["new_count"], 1);
            assert_eq!(data["summary"]["updated_count"], 0);
            assert_eq!(data["cause_code"], "store_unavailable");
        }

        let listed = store.list_all();
        assert!(listed.is_ok());
        if let Ok(clients) = listed {
            assert_eq!(clients.len(), 1);
            assert_eq!(clients[0].record.field("FullName"), "One");
        }
    }
}
