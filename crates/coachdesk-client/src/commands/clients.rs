use std::path::Path;

use crate::ClientResult;
use crate::commands::common::load_context;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ClientListData;
use crate::store::{ClientStore, SqliteClientStore};

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_home_override(None)
}

#[doc(hidden)]
pub fn list_with_home_override(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(home_override)?;
    let store = SqliteClientStore::open(&context)?;
    let clients = store.list_all()?;
    success(
        "client list",
        ClientListData {
            total: clients.len() as i64,
            clients,
        },
    )
}
