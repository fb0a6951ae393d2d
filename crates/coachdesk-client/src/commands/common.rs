use std::path::Path;

use tracing::debug;

use crate::ClientResult;
use crate::import::field_map::FieldMap;
use crate::setup::{StoreContext, ensure_initialized, ensure_initialized_at};

pub(crate) const BUILT_IN_FIELD_MAP: &str = "built_in";

pub(crate) fn load_context(home_override: Option<&Path>) -> ClientResult<StoreContext> {
    if let Some(home) = home_override {
        ensure_initialized_at(home)
    } else {
        ensure_initialized()
    }
}

/// Picks the field map for a command: an explicit path first, then the one
/// named in `config.json`, then the built-in map. Returns the map with a
/// label for where it came from.
pub(crate) fn load_field_map(
    context: &StoreContext,
    explicit_path: Option<&Path>,
) -> ClientResult<(FieldMap, String)> {
    let chosen = explicit_path.or(context.config.field_map_path.as_deref());
    match chosen {
        Some(path) => {
            debug!(path = %path.display(), "loading field map");
            Ok((FieldMap::load(path)?, path.display().to_string()))
        }
        None => Ok((FieldMap::client_default(), BUILT_IN_FIELD_MAP.to_string())),
    }
}
