//! Optional `config.json` stored next to the client store.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::import::transcode::DateLocale;
use crate::state::CoachHome;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Locale used when a numeric serial date is rendered as text.
    #[serde(default)]
    pub date_locale: DateLocale,
    /// Field map file replacing the built-in aliases. Relative paths are
    /// resolved against the store home.
    #[serde(default)]
    pub field_map_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Missing file means defaults; a present but unreadable file is an error.
    pub fn load(home: &CoachHome) -> ClientResult<Self> {
        let path = home.config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|error| ClientError::invalid_config(&path, &error.to_string()))?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|error| ClientError::invalid_config(&path, &error.to_string()))?;

        config.field_map_path = config
            .field_map_path
            .map(|field_map_path| home.resolve_relative(&field_map_path));

        Ok(config)
    }
}
