use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::import::field_map::{CLIENT_CODE_FIELD, FileSlot, PHONE_NUMBER_FIELD};
use crate::import::normalize::phone_digits;

/// Direct-view URLs for the five client documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFiles {
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub back: String,
    #[serde(default)]
    pub tests: String,
    #[serde(default)]
    pub xray: String,
}

impl ClientFiles {
    pub fn get(&self, slot: FileSlot) -> &str {
        match slot {
            FileSlot::Front => &self.front,
            FileSlot::Side => &self.side,
            FileSlot::Back => &self.back,
            FileSlot::Tests => &self.tests,
            FileSlot::Xray => &self.xray,
        }
    }

    pub fn set(&mut self, slot: FileSlot, url: String) {
        let target = match slot {
            FileSlot::Front => &mut self.front,
            FileSlot::Side => &mut self.side,
            FileSlot::Back => &mut self.back,
            FileSlot::Tests => &mut self.tests,
            FileSlot::Xray => &mut self.xray,
        };
        *target = url;
    }
}

/// One client keyed by internal field name. Serializes flat, with the
/// document links under `files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(default)]
    pub files: ClientFiles,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    /// Slots a field map wrote into `files`. Not persisted.
    #[serde(skip)]
    pub bound_files: Vec<FileSlot>,
}

impl ClientRecord {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.set_field(name, value);
        self
    }

    /// Sets a document link and marks its slot as bound.
    pub fn set_file(&mut self, slot: FileSlot, url: String) {
        self.files.set(slot, url);
        if !self.bound_files.contains(&slot) {
            self.bound_files.push(slot);
        }
    }

    /// Overwrites the fields `incoming` carries and the file slots it
    /// bound. Everything else keeps its stored value.
    pub fn merge_from(&mut self, incoming: &ClientRecord) {
        for (name, value) in &incoming.fields {
            self.fields.insert(name.clone(), value.clone());
        }
        for slot in &incoming.bound_files {
            self.files.set(*slot, incoming.files.get(*slot).to_string());
        }
    }

    pub fn client_code(&self) -> &str {
        self.field(CLIENT_CODE_FIELD).trim()
    }

    pub fn phone_digits(&self) -> String {
        phone_digits(self.field(PHONE_NUMBER_FIELD))
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.trim().is_empty())
    }
}
