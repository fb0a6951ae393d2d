//! The alias table mapping internal client fields to the header spellings
//! accepted on import. The first alias of each field is its export header.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult};

pub const CLIENT_CODE_FIELD: &str = "ClientCode";
pub const PHONE_NUMBER_FIELD: &str = "PhoneNumber";
/// Stored records keep their document links under this key.
pub const FILES_KEY: &str = "files";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSlot {
    Front,
    Side,
    Back,
    Tests,
    Xray,
}

impl FileSlot {
    pub const ALL: [FileSlot; 5] = [
        FileSlot::Front,
        FileSlot::Side,
        FileSlot::Back,
        FileSlot::Tests,
        FileSlot::Xray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Side => "side",
            Self::Back => "back",
            Self::Tests => "tests",
            Self::Xray => "xray",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Date,
    File(FileSlot),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub aliases: Vec<String>,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &str, aliases: &[&str], kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
            kind,
        }
    }

    pub fn export_header(&self) -> &str {
        self.aliases
            .first()
            .map(String::as_str)
            .unwrap_or(self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<FieldSpec>,
}

impl FieldMap {
    /// Checks the alias-table invariants: unique non-empty names other than
    /// `files`, at least one alias per field, and at most one field per file
    /// slot.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, String> {
        if fields.is_empty() {
            return Err("the field map has no fields".to_string());
        }

        let mut names = HashSet::new();
        let mut slots = HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err("a field has an empty name".to_string());
            }
            if field.name == FILES_KEY {
                return Err(format!(
                    "`{FILES_KEY}` is reserved for document links and cannot name a field"
                ));
            }
            if !names.insert(field.name.as_str()) {
                return Err(format!("field `{}` is listed twice", field.name));
            }
            if field.aliases.iter().all(|alias| alias.trim().is_empty()) {
                return Err(format!("field `{}` has no aliases", field.name));
            }
            if let FieldKind::File(slot) = field.kind
                && !slots.insert(slot)
            {
                return Err(format!(
                    "file slot `{}` is bound to more than one field",
                    slot.as_str()
                ));
            }
        }

        Ok(Self { fields })
    }

    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|error| ClientError::invalid_field_map(path, &error.to_string()))?;
        let fields = serde_json::from_str::<Vec<FieldSpec>>(&content)
            .map_err(|error| ClientError::invalid_field_map(path, &error.to_string()))?;
        Self::new(fields).map_err(|detail| ClientError::invalid_field_map(path, &detail))
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The built-in map for the coaching client sheet.
    pub fn client_default() -> Self {
        Self {
            fields: default_client_fields(),
        }
    }
}

fn default_client_fields() -> Vec<FieldSpec> {
    use FieldKind::{Date, File, Text};

    vec![
        FieldSpec::new(
            CLIENT_CODE_FIELD,
            &["كود العميل", "ClientCode", "Client Code", "Client ID", "الكود"],
            Text,
        ),
        FieldSpec::new(
            "FullName",
            &["الاسم الكامل", "FullName", "Full Name", "Client Name", "الاسم"],
            Text,
        ),
        FieldSpec::new(
            PHONE_NUMBER_FIELD,
            &[
                "رقم الهاتف",
                "PhoneNumber",
                "Phone Number",
                "رقم الموبايل",
                "WhatsApp",
                "واتساب",
                "Phone",
            ],
            Text,
        ),
        FieldSpec::new(
            "Email",
            &["البريد الإلكتروني", "Email", "E-mail", "الايميل"],
            Text,
        ),
        FieldSpec::new("Gender", &["النوع", "Gender", "الجنس"], Text),
        FieldSpec::new(
            "DOB",
            &["تاريخ الميلاد", "DOB", "Date of Birth", "Birth Date"],
            Date,
        ),
        FieldSpec::new("Country", &["الدولة", "Country", "البلد"], Text),
        FieldSpec::new("Height", &["الطول", "Height"], Text),
        FieldSpec::new("Weight", &["الوزن", "Weight"], Text),
        FieldSpec::new("Goal", &["الهدف", "Goal", "Target"], Text),
        FieldSpec::new(
            "ActivityLevel",
            &["مستوى النشاط", "ActivityLevel", "Activity Level"],
            Text,
        ),
        FieldSpec::new(
            "MedicalConditions",
            &["الحالة الصحية", "MedicalConditions", "Medical Conditions", "Injuries"],
            Text,
        ),
        FieldSpec::new("Package", &["الباقة", "Package", "Plan"], Text),
        FieldSpec::new(
            "SubscriptionStart",
            &["تاريخ بداية الاشتراك", "SubscriptionStart", "Start Date"],
            Date,
        ),
        FieldSpec::new(
            "SubscriptionEnd",
            &["تاريخ نهاية الاشتراك", "SubscriptionEnd", "End Date"],
            Date,
        ),
        FieldSpec::new(
            "PhotoFront",
            &["صورة أمامية", "PhotoFront", "Front Photo"],
            File(FileSlot::Front),
        ),
        FieldSpec::new(
            "PhotoSide",
            &["صورة جانبية", "PhotoSide", "Side Photo"],
            File(FileSlot::Side),
        ),
        FieldSpec::new(
            "PhotoBack",
            &["صورة خلفية", "PhotoBack", "Back Photo"],
            File(FileSlot::Back),
        ),
        FieldSpec::new(
            "TestsFile",
            &["ملف التحاليل", "TestsFile", "Lab Tests", "التحاليل"],
            File(FileSlot::Tests),
        ),
        FieldSpec::new(
            "XrayFile",
            &["ملف الأشعة", "XrayFile", "X-Ray", "الأشعة"],
            File(FileSlot::Xray),
        ),
        FieldSpec::new("Notes", &["ملاحظات", "Notes"], Text),
        FieldSpec::new(
            "Timestamp",
            &["الطابع الزمني", "Timestamp"],
            Date,
        ),
    ]
}
