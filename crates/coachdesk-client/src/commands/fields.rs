use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{load_context, load_field_map};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::FieldsData;

#[derive(Debug, Default)]
pub struct FieldsOptions<'a> {
    pub field_map_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
}

pub fn run() -> ClientResult<SuccessEnvelope> {
    run_with_options(FieldsOptions::default())
}

#[doc(hidden)]
pub fn run_with_options(options: FieldsOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(options.home_override)?;
    let (field_map, field_map_source) = load_field_map(&context, options.field_map_path)?;
    success(
        "fields",
        FieldsData {
            field_map_source,
            date_locale: context.config.date_locale,
            fields: field_map.fields().to_vec(),
        },
    )
}
