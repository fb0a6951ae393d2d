pub mod clients;
pub(crate) mod common;
pub mod export;
pub mod fields;
pub mod import;
