use coachdesk_client::commands;
use coachdesk_client::commands::export::ExportOptions;
use coachdesk_client::commands::fields::FieldsOptions;
use coachdesk_client::commands::import::ImportRunOptions;
use coachdesk_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, ClientCommand, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Import {
            source,
            dry_run,
            field_map,
            json: _,
        } => commands::import::run_with_options(ImportRunOptions {
            source: source.clone(),
            dry_run: *dry_run,
            field_map_path: field_map.as_deref(),
            ..ImportRunOptions::default()
        }),
        Commands::Imports { .. } => commands::import::list(),
        Commands::Client { command } => match command {
            ClientCommand::List { .. } => commands::clients::list(),
        },
        Commands::Export {
            path, field_map, ..
        } => commands::export::run_with_options(ExportOptions {
            path,
            field_map_path: field_map.as_deref(),
            home_override: None,
        }),
        Commands::Fields { field_map, .. } => {
            commands::fields::run_with_options(FieldsOptions {
                field_map_path: field_map.as_deref(),
                home_override: None,
            })
        }
    }
}
