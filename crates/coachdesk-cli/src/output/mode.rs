use crate::cli::{ClientCommand, Commands};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Import { json, .. }
        | Commands::Imports { json }
        | Commands::Export { json, .. }
        | Commands::Fields { json, .. }
        | Commands::Client {
            command: ClientCommand::List { json },
        } => OutputMode::from_flag(*json),
    }
}
