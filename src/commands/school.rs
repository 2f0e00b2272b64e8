use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::state;

#[derive(Args)]
pub struct SchoolArgs {
    #[command(subcommand)]
    command: SchoolCommands,
}

#[derive(Subcommand)]
enum SchoolCommands {
    /// Select the school context sync runs under
    Set {
        /// The school identifier assigned by the program
        id: String,
    },
    /// Clear the selected school context
    Unset,
    /// Show the current school context
    Get,
}

pub async fn command(args: SchoolArgs, state_path: &Path) -> Result<()> {
    match args.command {
        SchoolCommands::Set { id } => {
            let mut app_state = state::load(state_path).context("Failed to load state")?;
            app_state.school_id = Some(id.clone());
            state::save(state_path, &app_state).context("Failed to save state")?;
            println!("School context set to: {}", id);
        }
        SchoolCommands::Unset => {
            let mut app_state = state::load(state_path).context("Failed to load state")?;
            app_state.school_id = None;
            state::save(state_path, &app_state).context("Failed to save state")?;
            println!("School context cleared.");
        }
        SchoolCommands::Get => {
            let app_state = state::load(state_path).context("Failed to load state")?;
            match app_state.school_id {
                Some(id) => println!("Current school context: {}", id),
                None => println!("School context is not selected."),
            }
        }
    }
    Ok(())
}
