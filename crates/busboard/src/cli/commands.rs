//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Board command arguments.
#[derive(Debug, Args)]
pub struct BoardCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Line number (e.g. "361")
    pub line: String,

    /// Plate number
    #[arg(short = 'P', long)]
    pub plate: Option<String>,

    /// Platform number
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Destination
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Do not prefill platform/destination from history
    #[arg(long)]
    pub no_suggest: bool,
}

/// Arrive/unarrive command arguments.
#[derive(Debug, Args)]
pub struct ArriveCommand {
    /// Bus to mark (id, plate number, or line number)
    pub bus: String,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Bus to remove (id, plate number, or line number)
    pub bus: String,
}

/// Logs listing arguments.
#[derive(Debug, Args)]
pub struct LogsCommand {
    /// Maximum number of logs to show
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Log deletion arguments.
#[derive(Debug, Args)]
pub struct LogsDeleteCommand {
    /// Id of the log to delete
    pub id: String,
}

/// Suggest command arguments.
#[derive(Debug, Args)]
pub struct SuggestCommand {
    /// Line number to suggest for
    pub line: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Insights command arguments.
#[derive(Debug, Args)]
pub struct InsightsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Template management commands.
#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Save the current roster as a named template
    Save {
        /// Template name
        name: String,

        /// Day of week the template is meant for (e.g. "sunday")
        #[arg(short, long)]
        day: Option<String>,
    },

    /// List saved templates
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Replace the roster with a template's buses
    Load {
        /// Template name or id
        template: String,
    },

    /// Delete a template
    Delete {
        /// Template name or id
        template: String,
    },
}

/// Complaint filing arguments.
#[derive(Debug, Args)]
pub struct ComplainCommand {
    /// Line number the complaint is about
    pub line: String,

    /// Plate number
    #[arg(short = 'P', long)]
    pub plate: Option<String>,

    /// Driver description
    #[arg(long)]
    pub driver: Option<String>,

    /// Complaint category (e.g. "late", "no-show", "conduct")
    #[arg(short = 't', long = "type", default_value = "other")]
    pub complaint_type: String,

    /// Complaint details
    #[arg(short, long)]
    pub details: Option<String>,
}

/// Complaint listing arguments.
#[derive(Debug, Args)]
pub struct ComplaintsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Complaint deletion arguments.
#[derive(Debug, Args)]
pub struct ComplaintsDeleteCommand {
    /// Id of the complaint to delete
    pub id: String,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_command_debug() {
        let cmd = AddCommand {
            line: "361".to_string(),
            plate: None,
            platform: Some("4".to_string()),
            destination: None,
            notes: None,
            no_suggest: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("line"));
        assert!(debug_str.contains("361"));
    }

    #[test]
    fn test_board_command_debug() {
        let cmd = BoardCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_template_command_debug() {
        let cmd = TemplateCommand::Save {
            name: "weekday".to_string(),
            day: None,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Save"));
        assert!(debug_str.contains("weekday"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
