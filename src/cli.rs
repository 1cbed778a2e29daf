use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use workflow::ExportChoice;

#[derive(Parser)]
#[command(name = "token-launch")]
#[command(
    author,
    version,
    about = "Export design tokens to GitHub or a local file"
)]
pub struct Cli {
    /// Enable verbose output (debug logging unless RUST_LOG is set)
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export extracted tokens by pushing to GitHub or saving a local file
    Export {
        /// Configuration file (defaults to ./token-launch.toml)
        #[clap(short, long)]
        config: Option<PathBuf>,

        /// Extraction JSON to export, overriding [source] path
        #[clap(short, long)]
        source: Option<PathBuf>,

        /// Directory for local downloads, overriding [export] output_dir
        #[clap(short, long)]
        output_dir: Option<PathBuf>,

        /// Answer the export prompt up front and never prompt
        #[clap(long, value_enum)]
        choice: Option<ChoiceArg>,

        /// Do not fall back to a local download when a push fails
        #[clap(long, default_value_t = false)]
        no_fallback: bool,

        /// Show raw error messages on recovery screens
        #[clap(long, default_value_t = false)]
        technical_details: bool,

        /// Write the diagnostic report of this run to a file
        #[clap(long)]
        diagnostics: Option<PathBuf>,
    },

    /// Check the configuration and GitHub access without exporting
    Status {
        /// Configuration file (defaults to ./token-launch.toml)
        #[clap(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a commented configuration template
    Init {
        /// Where to write the file
        #[clap(short, long, default_value = "token-launch.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[clap(long, default_value_t = false)]
        force: bool,
    },

    /// Describe an error code, or list all codes
    Explain {
        /// Error code such as AUTH_BAD_CREDENTIALS
        code: Option<String>,
    },

    /// Show which error code a raw failure message maps to
    Classify {
        /// The raw error message
        message: String,

        /// HTTP status that came with the failure
        #[clap(long)]
        status: Option<u16>,

        /// Operation that was running, e.g. push
        #[clap(long)]
        context: Option<String>,

        /// Print the classification as JSON
        #[clap(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceArg {
    /// Push to the configured GitHub repository
    Push,
    /// Save a JSON file locally
    Download,
    /// Stop without exporting
    Cancel,
}

impl From<ChoiceArg> for ExportChoice {
    fn from(choice: ChoiceArg) -> Self {
        match choice {
            ChoiceArg::Push => ExportChoice::GitPush,
            ChoiceArg::Download => ExportChoice::Download,
            ChoiceArg::Cancel => ExportChoice::Cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "token-launch",
            "export",
            "--choice",
            "push",
            "--no-fallback",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Export {
                choice, no_fallback, ..
            } => {
                assert_eq!(choice.map(ExportChoice::from), Some(ExportChoice::GitPush));
                assert!(no_fallback);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_classify_arguments() {
        let cli = Cli::try_parse_from([
            "token-launch",
            "classify",
            "Bad credentials",
            "--status",
            "401",
        ])
        .unwrap();
        match cli.command {
            Commands::Classify { message, status, .. } => {
                assert_eq!(message, "Bad credentials");
                assert_eq!(status, Some(401));
            }
            _ => panic!("expected classify"),
        }
    }
}
