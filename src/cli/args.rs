//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Image registry reconciliation: build, lock, verify and repair.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: imgreg.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Regenerate the registry's projects from the route file
    #[command(visible_alias = "b")]
    Build {
        /// Fail when a route matches no images (overrides `build.strict_routes`)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        strict: Option<bool>,
    },

    /// Freeze the registry into the lock file
    #[command(visible_alias = "l")]
    Lock,

    /// Check every locked path against the files on disk
    #[command(visible_alias = "v")]
    Verify,

    /// Propose (or apply) replacements for broken registry paths
    #[command(visible_alias = "r")]
    Repair {
        /// Write the repaired registry (a `.bak` copy is kept)
        #[arg(short, long)]
        apply: bool,
    },

    /// Find HTML pages saved with an image extension
    Clean {
        /// Delete the files found
        #[arg(short, long)]
        apply: bool,
    },

    /// Convert a legacy generated registry source into the JSON registry
    Import {
        /// Legacy source file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        source: PathBuf,

        /// Overwrite an existing registry
        #[arg(short, long)]
        force: bool,
    },

    /// Run build, lock and verify in one go
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Fail when a route matches no images (overrides `build.strict_routes`)
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict: Option<bool>,

    /// Attempt a repair when verification fails
    #[arg(short, long)]
    pub repair: bool,

    /// Apply the repair, then lock and verify again
    #[arg(short, long, requires = "repair")]
    pub apply: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_repair() {
        let cli = Cli::try_parse_from(["imgreg", "check", "--repair", "--apply"]).unwrap();
        match cli.command {
            Commands::Check { args } => {
                assert!(args.repair);
                assert!(args.apply);
                assert_eq!(args.strict, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_apply_requires_repair() {
        assert!(Cli::try_parse_from(["imgreg", "check", "--apply"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["imgreg", "verify", "-v", "-C", "site/imgreg.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/imgreg.toml")));
        assert!(matches!(cli.command, Commands::Verify));
    }

    #[test]
    fn test_strict_flag_forms() {
        let cli = Cli::try_parse_from(["imgreg", "build", "--strict"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { strict: Some(true) }));

        let cli = Cli::try_parse_from(["imgreg", "b", "--strict", "false"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { strict: Some(false) }));
    }

    #[test]
    fn test_import_source() {
        let cli = Cli::try_parse_from(["imgreg", "import", "src/imageRegistry.ts", "-f"]).unwrap();
        match cli.command {
            Commands::Import { source, force } => {
                assert_eq!(source, PathBuf::from("src/imageRegistry.ts"));
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
