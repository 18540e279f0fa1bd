use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "msgdeps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate dependency files for message definitions")]
#[command(
    long_about = "MsgDeps walks a source tree for message definition files, runs a \
                       dependency generator on each one, and mirrors the generated output \
                       into a destination tree with the same layout."
)]
#[command(before_help = "🔗 MsgDeps - Message Dependency Generation Tool")]
#[command(after_help = "EXAMPLES:\n  \
    msgdeps ./msg ./deps\n  \
    msgdeps ./msg ./deps --verbose\n  \
    msgdeps ./interfaces ./out --extension idl --exclude build,install\n  \
    msgdeps ./msg ./deps --generator \"npx gendeps2\" --config my-config.toml\n\n\
    For more information, visit: https://github.com/user/msgdeps")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Source directory to scan for message files
    #[arg(value_name = "SOURCE_DIR", required_unless_present = "generate_config")]
    pub source: Option<PathBuf>,

    /// Destination directory for generated dependency files
    #[arg(value_name = "DEST_DIR", required_unless_present = "generate_config")]
    pub destination: Option<PathBuf>,

    /// File extension to scan for
    #[arg(short, long, help = "File extension to scan for (e.g., msg, srv, idl)")]
    pub extension: Option<String>,

    /// Directories to exclude from scanning
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Generator command to run for each file
    #[arg(
        short,
        long,
        help = "Generator command invoked per file (e.g., \"npx gendeps2\")"
    )]
    pub generator: Option<String>,

    /// Maximum directory depth to scan
    #[arg(long, help = "Maximum directory depth to scan (unlimited by default)")]
    pub max_depth: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List the files that would be processed without running anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_extension(self.extension.clone())
            .with_exclude(self.exclude.clone())
            .with_generator(self.generator.clone())
            .with_max_depth(self.max_depth)
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
