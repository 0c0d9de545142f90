//! Command-line interface for bsonconv
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Conversion direction and output path selection
//! - File I/O around the codec, including the input size ceiling

pub mod completion;

use clap::{Parser, Subcommand};
use colored_json::prelude::*;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::codec::Codec;
use crate::config::{Config, LogLevel};
use crate::error::{ConfigError, InputError, Result};
use crate::utils::{convert, fs, time};

/// bsonconv - Lossless BSON <-> JSON converter
#[derive(Parser, Debug)]
#[command(
    name = "bsonconv",
    version,
    about = "Convert between BSON and JSON",
    long_about = "Convert MongoDB BSON documents to JSON and back using the extended JSON
convention, so every BSON type survives the round trip."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Largest accepted input (e.g. 10MB, 512KB)
    #[arg(long, value_name = "SIZE", global = true)]
    pub max_size: Option<String>,

    /// Maximum nesting depth of documents and arrays
    #[arg(long, value_name = "N", global = true)]
    pub max_depth: Option<usize>,

    /// Extended JSON output mode (relaxed, canonical)
    #[arg(long, value_name = "MODE", global = true)]
    pub mode: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for bsonconv
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a .bson file to JSON or a .json file to BSON
    Convert {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to the input path with the other extension)
        #[arg(short = 'o', long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Target format (json, bson); derived from the input extension if omitted
        #[arg(long, value_name = "FORMAT")]
        to: Option<String>,

        /// Write the result to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Check that a file converts cleanly without writing anything
    Validate {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Input format (json, bson); derived from the extension if omitted
        #[arg(long, value_name = "FORMAT")]
        from: Option<String>,
    },

    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    BsonToJson,
    JsonToBson,
}

impl Direction {
    /// Direction that produces the given format
    ///
    /// # Arguments
    /// * `target` - "json" or "bson"
    pub fn from_target(target: &str) -> Option<Self> {
        match target.to_lowercase().as_str() {
            "json" => Some(Direction::BsonToJson),
            "bson" => Some(Direction::JsonToBson),
            _ => None,
        }
    }

    /// Direction that consumes the given input format
    pub fn from_source(source: &str) -> Option<Self> {
        match source.to_lowercase().as_str() {
            "bson" => Some(Direction::BsonToJson),
            "json" => Some(Direction::JsonToBson),
            _ => None,
        }
    }

    /// Extension of the file this direction produces
    pub fn output_extension(&self) -> &'static str {
        match self {
            Direction::BsonToJson => "json",
            Direction::JsonToBson => "bson",
        }
    }
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_file = args
            .config_file
            .as_ref()
            .map(|p| fs::expand_home(&p.to_string_lossy()));
        let mut config = Config::load_from_file(config_file.as_deref())?;

        // Logging is not up yet, so report straight to stderr.
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Path of the configuration file in use
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        Self::apply_limit_args(config, args)?;
        Self::apply_output_args(config, args)?;
        Self::apply_logging_args(config, args);
        Ok(())
    }

    fn apply_limit_args(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(size) = &args.max_size {
            config.limits.max_input_bytes =
                convert::parse_bytes(size).ok_or_else(|| ConfigError::InvalidValue {
                    field: "--max-size".to_string(),
                    value: size.clone(),
                })?;
        }

        if let Some(depth) = args.max_depth {
            config.limits.max_depth = depth;
        }
        Ok(())
    }

    fn apply_output_args(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(mode) = &args.mode {
            config.output.mode = mode.parse().map_err(|_| ConfigError::InvalidValue {
                field: "--mode".to_string(),
                value: mode.clone(),
            })?;
        }

        if args.no_color {
            config.output.color_output = false;
        }
        Ok(())
    }

    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Codec configured from the effective configuration
    pub fn codec(&self) -> Codec {
        Codec::new(self.config.codec_options())
    }

    /// Run the selected subcommand
    pub fn run(&self) -> Result<()> {
        match &self.args.command {
            Commands::Convert {
                input,
                output,
                to,
                stdout,
            } => self.run_convert(input, output.as_deref(), to.as_deref(), *stdout),
            Commands::Validate { input, from } => self.run_validate(input, from.as_deref()),
            Commands::Version => {
                self.show_version();
                Ok(())
            }
            Commands::Completion { shell } => {
                completion::generate_completion(shell, &mut std::io::stdout())
            }
            Commands::Config { show, validate } => self.handle_config_command(*show, *validate),
        }
    }

    /// Work out the conversion direction from `--to` or the file extension
    fn resolve_direction(input: &Path, to: Option<&str>) -> Result<Direction> {
        let direction = match to {
            Some(target) => Direction::from_target(target),
            None => fs::get_extension(input).and_then(|ext| Direction::from_source(&ext)),
        };
        direction.ok_or_else(|| {
            InputError::UnknownDirection(
                to.map(str::to_string)
                    .unwrap_or_else(|| input.display().to_string()),
            )
            .into()
        })
    }

    /// Read an input file, refusing anything over the size ceiling
    fn read_input(&self, path: &Path) -> Result<Vec<u8>> {
        let limit = self.config.limits.max_input_bytes;
        let size = std::fs::metadata(path)?.len();
        if size > limit {
            return Err(InputError::TooLarge { size, limit }.into());
        }
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), size = %convert::format_bytes(size), "read input");
        Ok(bytes)
    }

    /// Convert one file
    fn run_convert(
        &self,
        input: &Path,
        output: Option<&Path>,
        to: Option<&str>,
        to_stdout: bool,
    ) -> Result<()> {
        let direction = Self::resolve_direction(input, to)?;
        let started = Instant::now();
        let bytes = self.read_input(input)?;
        let codec = self.codec();

        let converted: Vec<u8> = match direction {
            Direction::BsonToJson => codec.bson_to_json(&bytes)?.into_bytes(),
            Direction::JsonToBson => codec.json_bytes_to_bson(&bytes)?,
        };
        info!(?direction, input = %input.display(), "conversion finished");

        if to_stdout {
            return self.write_stdout(direction, converted);
        }

        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fs::swap_extension(input, direction.output_extension()));
        if output == input {
            return Err(InputError::SameOutput(output.display().to_string()).into());
        }
        std::fs::write(&output, &converted)?;

        if !self.args.quiet {
            println!(
                "{} ({}) -> {} ({}) in {}",
                input.display(),
                convert::format_bytes(bytes.len() as u64),
                output.display(),
                convert::format_bytes(converted.len() as u64),
                time::format_duration(started.elapsed())
            );
        }
        Ok(())
    }

    fn write_stdout(&self, direction: Direction, converted: Vec<u8>) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        match direction {
            Direction::BsonToJson => {
                let text = String::from_utf8_lossy(&converted).into_owned();
                if self.config.output.color_output && stdout.is_terminal() {
                    let colored = text
                        .to_colored_json_auto()
                        .unwrap_or_else(|_| text.clone());
                    writeln!(stdout, "{}", colored)?;
                } else {
                    writeln!(stdout, "{}", text)?;
                }
            }
            Direction::JsonToBson => stdout.write_all(&converted)?,
        }
        stdout.flush()?;
        Ok(())
    }

    /// Validate one file without writing output
    fn run_validate(&self, input: &Path, from: Option<&str>) -> Result<()> {
        let direction = match from {
            Some(source) => Direction::from_source(source)
                .ok_or_else(|| InputError::UnknownDirection(source.to_string()))?,
            None => Self::resolve_direction(input, None)?,
        };
        let bytes = self.read_input(input)?;
        let codec = self.codec();

        match direction {
            Direction::BsonToJson => {
                let doc = codec.decode(&bytes)?;
                debug!(fields = doc.len(), "BSON input is valid");
            }
            Direction::JsonToBson => codec.validate_json_bytes(&bytes)?,
        }

        if !self.args.quiet {
            println!("✅ {} is valid", input.display());
        }
        Ok(())
    }

    /// Show version information
    fn show_version(&self) {
        println!("bsonconv version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        println!("Configuration file: {}", self.config_path().display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml_string()?);
        Ok(())
    }
}
