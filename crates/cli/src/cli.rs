//! Command line definition

use clap::{Args, Parser, Subcommand, ValueEnum};
use sheet_template::naming::{DEFAULT_SAMPLE_SIZE, DEFAULT_THRESHOLD};
use sheet_template::DetectionStrategy;
use std::path::PathBuf;

/// Blank character sheet looked up when `--form` is not given
pub const DEFAULT_FORM_PATH: &str = "character_sheets/dnd5e_blank_sheet.pdf";

#[derive(Debug, Parser)]
#[command(name = "charsheet", version)]
#[command(about = "Fill a D&D 5e PDF character sheet from a text template")]
pub struct Cli {
    /// Log every field decision
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Field mapping table (JSON); the built-in D&D 5e table when omitted
    #[arg(long, global = true, env = "CHARSHEET_MAPPINGS")]
    pub mappings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill the blank PDF form from a character template
    Fill(FillArgs),
    /// Check that a filled template keeps the standardized field names
    Validate(ValidateArgs),
}

/// How to decide whether a template uses standardized names
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetectMode {
    /// Share of underscored names across the whole template
    Fraction,
    /// Any underscored name among the first few
    Sample,
}

#[derive(Debug, Args)]
pub struct FillArgs {
    /// Character template; prompted for when omitted
    pub input: Option<PathBuf>,

    /// Output PDF file or directory [default: next to the template, named after the character]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Blank PDF form to fill
    #[arg(long, env = "CHARSHEET_FORM", default_value = DEFAULT_FORM_PATH)]
    pub form: PathBuf,

    /// Naming convention detection
    #[arg(long, value_enum, default_value_t = DetectMode::Fraction)]
    pub detect: DetectMode,

    /// Minimum share of underscored names for `--detect fraction`
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: f64,

    /// Number of leading names inspected by `--detect sample`
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,
}

impl FillArgs {
    pub fn detection(&self) -> DetectionStrategy {
        match self.detect {
            DetectMode::Fraction => DetectionStrategy::Fraction {
                threshold: self.threshold,
            },
            DetectMode::Sample => DetectionStrategy::Sample {
                size: self.sample_size,
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Filled character template to check
    pub template: PathBuf,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not between 0 and 1", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fill_defaults() {
        let cli = Cli::try_parse_from(["charsheet", "fill", "aerion.txt"]).unwrap();
        let Command::Fill(args) = cli.command else {
            panic!("Expected fill command");
        };

        assert_eq!(args.input, Some(PathBuf::from("aerion.txt")));
        assert_eq!(args.output, None);
        assert_eq!(
            args.detection(),
            DetectionStrategy::Fraction {
                threshold: DEFAULT_THRESHOLD
            }
        );
    }

    #[test]
    fn test_fill_without_input() {
        let cli = Cli::try_parse_from(["charsheet", "fill", "--detect", "sample"]).unwrap();
        let Command::Fill(args) = cli.command else {
            panic!("Expected fill command");
        };

        assert_eq!(args.input, None);
        assert_eq!(args.detection(), DetectionStrategy::Sample { size: 5 });
    }

    #[test]
    fn test_threshold_range() {
        assert!(Cli::try_parse_from(["charsheet", "fill", "--threshold", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["charsheet", "fill", "--threshold", "0.25"]).is_ok());
    }

    #[test]
    fn test_validate_requires_path() {
        assert!(Cli::try_parse_from(["charsheet", "validate"]).is_err());

        let cli =
            Cli::try_parse_from(["charsheet", "-v", "validate", "sheet.txt"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Validate(_)));
    }
}
