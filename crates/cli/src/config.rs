//! Command line configuration for `revmap`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REVMAP_LOG_LEVEL` | warn | Log level |
//! | `REVMAP_NAMING` | kebab-case | Naming convention for wire keys |
//! | `REVMAP_PRETTY` | false | Indent the output document |

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rev_mapper::NamingConvention;
use rev_serde::Format;

/// Top-level configuration, from command line arguments and environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "revmap")]
#[command(about = "Convert artist documents between JSON and XML")]
#[command(version)]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "REVMAP_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Naming convention applied to field and type names.
    #[arg(long, global = true, env = "REVMAP_NAMING", default_value = "kebab-case")]
    pub naming: NamingConvention,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read an artist list in one format and write it in another.
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Input document, or `-` for standard input.
    pub input: PathBuf,

    /// Input format (json, xml). Defaults to the input file extension.
    #[arg(long)]
    pub from: Option<Format>,

    /// Output format (json, xml). Defaults to the other format.
    #[arg(long)]
    pub to: Option<Format>,

    /// Indent the output document.
    #[arg(long, env = "REVMAP_PRETTY", default_value = "false")]
    pub pretty: bool,

    /// Output file. Defaults to standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ConvertArgs {
    pub fn reads_stdin(&self) -> bool {
        self.input == Path::new("-")
    }

    /// Resolves the source and target formats.
    pub fn formats(&self) -> Result<(Format, Format), String> {
        let from = match self.from {
            Some(format) => format,
            None if self.reads_stdin() => {
                return Err("--from is required when reading standard input".to_string());
            }
            None => Format::from_path(&self.input).ok_or_else(|| {
                format!(
                    "cannot tell the format of {} from its extension, pass --from",
                    self.input.display()
                )
            })?,
        };
        let to = self.to.unwrap_or(match from {
            Format::Json => Format::Xml,
            Format::Xml => Format::Json,
        });
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("revmap").chain(args.iter().copied())).unwrap()
    }

    fn convert_args(config: CliConfig) -> ConvertArgs {
        match config.command {
            Command::Convert(args) => args,
        }
    }

    #[test]
    fn test_formats_from_extension() {
        let args = convert_args(parse(&["convert", "artist_list.xml"]));
        assert_eq!(args.formats().unwrap(), (Format::Xml, Format::Json));

        let args = convert_args(parse(&["convert", "artist_list.json", "--to", "json"]));
        assert_eq!(args.formats().unwrap(), (Format::Json, Format::Json));
    }

    #[test]
    fn test_stdin_requires_from() {
        let args = convert_args(parse(&["convert", "-"]));
        assert!(args.reads_stdin());
        assert!(args.formats().is_err());

        let args = convert_args(parse(&["convert", "-", "--from", "xml"]));
        assert_eq!(args.formats().unwrap(), (Format::Xml, Format::Json));
    }

    #[test]
    fn test_global_options() {
        let config = parse(&["convert", "in.json", "--naming", "snake-case", "--pretty"]);
        assert_eq!(config.naming, NamingConvention::SnakeCase);
        assert!(convert_args(config).pretty);
    }

    #[test]
    fn test_rejects_unknown_naming() {
        let result = CliConfig::try_parse_from(["revmap", "--naming", "shouting", "convert", "a.json"]);
        assert!(result.is_err());
    }
}
