//! revmap
//!
//! Converts artist documents between JSON and XML.

use std::io::{Read, Write};

use anyhow::Context;
use clap::Parser;
use rev_cli::{CliConfig, Command, ConvertArgs, artist_mapper, convert, init_logging};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    match &config.command {
        Command::Convert(args) => run_convert(&config, args),
    }
}

fn run_convert(config: &CliConfig, args: &ConvertArgs) -> anyhow::Result<()> {
    let (from, to) = args.formats().map_err(|e| anyhow::anyhow!(e))?;
    let mapper = artist_mapper(config.naming).context("Failed to build the type registry")?;

    let input = if args.reads_stdin() {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read standard input")?;
        buffer
    } else {
        std::fs::read(&args.input)
            .with_context(|| format!("Failed to read {}", args.input.display()))?
    };

    let output = convert(&mapper, &input, from, to, args.pretty)
        .with_context(|| format!("Failed to convert {} from {} to {}", args.input.display(), from, to))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = output.len(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
