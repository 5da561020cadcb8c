//! Library half of the `revmap` converter: configuration, the artist model
//! and the conversion itself, kept out of `main.rs` so they can be tested.

pub mod config;
pub mod convert;
pub mod model;

pub use config::{CliConfig, Command, ConvertArgs};
pub use convert::{artist_mapper, convert};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the mapper crates and the binary log at
/// `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rev_mapper={level},rev_serde={level},rev_cli={level},revmap={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
