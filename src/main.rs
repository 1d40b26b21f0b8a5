mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use sqlopen::config::{Config, ConfigError, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let config = load_config(
        cli.config.clone(),
        env_filter(&LoggingConfig::default().filter),
        std::io::stderr,
    )?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.logging.filter))
        .init();

    match cli.command {
        Commands::Drivers(args) => commands::drivers(&config, args.json)?,
        Commands::Which(args) => commands::which(&config, &args.target)?,
        Commands::Ping(args) => commands::ping(&config, &args.target).await?,
        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured filter
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Load configuration under a temporary subscriber so loading is logged
/// before the configured one is installed
fn load_config<W>(path: Option<PathBuf>, filter: EnvFilter, writer: W) -> Result<Config, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();

    tracing::subscriber::with_default(bootstrap, || match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_loading_is_logged() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let captured = Captured::default();
        let writer = captured.clone();

        let config = load_config(Some(missing), EnvFilter::new("info"), move || writer.clone()).unwrap();
        assert!(!config.drivers.enabled.is_empty());

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Configuration file not found"), "{output}");
    }
}
