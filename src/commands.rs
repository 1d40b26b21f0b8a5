use sqlopen::Resolver;
use sqlopen::config::Config;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use url::Url;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn resolver(config: &Config) -> Result<Resolver, AnyError> {
    Ok(Resolver::new(Arc::new(config.build_registry()?)))
}

/// Hide the password component of a URL before it is printed or logged
fn redact(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => match url.set_password(Some("***")) {
            Ok(()) => url.to_string(),
            // only URLs without a host reject a password
            Err(()) => format!("{}:***", url.scheme()),
        },
        _ => raw.to_string(),
    }
}

pub fn drivers(config: &Config, json: bool) -> Result<(), AnyError> {
    let ids = config.build_registry()?.list();

    if json {
        println!("{}", serde_json::to_string(&ids)?);
    } else {
        for id in ids {
            println!("{id}");
        }
    }
    Ok(())
}

pub fn which(config: &Config, target: &str) -> Result<(), AnyError> {
    let url = config.database_url(target);
    let opener = resolver(config)?.resolve(url)?;
    println!("{}", opener.id());
    Ok(())
}

pub async fn ping(config: &Config, target: &str) -> Result<(), AnyError> {
    let url = config.database_url(target);
    let resolver = resolver(config)?;
    info!(url = %redact(url), "Opening connection");

    let started = Instant::now();
    let mut conn = resolver.open(url).await?;
    let pinged = conn.ping().await;
    let elapsed = started.elapsed();
    conn.close().await?;
    pinged?;

    info!(driver = conn.driver(), elapsed_ms = elapsed.as_millis() as u64, "Ping succeeded");
    println!("{}: ok ({} ms)", conn.driver(), elapsed.as_millis());
    Ok(())
}

pub fn show_config(config: &Config) -> Result<(), AnyError> {
    let mut printable = config.clone();
    for database in printable.databases.values_mut() {
        database.url = redact(&database.url);
    }
    print!("{}", toml::to_string_pretty(&printable)?);
    Ok(())
}
