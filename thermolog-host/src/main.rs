use std::env;
use std::path::Path;

use thermolog_host::config::Config;
use thermolog_host::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");

            format!("{app_name}=info").into()
        }))
        .init();

    let config_path = env::args().nth(1).unwrap_or_else(|| String::from("config.txt"));
    let config = Config::from_file(Path::new(&config_path))?;

    run(config).await
}
