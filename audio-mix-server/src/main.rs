use std::error::Error;

use env_logger::Env;

use audio_mix_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = ServerConfig::load()?;
    run_server(cfg).await?;
    Ok(())
}
