//! `baubot serve` — Start the HTTP API server.

use baubot_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🦺 BauBot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);

    let missing = [
        config.missing_search_settings(),
        config.missing_generation_settings(),
    ]
    .concat();
    if !missing.is_empty() {
        println!("   ⚠️  Query answering disabled — missing: {}", missing.join(", "));
    }

    baubot_gateway::start(config).await?;

    Ok(())
}
