//! `baubot onboard` — First-time setup.

use baubot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🦺 BauBot — First-Time Setup");
    println!("============================\n");

    // Create directories
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    // Create config file
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
    }

    // Create case storage partitions
    let config = AppConfig::load()?;
    let cases_root = config.cases.resolved_root();
    for partition in [&config.cases.raw_partition, &config.cases.approved_partition] {
        let dir = cases_root.join(partition);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            println!("✅ Created case partition: {}", dir.display());
        }
    }

    println!("\n📝 Next steps:");
    println!("   1. Edit {} and add the search and", config_path.display());
    println!("      generation endpoints, keys, and index/deployment names");
    println!("   2. Run: baubot doctor");
    println!("   3. Run: baubot serve\n");

    Ok(())
}
