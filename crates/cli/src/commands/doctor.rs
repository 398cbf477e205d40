//! `baubot doctor` — Diagnose configuration and backend health.

use baubot_config::AppConfig;
use baubot_core::SearchIndex;
use baubot_retrieval::SearchClient;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 BauBot Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = match AppConfig::load() {
        Ok(config) => {
            if config_path.exists() {
                println!("  ✅ Config file valid");
            } else {
                println!("  ⚠️  No config file — using defaults (run `baubot onboard`)");
            }
            config
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the config before the other checks can run.");
            return Ok(());
        }
    };

    // Check search settings + reachability
    let missing = config.missing_search_settings();
    if missing.is_empty() {
        println!("  ✅ Search index configured");
        match SearchClient::from_config(&config) {
            Ok(client) => match client.health_check().await {
                Ok(true) => println!("  ✅ Search index reachable"),
                Ok(false) => {
                    println!("  ❌ Search index responded with an error status");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Search index unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Search client: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  Search index not configured — missing: {}", missing.join(", "));
        issues += 1;
    }

    // Check generation settings
    let missing = config.missing_generation_settings();
    if missing.is_empty() {
        println!("  ✅ Generation deployment configured");
    } else {
        println!(
            "  ⚠️  Generation not configured — missing: {}",
            missing.join(", ")
        );
        issues += 1;
    }

    // Check case storage
    let cases_root = config.cases.resolved_root();
    if cases_root.exists() {
        println!("  ✅ Case storage directory exists");
    } else {
        println!(
            "  ⚠️  No case storage directory at {} — run `baubot onboard`",
            cases_root.display()
        );
        issues += 1;
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
