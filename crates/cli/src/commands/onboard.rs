//! `reactclaw onboard` — First-time setup.

use reactclaw_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("reactclaw — First-Time Setup");
    println!("============================\n");

    // Create the config directory
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    } else {
        println!("Config directory exists: {}", config_dir.display());
    }

    // Create the config file
    if config_path.exists() {
        println!("\nConfig already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("Created config.toml at: {}", config_path.display());
        println!("\nNext steps:");
        println!("  1. Edit {} and add your API key", config_path.display());
        println!("     (or set OPENROUTER_API_KEY / OPENAI_API_KEY)");
        println!("  2. Run: reactclaw chat");
        println!();
    }

    println!("Setup complete! Run `reactclaw chat` to start chatting.\n");

    Ok(())
}
