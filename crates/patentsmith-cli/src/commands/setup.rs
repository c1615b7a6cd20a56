use super::{GlobalArgs, config_service, open_session};
use anyhow::Result;
use colored::Colorize;
use patentsmith_core::completion::GenerationResult;
use patentsmith_interaction::predefined_providers;

pub fn init(globals: &GlobalArgs) -> Result<()> {
    let service = config_service(globals)?;
    if service.ensure_config_file()? {
        println!("Created {}", service.config_path().display());
    } else {
        println!("Config already exists: {}", service.config_path().display());
    }
    Ok(())
}

pub fn providers(globals: &GlobalArgs) -> Result<()> {
    let config = config_service(globals)?.load_config()?;

    for preset in predefined_providers() {
        let marker = if preset.name.eq_ignore_ascii_case(&config.provider.name) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        let base_url = if preset.base_url.is_empty() {
            "(set provider.base_url)"
        } else {
            preset.base_url
        };
        println!("{} {}  {}", marker, preset.name.bold(), base_url);
        for model in preset.models {
            println!("      {}", model);
        }
    }
    Ok(())
}

pub async fn ping(globals: &GlobalArgs) -> Result<()> {
    let session = open_session(globals, true)?;
    println!(
        "Testing {} ({})...",
        session.config.provider.name, session.config.provider.model
    );

    match session.assistant.test_connection().await {
        GenerationResult::Text(reply) => {
            println!("{} {}", "Connection OK:".green(), reply.trim());
            Ok(())
        }
        GenerationResult::Error(message) => {
            anyhow::bail!("Connection failed: {}", message)
        }
    }
}
