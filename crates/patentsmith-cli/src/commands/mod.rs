pub mod generation;
pub mod records;
pub mod setup;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use patentsmith_application::{PatentAssistant, build_assistant};
use patentsmith_core::config::AppConfig;
use patentsmith_core::patent::{DocumentStatus, PatentDocument};
use patentsmith_infrastructure::{ConfigService, PatentsmithPaths};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options shared by every subcommand.
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
}

/// A loaded configuration plus the assistant built from it.
pub struct Session {
    pub config: AppConfig,
    pub assistant: PatentAssistant,
}

pub fn config_service(globals: &GlobalArgs) -> Result<ConfigService> {
    match &globals.config {
        Some(path) => Ok(ConfigService::with_paths(
            path.clone(),
            PatentsmithPaths::secret_file()?,
        )),
        None => Ok(ConfigService::new()?),
    }
}

/// Loads config and opens the store.
///
/// Commands that only touch stored records pass `require_api_key = false`;
/// their assistant never reaches the provider.
pub fn open_session(globals: &GlobalArgs, require_api_key: bool) -> Result<Session> {
    let service = config_service(globals)?;
    let config = service
        .load_config()
        .with_context(|| format!("Failed to load {}", service.config_path().display()))?;

    let api_key = match service.load_api_key() {
        Ok(key) => key,
        Err(e) if require_api_key => return Err(e.into()),
        Err(e) => {
            debug!(error = %e, "no API key, continuing with store-only access");
            String::new()
        }
    };

    let data_file = match &globals.data_file {
        Some(path) => path.clone(),
        None => service.data_file(&config)?,
    };

    let assistant = build_assistant(&config, api_key, data_file)?;
    Ok(Session { config, assistant })
}

pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn paint_status(status: DocumentStatus) -> ColoredString {
    match status {
        DocumentStatus::Draft => status.as_ref().green(),
        DocumentStatus::Error => status.as_ref().red(),
        DocumentStatus::Optimized => status.as_ref().cyan(),
    }
}

/// One-line listing entry.
pub fn summary_line(document: &PatentDocument) -> String {
    format!(
        "{}  {}  [{}]  {}",
        document.id.bold(),
        document.generated_at,
        paint_status(document.status),
        document.title
    )
}
