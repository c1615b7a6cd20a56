use super::generation::print_document;
use super::{GlobalArgs, open_session, read_text_file, summary_line, write_text_file};
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use patentsmith_core::patent::{DocumentPatch, DocumentStatus, SortOrder};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Text,
}

pub async fn list(globals: &GlobalArgs, sort: SortOrder) -> Result<()> {
    let session = open_session(globals, false)?;
    let documents = session.assistant.list_patents_sorted(sort).await;

    if documents.is_empty() {
        println!("No patents stored yet.");
        return Ok(());
    }
    for document in &documents {
        println!("{}", summary_line(document));
    }
    Ok(())
}

pub async fn show(globals: &GlobalArgs, id: &str, json: bool) -> Result<()> {
    let session = open_session(globals, false)?;

    if json {
        match session.assistant.export_document_json(id).await? {
            Some(body) => println!("{}", body),
            None => anyhow::bail!("No patent with id {}", id),
        }
        return Ok(());
    }

    match session.assistant.get_patent(id).await {
        Some(document) => {
            print_document(&document);
            Ok(())
        }
        None => anyhow::bail!("No patent with id {}", id),
    }
}

pub async fn update(
    globals: &GlobalArgs,
    id: &str,
    title: Option<String>,
    status: Option<DocumentStatus>,
    content_file: Option<PathBuf>,
) -> Result<()> {
    let content = content_file.as_deref().map(read_text_file).transpose()?;
    let patch = DocumentPatch {
        title,
        features: None,
        content,
        status,
    };

    let session = open_session(globals, false)?;
    if session.assistant.update_patent(id, patch).await? {
        println!("Updated {}", id);
        Ok(())
    } else {
        anyhow::bail!("No patent with id {}", id)
    }
}

pub async fn delete(globals: &GlobalArgs, id: &str) -> Result<()> {
    let session = open_session(globals, false)?;
    if session.assistant.delete_patent(id).await? {
        println!("Deleted {}", id);
        Ok(())
    } else {
        anyhow::bail!("No patent with id {}", id)
    }
}

pub async fn export(globals: &GlobalArgs, format: ExportFormat, out: Option<PathBuf>) -> Result<()> {
    let session = open_session(globals, false)?;
    let body = match format {
        ExportFormat::Json => session.assistant.export_json().await?,
        ExportFormat::Text => session.assistant.export_text().await,
    };

    match out {
        Some(path) => {
            write_text_file(&path, &body)?;
            println!("Exported to {}", path.display());
        }
        None => println!("{}", body),
    }
    Ok(())
}

pub async fn stats(globals: &GlobalArgs) -> Result<()> {
    let session = open_session(globals, false)?;
    let stats = session.assistant.statistics().await;
    let file = session.assistant.data_file_info();

    println!("{}", "Patent store".bold());
    println!("  file:      {}", file.path.display());
    if file.exists {
        println!("  size:      {} bytes", file.size_bytes);
    } else {
        println!("  size:      (not written yet)");
    }
    println!("  total:     {}", stats.total_patents);
    println!("  draft:     {}", stats.draft_patents.to_string().green());
    println!("  error:     {}", stats.error_patents.to_string().red());
    println!("  optimized: {}", stats.optimized_patents.to_string().cyan());
    println!("  success:   {:.1}%", stats.success_rate);
    Ok(())
}
