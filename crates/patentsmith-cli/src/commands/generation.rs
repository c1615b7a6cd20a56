use super::{GlobalArgs, open_session, paint_status, read_text_file, summary_line, write_text_file};
use anyhow::{Context, Result};
use colored::Colorize;
use patentsmith_application::OptimizationFocus;
use patentsmith_core::completion::GenerationResult;
use patentsmith_core::patent::{PatentDocument, PatentIdea, count_successful_ideas};
use std::path::{Path, PathBuf};

/// What `optimize` reads its input from.
pub enum OptimizeSource {
    Stored(String),
    File(PathBuf),
}

pub async fn ideas(
    globals: &GlobalArgs,
    count: usize,
    temperature: Option<f32>,
    workers: Option<usize>,
    out: Option<PathBuf>,
) -> Result<()> {
    let session = open_session(globals, true)?;
    let generation = &session.config.generation;

    let ideas = session
        .assistant
        .generate_patent_ideas(
            count,
            temperature.unwrap_or(generation.idea_temperature),
            workers.unwrap_or(generation.idea_workers),
        )
        .await;

    for idea in &ideas {
        print_idea(idea);
    }
    println!(
        "\nGenerated {}/{} ideas",
        count_successful_ideas(&ideas),
        ideas.len()
    );

    if let Some(path) = out {
        write_text_file(&path, &serde_json::to_string_pretty(&ideas)?)?;
        println!("Ideas written to {}", path.display());
    }
    Ok(())
}

pub async fn generate(
    globals: &GlobalArgs,
    title: &str,
    features: &[String],
    temperature: Option<f32>,
) -> Result<()> {
    let session = open_session(globals, true)?;
    let temperature = temperature.unwrap_or(session.config.generation.patent_temperature);

    let document = session
        .assistant
        .generate_full_patent(title, features, temperature)
        .await;
    print_document(&document);
    Ok(())
}

pub async fn batch(
    globals: &GlobalArgs,
    ideas_file: &Path,
    temperature: Option<f32>,
    workers: Option<usize>,
) -> Result<()> {
    let ideas: Vec<PatentIdea> = serde_json::from_str(&read_text_file(ideas_file)?)
        .with_context(|| format!("{} is not an ideas file", ideas_file.display()))?;
    let session = open_session(globals, true)?;
    let generation = &session.config.generation;

    let documents = session
        .assistant
        .batch_generate_patents(
            &ideas,
            temperature.unwrap_or(generation.patent_temperature),
            workers.unwrap_or(generation.patent_workers),
        )
        .await;

    for document in &documents {
        println!("{}", summary_line(document));
    }
    let succeeded = documents.iter().filter(|d| !d.is_error()).count();
    println!("\nGenerated {}/{} patents", succeeded, documents.len());
    Ok(())
}

pub async fn optimize(
    globals: &GlobalArgs,
    source: OptimizeSource,
    focus: OptimizationFocus,
    temperature: Option<f32>,
    save: bool,
) -> Result<()> {
    let session = open_session(globals, true)?;
    let temperature = temperature.unwrap_or(session.config.generation.optimize_temperature);

    let (stored, content) = match source {
        OptimizeSource::Stored(id) => {
            let document = session
                .assistant
                .get_patent(&id)
                .await
                .with_context(|| format!("No patent with id {}", id))?;
            let content = document.content.clone();
            (Some(document), content)
        }
        OptimizeSource::File(path) => (None, read_text_file(&path)?),
    };

    let optimized = match session.assistant.optimize_patent(&content, focus, temperature).await {
        GenerationResult::Text(text) => text,
        GenerationResult::Error(message) => anyhow::bail!("Optimization failed: {}", message),
    };

    match (save, stored) {
        (true, Some(source)) => {
            let document = session
                .assistant
                .save_optimized_patent(&source, optimized)
                .await?;
            println!("{}", summary_line(&document));
        }
        _ => println!("{}", optimized),
    }
    Ok(())
}

fn print_idea(idea: &PatentIdea) {
    match &idea.error {
        Some(error) => println!("{} {}", idea.id.bold(), error.red()),
        None => {
            println!("{} {}", idea.id.bold(), idea.title);
            if !idea.field.is_empty() {
                println!("    field: {}", idea.field);
            }
            for feature in &idea.features {
                println!("    - {}", feature);
            }
        }
    }
}

pub fn print_document(document: &PatentDocument) {
    println!("{}", document.title.bold());
    println!("id: {}  status: {}", document.id, paint_status(document.status));
    println!("{}", "=".repeat(50));
    println!("{}", document.content);
}
