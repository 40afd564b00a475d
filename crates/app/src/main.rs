use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use engine::{
    FileStore, Query, Tracker,
    export::{Artifact, DocumentRenderer},
};

use crate::{
    cli::{Cli, Command, ExportFormat},
    error::Result,
    settings::Settings,
};

mod cli;
mod error;
mod prompt;
mod render;
mod settings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match settings::load(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("mera={level},engine={level}", level = settings.level))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    let currency = settings.currency()?;
    let tz = settings.timezone()?;
    let now = Utc::now();
    let local = now.with_timezone(&tz);
    let (today, local_now) = (local.date_naive(), local.naive_local());

    tracing::debug!("opening store in {}", settings.data_dir);
    let mut tracker = Tracker::open(FileStore::new(&settings.data_dir), currency);

    match command {
        Command::Add(args) => {
            let id = tracker.submit(&args.into_form(), now, today)?;
            println!("saved {id}");
        }
        Command::Edit(args) => {
            let id = args.id;
            let mut form = tracker.edit(id)?;
            args.apply(&mut form);
            tracker.submit(&form, now, today)?;
            println!("updated {id}");
        }
        Command::Delete(args) => {
            let mut prompt_error = None;
            let deleted = tracker.delete(args.id, |expense| {
                if args.yes {
                    return true;
                }
                let question = format!(
                    "Delete this entry? {} • {} on {}",
                    expense.category,
                    expense.amount.format(currency),
                    expense.date
                );
                prompt::confirm(&question).unwrap_or_else(|err| {
                    prompt_error = Some(err);
                    false
                })
            })?;
            if let Some(err) = prompt_error {
                return Err(err);
            }
            if deleted {
                println!("deleted {}", args.id);
            } else {
                println!("kept {}", args.id);
            }
        }
        Command::List(filters) => {
            tracker.set_query(Query::from(filters));
            print!("{}", render::page(&tracker.view(local_now, &tz)));
        }
        Command::Export(args) => {
            tracker.set_query(Query::from(args.filters));
            let artifact = match args.format {
                ExportFormat::Csv => tracker.export_tabular()?,
                ExportFormat::Pdf => {
                    let renderer = document_renderer(settings)?;
                    tracker.export_document(renderer.as_deref(), local_now)?
                }
            };
            let path = write_artifact(&artifact, args.out.as_deref())?;
            println!("wrote {path}");
        }
    }

    Ok(())
}

fn write_artifact(artifact: &Artifact, out: Option<&str>) -> Result<String> {
    let path = out.unwrap_or(artifact.file_name).to_string();
    std::fs::write(&path, &artifact.bytes)?;
    tracing::info!("wrote {} bytes of {} to {path}", artifact.bytes.len(), artifact.content_type);
    Ok(path)
}

#[cfg(feature = "pdf")]
fn document_renderer(settings: &Settings) -> Result<Option<Box<dyn DocumentRenderer>>> {
    use engine::export::PdfRenderer;

    let renderer = match &settings.pdf_font {
        Some(path) => {
            tracing::debug!("embedding pdf font {path}");
            PdfRenderer::with_font(std::fs::read(path)?)
        }
        None => PdfRenderer::new(),
    };
    Ok(Some(Box::new(renderer)))
}

#[cfg(not(feature = "pdf"))]
fn document_renderer(_settings: &Settings) -> Result<Option<Box<dyn DocumentRenderer>>> {
    Ok(None)
}
