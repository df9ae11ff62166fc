use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    DryRunRecordStore, DtoFormController, FormSnapshot, RecordStore, RestRecordStore,
    SubmitOutcome, SUCCESS_MESSAGE,
};
use shared::{domain::AnswerLabel, QuestionBank};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "dto_cli", about = "DTO inspection checklist")]
struct Args {
    /// TOML config file (defaults to ./dto_form.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Question bank JSON, overriding the configured path.
    #[arg(long, global = true)]
    question_bank: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List areas and their subareas.
    Areas,
    /// Print the checklist of one subarea.
    Questions {
        #[arg(long)]
        area: String,
        #[arg(long)]
        subarea: String,
    },
    /// Fill in and submit one checklist.
    Submit(SubmitArgs),
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    /// Date as DD/MM/YYYY or DDMMYYYY.
    #[arg(long)]
    date: String,
    #[arg(long)]
    supervisor: String,
    #[arg(long)]
    collaborator: String,
    #[arg(long)]
    role: String,
    #[arg(long)]
    area: String,
    #[arg(long)]
    subarea: String,
    /// Answers in question order, e.g. OK,NOK,OK.
    #[arg(long, value_delimiter = ',')]
    answers: Vec<AnswerLabel>,
    /// Validate and log the row without sending it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let bank_path = args
        .question_bank
        .clone()
        .unwrap_or_else(|| settings.question_bank_path.clone());
    let bank = load_question_bank(&bank_path)?;

    match args.command {
        Command::Areas => {
            for area in bank.areas() {
                let subareas: Vec<&str> = bank.subareas(area).into_iter().flatten().collect();
                println!(
                    "{} ({area}): {}",
                    QuestionBank::area_label(area),
                    subareas.join(", ")
                );
            }
        }
        Command::Questions { area, subarea } => {
            let Some(questions) = bank.questions(&area, &subarea) else {
                bail!("no checklist for area '{area}' subarea '{subarea}'");
            };
            println!("Checklist: {subarea}");
            for (index, question) in questions.iter().enumerate() {
                println!("{}. {question}", index + 1);
            }
        }
        Command::Submit(submit) => {
            let store: Arc<dyn RecordStore> = if submit.dry_run {
                Arc::new(DryRunRecordStore)
            } else {
                let (url, key) = settings.credentials()?;
                Arc::new(RestRecordStore::new(url, key)?)
            };
            run_submit(Arc::new(bank), store, submit).await?;
        }
    }

    Ok(())
}

fn load_question_bank(path: &Path) -> Result<QuestionBank> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank '{}'", path.display()))?;
    let bank = QuestionBank::from_json_str(&raw)
        .with_context(|| format!("invalid question bank '{}'", path.display()))?;
    if bank.is_empty() {
        bail!("question bank '{}' has no areas", path.display());
    }
    Ok(bank)
}

async fn run_submit(
    bank: Arc<QuestionBank>,
    store: Arc<dyn RecordStore>,
    args: SubmitArgs,
) -> Result<()> {
    let controller = DtoFormController::new(bank, store);

    controller.set_date(&args.date).await;
    controller.set_supervisor(args.supervisor).await;
    controller.set_collaborator(args.collaborator).await;
    controller.set_role(args.role).await;
    controller.set_area(&args.area).await?;
    controller.set_subarea(&args.subarea).await?;
    for (index, label) in args.answers.into_iter().enumerate() {
        controller.set_answer(index, label).await;
    }

    print!("{}", render_form(&controller.snapshot().await));

    match controller.submit().await {
        SubmitOutcome::Submitted => {
            println!("{SUCCESS_MESSAGE}");
            Ok(())
        }
        SubmitOutcome::Rejected(err) => {
            let message = controller
                .snapshot()
                .await
                .error
                .unwrap_or_else(|| err.user_message());
            bail!("Erro: {message}")
        }
        SubmitOutcome::Ignored => bail!("a submission is already in progress"),
    }
}

/// Plain-text rendering of the filled form, one line per field and question.
fn render_form(snapshot: &FormSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("Data: {}\n", snapshot.masked_date));
    out.push_str(&format!("Supervisor: {}\n", snapshot.fields.supervisor));
    out.push_str(&format!("Colaborador: {}\n", snapshot.fields.collaborator));
    out.push_str(&format!("Função: {}\n", snapshot.fields.role));
    out.push_str(&format!(
        "Área: {} / Subárea: {}\n",
        QuestionBank::area_label(&snapshot.selection.area),
        snapshot.selection.subarea
    ));
    if !snapshot.questions.is_empty() {
        out.push_str(&format!("Checklist: {}\n", snapshot.selection.subarea));
    }
    for (index, question) in snapshot.questions.iter().enumerate() {
        let answer = snapshot
            .answers
            .get(&index)
            .map_or("-", |label| label.as_str());
        out.push_str(&format!("{}. {question} [{answer}]\n", index + 1));
    }
    out
}
