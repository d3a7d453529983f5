use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use lessonpad::ai::GeminiClient;
use lessonpad::api::{ConfigAction, LessonApi};
use lessonpad::config::LessonpadConfig;
use lessonpad::editor::edit_record;
use lessonpad::error::{LessonError, Result};
use lessonpad::model::LessonRecord;
use lessonpad::store::fs::FileStore;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

mod args;
mod render;
use args::{Cli, Commands, FieldArgs};

const HOME_ENV: &str = "LESSONPAD_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: LessonApi<FileStore>,
    config: LessonpadConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::New { fields, no_editor }) => handle_new(&mut ctx, fields, no_editor),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::View { indexes }) => handle_view(&ctx, indexes),
        Some(Commands::Edit { index, fields }) => handle_edit(&mut ctx, index, fields),
        Some(Commands::Suggest {
            index,
            fields,
            yes,
            dry_run,
        }) => handle_suggest(&mut ctx, index, fields, yes, dry_run),
        Some(Commands::Delete { indexes }) => handle_delete(&mut ctx, indexes),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "lessonpad", "lessonpad")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| LessonError::Api("Could not determine data directory".to_string()))
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    debug!(data_dir = %data_dir.display(), "init_context");

    let config = LessonpadConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "could not read config, using defaults");
        LessonpadConfig::default()
    });
    let store = FileStore::new(data_dir.clone());
    let api = LessonApi::new(store, &config, data_dir);

    Ok(AppContext { api, config })
}

impl FieldArgs {
    fn is_empty(&self) -> bool {
        self.topic.is_none()
            && self.subject.is_none()
            && self.grade.is_none()
            && self.date.is_none()
            && self.summary.is_none()
            && self.notes.is_none()
    }

    fn apply_to(&self, record: &mut LessonRecord) {
        let slots = [
            (&self.topic, &mut record.topic),
            (&self.subject, &mut record.subject),
            (&self.grade, &mut record.grade_level),
            (&self.date, &mut record.date),
            (&self.summary, &mut record.summary),
            (&self.notes, &mut record.notes),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }
}

fn check_date(record: &LessonRecord) -> Result<()> {
    let date = record.date.trim();
    if date.is_empty() || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        return Ok(());
    }
    Err(LessonError::Validation(format!(
        "Invalid date: {} (expected YYYY-MM-DD)",
        date
    )))
}

fn handle_new(ctx: &mut AppContext, fields: FieldArgs, no_editor: bool) -> Result<()> {
    let mut record = LessonRecord::blank();
    fields.apply_to(&mut record);
    if !no_editor {
        record = edit_record(&record)?;
    }
    check_date(&record)?;

    let result = ctx.api.create_lesson(record)?;
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_lessons()?;
    render::print_lessons(&result.listed_lessons);
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.view_lessons(&indexes)?;
    render::print_full_lessons(&result.listed_lessons);
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, index: String, fields: FieldArgs) -> Result<()> {
    let result = ctx.api.edit_lesson(&index, |record| {
        let edited = if fields.is_empty() {
            edit_record(record)?
        } else {
            let mut edited = record.clone();
            fields.apply_to(&mut edited);
            edited
        };
        check_date(&edited)?;
        Ok(edited)
    })?;
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_suggest(
    ctx: &mut AppContext,
    index: Option<String>,
    fields: FieldArgs,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    if index.is_some() && !fields.is_empty() {
        return Err(LessonError::Api(
            "Field options only apply to new lessons; use `lessonpad edit` first".to_string(),
        ));
    }

    let client = GeminiClient::from_config(&ctx.config.ai)?;
    eprintln!(
        "{}",
        format!("Asking {} for a lesson plan...", ctx.config.ai.model).dimmed()
    );

    let review = |draft: &LessonRecord, suggestion: &lessonpad::model::Suggestion| {
        render::print_suggestion(draft, suggestion);
        if dry_run {
            false
        } else {
            yes || confirm("Apply this suggestion and save?")
        }
    };

    let result = match index {
        Some(index) => ctx.api.suggest_existing(&index, &client, review)?,
        None => {
            let mut record = LessonRecord::blank();
            fields.apply_to(&mut record);
            check_date(&record)?;
            ctx.api.suggest_new(record, &client, review)?
        }
    };
    render::print_messages(&result.messages);
    Ok(())
}

/// Asks a yes/no question on stdin; anything but y/yes is no.
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn handle_delete(ctx: &mut AppContext, indexes: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_lessons(&indexes)?;
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    render::print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if show_all && let Some(config) = &result.config {
        render::print_config(config);
    }
    render::print_messages(&result.messages);
    Ok(())
}
