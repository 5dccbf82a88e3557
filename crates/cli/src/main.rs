//! Exam Labels CLI - reference data management and interactive label queue

mod logging;
mod render;
mod session;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use exam_labels_core::application::LabelDeskService;
use exam_labels_core::domain::{NewSchool, NewSubject, DEFAULT_REGION};
use exam_labels_core::port::time_provider::SystemTimeProvider;
use exam_labels_infra_sqlite::{create_pool, run_migrations, SqliteReferenceRepository};
use render::OutputFormat;
use session::Session;
use settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "exam-labels")]
#[command(about = "Build exam envelope label queues and print labels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: ./exam-labels.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite URL or file path, overrides configuration
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List or register schools
    Schools {
        #[command(subcommand)]
        action: SchoolCommand,
    },

    /// Exam reference data
    Exams {
        #[command(subcommand)]
        action: ExamCommand,
    },

    /// List or register subjects of an exam
    Subjects {
        #[command(subcommand)]
        action: SubjectCommand,
    },

    /// Interactive queue session on stdin
    Session {
        /// Label output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum SchoolCommand {
    /// List schools, optionally filtered by name
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Register a school
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        division: String,

        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },
}

#[derive(Subcommand)]
enum ExamCommand {
    /// List exams
    List,
}

#[derive(Subcommand)]
enum SubjectCommand {
    /// List subjects of an exam
    List {
        #[arg(short, long)]
        exam: i64,
    },

    /// Register a subject under an exam
    Add {
        #[arg(short, long)]
        exam: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        code: Option<String>,
    },
}

async fn open_desk(settings: &Settings) -> Result<LabelDeskService> {
    let url = settings.sqlite_url();
    settings
        .ensure_database_dir()
        .context("Failed to create database directory")?;

    info!(database_url = %url, "Opening reference database");
    let pool = create_pool(&url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    let mut desk = LabelDeskService::new(
        Arc::new(SqliteReferenceRepository::new(pool)),
        settings.id_provider(),
        Arc::new(SystemTimeProvider),
    );
    desk.load_catalog()
        .await
        .context("Failed to load reference data")?;
    Ok(desk)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }

    let log_dir = settings.log_dir();
    let _log_guard = logging::init(&settings.log_format, log_dir.as_deref())?;
    info!("Exam Labels v{} starting...", exam_labels_core::VERSION);

    let mut desk = open_desk(&settings).await?;

    match cli.command {
        Commands::Schools { action } => match action {
            SchoolCommand::List { search } => {
                let schools = match search.as_deref() {
                    Some(query) => desk.search_schools(query),
                    None => desk.catalog().schools().iter().collect(),
                };
                if schools.is_empty() {
                    println!("{}", "No schools found".yellow());
                } else {
                    println!("{}", render::school_table(schools));
                }
            }
            SchoolCommand::Add {
                name,
                division,
                region,
            } => {
                let school = desk
                    .create_school(NewSchool::new(name, region, division))
                    .await?;
                println!("{}", "✓ School registered".green().bold());
                println!();
                println!("{}", render::school_table([&school]));
            }
        },

        Commands::Exams { action } => match action {
            ExamCommand::List => {
                println!("{}", render::exam_table(desk.catalog().exams()));
            }
        },

        Commands::Subjects { action } => match action {
            SubjectCommand::List { exam } => {
                let exam = desk.select_exam(exam).await?;
                println!(
                    "{}",
                    format!("Subjects for {} ({})", exam.name, exam.full_name)
                        .cyan()
                        .bold()
                );
                println!("{}", render::subject_table(desk.catalog().subjects()));
            }
            SubjectCommand::Add { exam, name, code } => {
                desk.select_exam(exam).await?;
                let subject = desk
                    .create_subject(NewSubject::new(name, code.unwrap_or_default()))
                    .await?;
                println!("{}", "✓ Subject registered".green().bold());
                println!();
                println!("{}", render::subject_table([&subject]));
            }
        },

        Commands::Session { format } => {
            let renderer = render::renderer_for(format, std::io::stdout());
            let stdin = std::io::stdin();
            let mut session = Session::new(desk, renderer, stdin.lock(), std::io::stdout());
            session.run().await?;
        }
    }

    Ok(())
}
