//! School Manager CLI - record keeping for students, teachers and class sections

use clap::{Parser, Subcommand};
use school_manager::{config, SqliteStore};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "school-manager")]
#[command(version)]
#[command(about = "Record keeping for students, teachers and class sections")]
#[command(long_about = r#"
School Manager keeps students, teachers and class sections in a local
SQLite database, along with who teaches which section and who is enrolled
where.

Example usage:
  school-manager student add "Ada" 3.9
  school-manager section add 50
  school-manager section enroll 1 1
  school-manager teacher add "Grace"
  school-manager teacher assign 1 1
  school-manager teacher show 1
  school-manager report
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Manage teachers and their section assignments
    Teacher {
        #[command(subcommand)]
        action: TeacherAction,
    },

    /// Manage class sections and enrollment
    Section {
        #[command(subcommand)]
        action: SectionAction,
    },

    /// Show totals, average GPA and dangling links
    Report,
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// Add a student
    Add {
        name: String,
        #[arg(allow_negative_numbers = true)]
        gpa: f64,
    },
    /// List all students
    List,
    /// Show one student
    Show { id: i64 },
    /// Change a student's name and/or GPA
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        gpa: Option<f64>,
    },
    /// Delete a student (enrollment rows are kept)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum TeacherAction {
    /// Add a teacher
    Add { name: String },
    /// List all teachers with their sections
    List,
    /// Show one teacher, their sections and enrolled students
    Show { id: i64 },
    /// Rename a teacher
    Rename { id: i64, name: String },
    /// Assign a section to a teacher
    Assign { teacher_id: i64, section_id: i64 },
    /// Remove a section from a teacher
    Unassign { teacher_id: i64, section_id: i64 },
    /// Delete a teacher (assignment rows are kept)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Add a section of the given length in minutes
    Add { length: i64 },
    /// List all sections with their students
    List,
    /// Show one section and its students
    Show { id: i64 },
    /// Change a section's length
    Update { id: i64, length: i64 },
    /// Enroll a student in a section
    Enroll { section_id: i64, student_id: i64 },
    /// Remove a student from a section
    Drop { section_id: i64, student_id: i64 },
    /// Delete a section (assignment and enrollment rows are kept)
    Delete { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print a JSON success envelope. Human mode prints its own output instead.
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn emit_failure(output_mode: OutputMode, err: &anyhow::Error) {
    if output_mode.is_human() {
        school_manager::ui::error(&format!("{err:#}"));
    } else {
        let envelope = serde_json::json!({
            "ok": false,
            "error": format!("{err:#}"),
        });
        println!("{envelope}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    match run(cli, output_mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Command failed: {err:?}");
            emit_failure(output_mode, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let database = cli.database.as_deref();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            let config_path = config_path.map(Path::to_path_buf).unwrap_or_else(config::default_config_path);
            let database = database.map(Path::to_path_buf).unwrap_or_else(config::default_database_path);
            commands::run_init(&config_path, &database, force, output_mode)
        }
        Commands::Student { action } => with_store(database, config_path, |store, _| {
            commands::run_student(store, action, output_mode)
        }),
        Commands::Teacher { action } => with_store(database, config_path, |store, _| {
            commands::run_teacher(store, action, output_mode)
        }),
        Commands::Section { action } => with_store(database, config_path, |store, _| {
            commands::run_section(store, action, output_mode)
        }),
        Commands::Report => with_store(database, config_path, |store, path| {
            commands::run_report(store, path, output_mode)
        }),
    }
}

/// Open the store for one command and release it afterwards
fn with_store<F>(database: Option<&Path>, config_path: Option<&Path>, f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut SqliteStore, &Path) -> anyhow::Result<()>,
{
    let loaded = config::load_config(config_path)?;
    let database = config::resolve_database(database, loaded.as_ref());
    config::ensure_db_dir(&database)?;

    let mut store = SqliteStore::open(&database)?;
    store.initialize_schema()?;
    f(&mut store, &database)?;
    store.close()?;
    Ok(())
}
