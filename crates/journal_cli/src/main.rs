//! Terminal front end for the journal.
//!
//! # Responsibility
//! - Resolve configuration once; stop before touching storage if it is incomplete.
//! - Render the journal view, optionally after adding one entry.

use clap::{Parser, Subcommand};
use journal_core::config::DEFAULT_SECRETS_PATH;
use journal_core::db::open_db;
use journal_core::{
    init_logging, AppConfig, EntryLog, EntryStore, JournalView, MemoryEntryStore,
    SqliteEntryStore, StoreBackend, StoreError,
};
use log::error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;

/// Log minutes spent on tasks and show the running total.
#[derive(Debug, Parser)]
#[command(name = "journal", version)]
struct Cli {
    /// TOML secrets file holding `dbname` and other settings.
    #[arg(long, env = "JOURNAL_SECRETS", default_value = DEFAULT_SECRETS_PATH)]
    secrets: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add an entry, then show the refreshed journal.
    Add {
        /// Minutes spent.
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
        /// What was done.
        task: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    ExitCode::from(run_cli(cli, &mut stdout, &mut stderr))
}

/// Runs one invocation and returns the process exit status.
fn run_cli(cli: Cli, out: &mut impl Write, err: &mut impl Write) -> u8 {
    let config = match AppConfig::load(&cli.secrets) {
        Ok(config) => config,
        Err(config_err) => {
            let _ = writeln!(err, "configuration error: {config_err}");
            return EXIT_CONFIG;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(log_err) = init_logging(config.log_level, &log_dir.to_string_lossy()) {
            let _ = writeln!(err, "logging disabled: {log_err}");
        }
    }

    match &config.backend {
        StoreBackend::Sqlite { path } => {
            let conn = match open_db(path) {
                Ok(conn) => conn,
                Err(db_err) => return storage_unavailable(db_err.to_string(), err),
            };
            match SqliteEntryStore::try_new(&conn) {
                Ok(store) => run(cli.command, store, &config, out, err),
                Err(store_err) => storage_unavailable(store_err.to_string(), err),
            }
        }
        // Entries last for this run only.
        StoreBackend::Memory => run(cli.command, MemoryEntryStore::new(), &config, out, err),
    }
}

fn run<S: EntryStore>(
    command: Option<Command>,
    store: S,
    config: &AppConfig,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    let log = EntryLog::new(store);
    let mut status = EXIT_OK;

    if let Some(Command::Add { minutes, task }) = command {
        match log.add(&task.join(" "), minutes) {
            Ok(_) => {
                let _ = writeln!(out, "Entry Added!\n");
            }
            Err(add_err) => {
                let _ = writeln!(err, "{}", add_err.user_message());
                status = EXIT_FAILURE;
            }
        }
    }

    let view = JournalView::load(&log, &config.display);
    let _ = write!(out, "{}", view.render_text());
    if view.error.is_some() {
        status = EXIT_FAILURE;
    }
    status
}

fn storage_unavailable(detail: String, err: &mut impl Write) -> u8 {
    let store_err = StoreError::Connection(detail);
    error!("event=store_open module=cli status=error error={store_err}");
    let _ = writeln!(err, "{store_err}");
    EXIT_FAILURE
}

#[cfg(test)]
mod tests {
    use super::{run_cli, Cli, Command, EXIT_CONFIG, EXIT_FAILURE, EXIT_OK};
    use clap::Parser;
    use std::path::Path;

    fn run_with_secrets(secrets: &Path, args: &[&str]) -> (u8, String, String) {
        let mut argv = vec!["journal", "--secrets", secrets.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = run_cli(cli, &mut out, &mut err);
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn no_subcommand_shows_the_journal() {
        let cli = Cli::try_parse_from(["journal"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn add_collects_remaining_words_into_task() {
        let cli = Cli::try_parse_from(["journal", "add", "20", "Read", "Bible"]).unwrap();
        match cli.command {
            Some(Command::Add { minutes, task }) => {
                assert_eq!(minutes, 20);
                assert_eq!(task.join(" "), "Read Bible");
            }
            None => panic!("expected add command"),
        }
    }

    #[test]
    fn add_requires_numeric_minutes() {
        assert!(Cli::try_parse_from(["journal", "add", "twenty", "Walk"]).is_err());
        assert!(Cli::try_parse_from(["journal", "add"]).is_err());
        assert!(Cli::try_parse_from(["journal", "remove", "1"]).is_err());
    }

    #[test]
    fn missing_dbname_exits_with_config_status_before_storage() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = dir.path().join("secrets.toml");
        std::fs::write(&secrets, "log_level = \"info\"\n").unwrap();

        let (status, out, err) = run_with_secrets(&secrets, &["add", "15", "Walk"]);
        assert_eq!(status, EXIT_CONFIG);
        assert!(out.is_empty());
        assert!(err.contains("dbname"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn unreadable_database_reports_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("garbage.db");
        std::fs::write(&db_path, vec![b'x'; 4096]).unwrap();
        let secrets = dir.path().join("secrets.toml");
        std::fs::write(
            &secrets,
            format!("dbname = {:?}\n", db_path.to_str().unwrap()),
        )
        .unwrap();

        let (status, out, err) = run_with_secrets(&secrets, &[]);
        assert_eq!(status, EXIT_FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("storage unavailable"));
    }

    #[test]
    fn add_then_show_renders_refreshed_total() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("journal.db");
        let secrets = dir.path().join("secrets.toml");
        std::fs::write(
            &secrets,
            format!("dbname = {:?}\n", db_path.to_str().unwrap()),
        )
        .unwrap();

        let (status, out, _) = run_with_secrets(&secrets, &["add", "20", "Read", "Bible"]);
        assert_eq!(status, EXIT_OK);
        assert!(out.starts_with("Entry Added!"));
        assert!(out.contains("Total Time: 20 minutes"));

        let (status, out, _) = run_with_secrets(&secrets, &["add", "15", "Walk"]);
        assert_eq!(status, EXIT_OK);
        assert!(out.contains("Total Time: 35 minutes"));
        let walk = out.find("Walk").unwrap();
        let read = out.find("Read Bible").unwrap();
        assert!(walk < read);
    }

    #[test]
    fn rejected_submission_exits_with_failure_but_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = dir.path().join("secrets.toml");
        std::fs::write(&secrets, "backend = \"memory\"\n").unwrap();

        let (status, out, err) = run_with_secrets(&secrets, &["add", "-5", "Walk"]);
        assert_eq!(status, EXIT_FAILURE);
        assert!(err.contains("minutes"));
        assert!(out.contains("No entries yet."));
    }
}
