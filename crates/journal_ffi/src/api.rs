//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the journal form/list/total flow to Dart via FRB.
//! - Translate core errors into stable response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - No journal call touches storage until `journal_configure` has succeeded.
//! - Every view load is a fresh fetch; nothing is cached between calls.

use journal_core::db::open_db;
use journal_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AppConfig, EntryLog,
    EntryStore, JournalView, MemoryEntryStore, SqliteEntryStore, StoreBackend,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static CONFIG: OnceLock<AppConfig> = OnceLock::new();
static MEMORY_STORE: OnceLock<Mutex<MemoryEntryStore>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Resolves journal configuration from the secrets file and environment.
///
/// `secrets_path` defaults to `.journal/secrets.toml` when `None` or blank.
///
/// # FFI contract
/// - Returns empty string on success, the configuration error otherwise.
/// - Once successful, later calls are no-ops returning empty string.
/// - Until successful, every journal call reports "not configured".
#[flutter_rust_bridge::frb(sync)]
pub fn journal_configure(secrets_path: Option<String>) -> String {
    if CONFIG.get().is_some() {
        return String::new();
    }

    let path = secrets_path
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(journal_core::config::DEFAULT_SECRETS_PATH));

    match AppConfig::load(&path) {
        Ok(config) => {
            if CONFIG.set(config).is_err() {
                // A concurrent call won; its configuration stays in force.
                log::debug!("event=configure module=ffi status=skipped reason=already_configured");
            }
            String::new()
        }
        Err(err) => {
            log::error!("event=configure module=ffi status=error error={err}");
            err.to_string()
        }
    }
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether the entry was persisted.
    pub ok: bool,
    /// Storage-assigned id on success.
    pub entry_id: Option<i64>,
    /// Human-readable message for the UI.
    pub message: String,
}

impl EntryActionResponse {
    fn success(entry_id: i64) -> Self {
        Self {
            ok: true,
            entry_id: Some(entry_id),
            message: "Entry Added!".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

/// One rendered journal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalViewItem {
    pub entry_id: i64,
    pub task: String,
    pub minutes: i64,
    /// Creation time formatted in the configured display offset.
    pub created_at: String,
}

/// Journal list plus total for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalViewResponse {
    /// Most recent first; empty on failure.
    pub items: Vec<JournalViewItem>,
    /// Zero on failure.
    pub total_minutes: i64,
    /// False when entries could not be loaded.
    pub ok: bool,
    /// Placeholder, summary or error text for the UI.
    pub message: String,
}

impl JournalViewResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            total_minutes: 0,
            ok: false,
            message: message.into(),
        }
    }
}

/// Adds one entry from the journal form.
///
/// Callers re-run `journal_load_view` after a successful add.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_add_entry(task: String, minutes: i64) -> EntryActionResponse {
    match with_entry_log(|log, _| log.add(&task, minutes)) {
        Ok(Ok(entry)) => EntryActionResponse::success(entry.id),
        Ok(Err(err)) => EntryActionResponse::failure(err.user_message()),
        Err(message) => EntryActionResponse::failure(message),
    }
}

/// Loads the journal list and total.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; read failures yield an empty, zero-total response with `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_load_view() -> JournalViewResponse {
    match with_entry_log(|log, config| JournalView::load(log, &config.display)) {
        Ok(view) => to_view_response(view),
        Err(message) => JournalViewResponse::failure(message),
    }
}

fn to_view_response(view: JournalView) -> JournalViewResponse {
    if let Some(error) = view.error {
        return JournalViewResponse::failure(error);
    }

    let message = if view.rows.is_empty() {
        journal_core::view::EMPTY_PLACEHOLDER.to_string()
    } else {
        format!("{} entries.", view.rows.len())
    };
    JournalViewResponse {
        items: view
            .rows
            .into_iter()
            .map(|row| JournalViewItem {
                entry_id: row.id,
                task: row.task,
                minutes: row.minutes,
                created_at: row.created_at,
            })
            .collect(),
        total_minutes: view.total_minutes,
        ok: true,
        message,
    }
}

fn with_entry_log<T>(
    f: impl FnOnce(&EntryLog<&dyn EntryStore>, &AppConfig) -> T,
) -> Result<T, String> {
    let config = CONFIG
        .get()
        .ok_or_else(|| "journal is not configured; call journal_configure first".to_string())?;

    match &config.backend {
        StoreBackend::Sqlite { path } => {
            let conn = open_db(path).map_err(|err| format!("journal DB open failed: {err}"))?;
            let store = SqliteEntryStore::try_new(&conn)
                .map_err(|err| format!("journal store init failed: {err}"))?;
            let log = EntryLog::new(&store as &dyn EntryStore);
            Ok(f(&log, config))
        }
        StoreBackend::Memory => {
            let guard = MEMORY_STORE
                .get_or_init(|| Mutex::new(MemoryEntryStore::new()))
                .lock()
                .map_err(|_| "journal memory store is unavailable".to_string())?;
            let log = EntryLog::new(&*guard as &dyn EntryStore);
            Ok(f(&log, config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, journal_add_entry, journal_configure, journal_load_view,
    };
    use std::sync::Once;
    use std::time::{SystemTime, UNIX_EPOCH};

    static CONFIGURE: Once = Once::new();

    fn configure_for_tests() {
        CONFIGURE.call_once(|| {
            let dir = std::env::temp_dir().join(unique_token("journal-ffi"));
            std::fs::create_dir_all(&dir).expect("create test dir");
            let secrets = dir.join("secrets.toml");
            let db_path = dir.join("journal.sqlite3");
            std::fs::write(
                &secrets,
                format!(
                    "dbname = {:?}\ndisplay_offset = \"UTC\"\n",
                    db_path.to_str().expect("utf-8 path")
                ),
            )
            .expect("write secrets");

            let error = journal_configure(Some(secrets.to_string_lossy().into_owned()));
            assert!(error.is_empty(), "{error}");
        });
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/journal-logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_is_a_no_op_once_configured() {
        let dir = std::env::temp_dir().join(unique_token("journal-ffi-missing"));
        std::fs::create_dir_all(&dir).expect("create test dir");
        let secrets = dir.join("secrets.toml");
        std::fs::write(&secrets, "log_level = \"info\"\n").expect("write secrets");

        configure_for_tests();
        // Already configured: later calls are no-ops.
        assert!(journal_configure(Some(secrets.to_string_lossy().into_owned())).is_empty());
    }

    #[test]
    fn added_entry_appears_in_refreshed_view() {
        configure_for_tests();
        let task = unique_token("walk");

        let added = journal_add_entry(task.clone(), 15);
        assert!(added.ok, "{}", added.message);
        let entry_id = added.entry_id.expect("entry id on success");

        let view = journal_load_view();
        assert!(view.ok, "{}", view.message);
        let item = view
            .items
            .iter()
            .find(|item| item.entry_id == entry_id)
            .expect("added entry listed");
        assert_eq!(item.task, task);
        assert_eq!(item.minutes, 15);
        assert!(view.total_minutes >= 15);
        assert_eq!(
            view.total_minutes,
            view.items.iter().map(|item| item.minutes).sum::<i64>()
        );
    }

    #[test]
    fn invalid_submission_is_rejected_with_message() {
        configure_for_tests();

        let negative = journal_add_entry("Walk".to_string(), -5);
        assert!(!negative.ok);
        assert!(negative.entry_id.is_none());
        assert!(negative.message.contains("minutes"));

        let blank = journal_add_entry("   ".to_string(), 5);
        assert!(!blank.ok);
        assert!(blank.message.contains("task"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{}-{nanos}", std::process::id())
    }
}
