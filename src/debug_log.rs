//! Diagnostic logging for load and aggregation passes.
//!
//! Enable by setting environment variable: SMSSTATS_DEBUG_LOG=1
//! Logs are written to /tmp/smsstats-debug.log

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

const LOG_PATH: &str = "/tmp/smsstats-debug.log";

static ENABLED: AtomicBool = AtomicBool::new(false);
static START_TIME: OnceLock<Instant> = OnceLock::new();
static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

/// Initialize debug logging. Call once at startup.
pub fn init() {
    if std::env::var("SMSSTATS_DEBUG_LOG").is_err() {
        return;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_PATH);

    match file {
        Ok(file) => {
            START_TIME.get_or_init(Instant::now);
            LOG_FILE.get_or_init(|| Mutex::new(file));
            ENABLED.store(true, Ordering::SeqCst);
            log("DEBUG", "init", "Debug logging initialized");
        }
        Err(e) => eprintln!("Could not open {LOG_PATH} for debug logging: {e}"),
    }
}

#[inline]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Log a debug line with elapsed time and thread ID.
pub fn log(category: &str, action: &str, detail: &str) {
    if !is_enabled() {
        return;
    }

    let elapsed = START_TIME
        .get()
        .map(|s| s.elapsed().as_millis())
        .unwrap_or(0);
    let thread_id = std::thread::current().id();

    let line = format!(
        "[{:>8}ms] [{:?}] [{}] {} - {}\n",
        elapsed, thread_id, category, action, detail
    );

    if let Some(file_mutex) = LOG_FILE.get()
        && let Ok(mut file) = file_mutex.lock()
    {
        let _ = file.write_all(line.as_bytes());
        let _ = file.flush();
    }
}

/// Logs a phase's duration when dropped.
pub struct PhaseTimer {
    phase: &'static str,
    label: String,
    started: Instant,
}

impl PhaseTimer {
    pub fn start(phase: &'static str, label: impl Into<String>) -> Self {
        Self {
            phase,
            label: label.into(),
            started: Instant::now(),
        }
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        if is_enabled() {
            let detail = format!("{} ({}us)", self.label, self.started.elapsed().as_micros());
            log(self.phase, "FINISH", &detail);
        }
    }
}
