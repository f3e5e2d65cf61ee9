use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Local, NaiveDate};
use log::{Level, Metadata, Record};
use simplelog::{Config, SharedLogger};

/// Appends errors to a file. On the first error of a new day previous file
/// is renamed to `{stem}.{date}.{ext}`
#[derive(Debug)]
pub(crate) struct ErrorFileLogger {
    path: PathBuf,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    file: Option<File>,
    /// Day of records in current file
    day: NaiveDate,
}

impl ErrorFileLogger {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Box<Self> {
        let path = path.into();
        let day = last_modified_day(&path).unwrap_or_else(|| Local::now().date_naive());
        Box::new(Self {
            path,
            state: Mutex::new(State { file: None, day }),
        })
    }

    fn write(&self, line: &str, today: NaiveDate) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.day != today {
            state.file = None;
            if self.path.exists() {
                fs::rename(&self.path, rotated_path(&self.path, state.day))?;
            }
            state.day = today;
        }

        if state.file.is_none() {
            state.file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        match &mut state.file {
            Some(file) => writeln!(file, "{line}"),
            None => Ok(()),
        }
    }
}

fn last_modified_day(path: &Path) -> Option<NaiveDate> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified).date_naive())
}

fn rotated_path(path: &Path, day: NaiveDate) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{day}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{day}"),
    };
    path.with_file_name(name)
}

fn format_record(record: &Record, now: DateTime<Local>) -> String {
    let mut msg = format!(
        "{} [{}] {}\n        at {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.args(),
        record.target()
    );
    if let Some(file) = record.file() {
        msg += &format!(": {file}");
        if let Some(line) = record.line() {
            msg += &format!(":{line}");
        }
    }
    msg
}

impl log::Log for ErrorFileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Error
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = Local::now();
            if let Err(e) = self.write(&format_record(record, now), now.date_naive()) {
                eprintln!("failed to write error log to {}: {e}", self.path.display());
            }
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = &mut state.file {
            let _ = file.flush();
        }
    }
}

impl SharedLogger for ErrorFileLogger {
    fn level(&self) -> log::LevelFilter {
        log::LevelFilter::Error
    }

    fn config(&self) -> Option<&Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn log::Log> {
        Box::new(*self)
    }
}
