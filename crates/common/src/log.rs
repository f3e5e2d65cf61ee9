use std::fmt::Display;

pub trait LogError {
    fn log_error_msg(&self, msg: &str) -> &Self;
    fn log_error_msg_with<M, F>(&self, f: F) -> &Self
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> LogError for Result<T, E>
where
    E: Display,
{
    fn log_error_msg(&self, msg: &str) -> &Self {
        if let Err(e) = self {
            log::error!("{msg}: {e}")
        }
        self
    }
    fn log_error_msg_with<M, F>(&self, f: F) -> &Self
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        if self.is_err() {
            self.log_error_msg(&f().into());
        }
        self
    }
}

/// Terminal logger for tests. Safe to call many times
pub fn init_test_logger() {
    let _ = simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .add_filter_ignore_str("sqlx")
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}
