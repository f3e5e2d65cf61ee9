mod env;
mod log;
mod tokio;
pub mod types;

pub use self::env::*;
pub use self::log::*;
pub use self::tokio::*;
