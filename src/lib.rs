//! Last.fm CLI Library
//!
//! This library provides a client for the Last.fm web API: request signing,
//! the desktop authentication handshake and the user track listings, plus the
//! CLI operations built on top of them.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared by the whole library
//! - `lastfm` - Last.fm API client implementation
//! - `management` - Persistence of the session between runs
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use lfmcli::{config, lastfm::LastfmClient};
//!
//! #[tokio::main]
//! async fn main() -> lfmcli::Res<()> {
//!     config::load_env().await?;
//!     let client = LastfmClient::from_config(&config::Config::from_env()?)?;
//!     // Authenticate, then fetch tracks...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lastfm;
pub mod management;
pub mod types;
pub mod utils;

pub use error::{ErrorKind, LastfmError};

/// A convenient Result type alias for CLI glue code.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so that
/// library errors, I/O errors and `.env` parse errors can all flow through `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors where recovery is not possible: code after this
/// macro does not run.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
