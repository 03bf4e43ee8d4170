// Logging module for structured logging using the tracing crate

use std::error::Error;

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - Filtering from `RUST_LOG` (defaults to `info` when unset)
/// - Compact formatting to stdout
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
///
/// # Examples
///
/// ```
/// use cinecache::logging::init_subscriber;
///
/// // Initialize logging at application startup
/// let _ = init_subscriber();
///
/// // Now you can use tracing macros throughout the application
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber() -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()?;

    Ok(())
}
