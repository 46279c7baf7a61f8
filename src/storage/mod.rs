pub mod database;
pub mod session;

pub use session::Session;

use std::fs;
use std::path::Path;

/// Ensure data directory exists
pub fn ensure_data_dir(data_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(data_dir)?;
    Ok(())
}
