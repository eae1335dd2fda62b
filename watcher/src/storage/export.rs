//! Export of a deployment log to a text file

use std::path::PathBuf;

use tracing::info;

use crate::errors::WatchError;
use crate::filesys::file::File;
use crate::models::deployment::DeploymentId;

/// Default export file name for a deployment
pub fn default_log_file_name(id: &DeploymentId) -> String {
    let safe: String = id
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("deployment-{}-logs.txt", safe)
}

/// Write the log text to `path`, or to the default file name in the
/// current directory when no path is given
pub async fn save_log(
    id: &DeploymentId,
    log: &str,
    path: Option<PathBuf>,
) -> Result<PathBuf, WatchError> {
    let path = path.unwrap_or_else(|| PathBuf::from(default_log_file_name(id)));
    let file = File::new(path.clone());
    file.write_atomic(log.as_bytes()).await?;
    info!("Saved log of deployment {} to {}", id, path.display());
    Ok(path)
}
