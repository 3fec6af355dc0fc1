//! Loading a [`SessionConfig`] from JSON.

use std::path::Path;

use quizforge_game::SessionConfig;
use tracing::info;

use crate::QuizError;

/// Reads a JSON session config. Missing fields take their defaults.
///
/// The result is validated, so out-of-range values are clamped (and
/// logged) rather than rejected.
pub async fn load_config(path: impl AsRef<Path>) -> Result<SessionConfig, QuizError> {
    let path = path.as_ref();
    let config_error = |reason: String| QuizError::Config {
        path: path.to_path_buf(),
        reason,
    };

    let data = tokio::fs::read(path)
        .await
        .map_err(|e| config_error(e.to_string()))?;
    let config: SessionConfig =
        serde_json::from_slice(&data).map_err(|e| config_error(e.to_string()))?;

    info!(path = %path.display(), "session config loaded");
    Ok(config.validated())
}
