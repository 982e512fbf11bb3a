use crew_trust::config::ConfigError;
use crew_trust::telemetry::TelemetryError;

use crate::infra::InputError;

/// Failures surfaced by the command-line runner. Scoring itself never fails outward.
///
/// Messages name the stage only; `main` prints the `source()` chain underneath.
#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error("configuration error")]
    Config(#[from] ConfigError),
    #[error("telemetry error")]
    Telemetry(#[from] TelemetryError),
    #[error("input error")]
    Input(#[from] InputError),
    #[error("unable to render result")]
    Render(#[source] serde_json::Error),
}

/// Top-level message followed by one `caused by:` line per source.
pub(crate) fn report(err: &AppError) -> String {
    let mut out = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_trust::workflows::trust::RepositoryError;

    #[test]
    fn report_walks_the_typed_source_chain() {
        let err = AppError::from(InputError::from(RepositoryError::Unavailable(
            "store offline".to_string(),
        )));
        assert!(matches!(err, AppError::Input(InputError::Repository(_))));

        let rendered = report(&err);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "input error");
        assert!(lines[1].starts_with("  caused by: unable to stage input"));
        assert!(rendered.contains("store offline"));
    }
}
