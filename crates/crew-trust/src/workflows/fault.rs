//! Fail-open boundary shared by the orchestrators.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use super::trust::{CandidateId, RepositoryError};

/// Faults raised inside a computation run. They never escape an engine.
#[derive(Debug, thiserror::Error)]
pub enum ComputationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("unable to serialize result detail: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("non-finite value produced by {stage}")]
    NonFinite { stage: &'static str },
}

/// Run a computation, converting any error or panic into "no result" plus a warning.
pub(crate) fn fail_open<T>(
    engine: &'static str,
    candidate_id: &CandidateId,
    run: impl FnOnce() -> Result<Option<T>, ComputationError>,
) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            warn!(engine, candidate_id = %candidate_id, error = %err, "computation failed; returning no result");
            None
        }
        Err(payload) => {
            warn!(
                engine,
                candidate_id = %candidate_id,
                panic = panic_message(payload.as_ref()),
                "computation panicked; returning no result"
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_and_panics_become_no_result() {
        let id = CandidateId::new("cand-fault");
        let failed: Option<u8> = fail_open("test", &id, || {
            Err(RepositoryError::Unavailable("offline".to_string()).into())
        });
        assert!(failed.is_none());

        let panicked: Option<u8> = fail_open("test", &id, || panic!("boom"));
        assert!(panicked.is_none());

        let produced = fail_open("test", &id, || Ok(Some(7u8)));
        assert_eq!(produced, Some(7));
    }
}
