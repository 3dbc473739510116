use reqwest::StatusCode;
use thiserror::Error;

/// Which of the two upstream calls an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authentication,
    Comparison,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Authentication => "authentication",
            Stage::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure the comparison flow can produce. All of them end the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{stage} request failed")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} rejected with status {status}: {}", truncate_body(.body))]
    Rejected {
        stage: Stage,
        status: StatusCode,
        body: String,
    },

    #[error("malformed {stage} response: {reason}")]
    MalformedResponse { stage: Stage, reason: String },
}

impl Error {
    /// Stage of the upstream call that failed, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Validation(_) => None,
            Error::Transport { stage, .. }
            | Error::Rejected { stage, .. }
            | Error::MalformedResponse { stage, .. } => Some(*stage),
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Shortens a response body for display. The full body stays on the error.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_auth_reads_as_authentication_rejected() {
        let err = Error::Rejected {
            stage: Stage::Authentication,
            status: StatusCode::UNAUTHORIZED,
            body: "invalid api key".into(),
        };

        let msg = err.to_string();
        assert!(msg.starts_with("authentication rejected"));
        assert!(msg.contains("401"));
        assert!(msg.contains("invalid api key"));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.stage(), Some(Stage::Authentication));
    }

    #[test]
    fn long_bodies_are_truncated_for_display_only() {
        let body = "é".repeat(500);
        let err = Error::Rejected {
            stage: Stage::Comparison,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: body.clone(),
        };

        assert!(err.to_string().ends_with("..."));
        match err {
            Error::Rejected { body: kept, .. } => assert_eq!(kept, body),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_response_names_stage() {
        let err = Error::MalformedResponse {
            stage: Stage::Authentication,
            reason: "missing `token` field".into(),
        };

        assert_eq!(
            err.to_string(),
            "malformed authentication response: missing `token` field"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_has_no_stage() {
        let err = Error::Validation("Both city names are required.".into());
        assert_eq!(err.stage(), None);
    }
}
