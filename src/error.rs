use thiserror::Error;

/// Errors raised while building a calculator or solving for a temperature.
#[derive(Error, Debug)]
pub enum ClosureError {
    #[error("Invalid geometry '{name}': expected one of sphere, cylinder, plane")]
    InvalidGeometry { name: String },

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Solver diverged ({method}): {reason}")]
    SolverDivergence { method: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ClosureResult<T> = Result<T, ClosureError>;

impl ClosureError {
    pub(crate) fn divergence(method: &'static str, reason: impl Into<String>) -> Self {
        ClosureError::SolverDivergence {
            method,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_geometry_message() {
        let err = ClosureError::InvalidGeometry {
            name: "cube".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cube"));
        assert!(msg.contains("sphere"));
    }

    #[test]
    fn test_divergence_message() {
        let err = ClosureError::divergence("brent", "root not bracketed");
        assert_eq!(err.to_string(), "Solver diverged (brent): root not bracketed");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: ClosureError = parse.unwrap_err().into();
        assert!(matches!(err, ClosureError::Json(_)));
    }
}
