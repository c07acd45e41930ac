use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventide_core::calendar::ViewError;
use eventide_core::storage::{repository_error_to_status_code, DateRangeError, RepositoryError};

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else if self.0.is::<ViewError>() || self.0.is::<DateRangeError>() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Application error");
        } else {
            tracing::warn!(status = %status_code, error = %self.0, "Request rejected");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = AppError::from(RepositoryError::NotFound {
            entity_type: "Event",
            id: "abc".to_string(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let view = AppError::from(ViewError::InvalidDate("2018-02-30".to_string()));
        assert_eq!(view.status_code(), StatusCode::BAD_REQUEST);

        let range = AppError::from(DateRangeError::InvalidRange);
        assert_eq!(range.status_code(), StatusCode::BAD_REQUEST);

        let other = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(other.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
