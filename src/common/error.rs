use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflito de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(resource.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::InvalidCredentials | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) | AppError::Conflict(_) | AppError::EmailAlreadyExists => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::BadRequest(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message) => message,
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::UniqueConstraintViolation(message) | AppError::Conflict(message) => message,
            AppError::EmailAlreadyExists => "User with this email already exists".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::InvalidToken => "Not authorized, token failed".to_string(),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O detalhe fica no log, nunca na resposta.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "An unexpected error occurred.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Traduz violações de unicidade do Postgres para um erro de domínio.
pub fn map_unique_violation(e: sqlx::Error, on_violation: impl FnOnce(&str) -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return on_violation(db_err.constraint().unwrap_or_default());
        }
    }
    e.into()
}

/// Registro ainda referenciado por outra tabela.
pub fn map_foreign_key_violation(e: sqlx::Error, on_violation: impl FnOnce(&str) -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return on_violation(db_err.constraint().unwrap_or_default());
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    #[derive(Debug)]
    struct PgFailure {
        kind: ErrorKind,
        constraint: &'static str,
    }

    impl fmt::Display for PgFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "violates constraint {}", self.constraint)
        }
    }

    impl StdError for PgFailure {}

    impl DatabaseError for PgFailure {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn pg_error(kind: ErrorKind, constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(PgFailure { kind, constraint }))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn taxonomy_maps_to_http_status() {
        assert_eq!(AppError::not_found("Project").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::forbidden("nope").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::bad_request("User already clocked in").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn body_carries_the_message() {
        let response = AppError::bad_request("User already clocked in").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "User already clocked in");

        let response = AppError::not_found("Project").into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "Project not found");
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let response = AppError::InternalServerError(anyhow::anyhow!("password=hunter2")).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "An unexpected error occurred.");
    }

    #[test]
    fn referenced_rows_become_conflicts() {
        let err = map_foreign_key_violation(pg_error(ErrorKind::ForeignKeyViolation, "projects_created_by_fkey"), |c| {
            assert_eq!(c, "projects_created_by_fkey");
            AppError::Conflict("User still owns records".into())
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "User still owns records");

        // Outros erros de banco continuam sendo 500
        let err = map_foreign_key_violation(pg_error(ErrorKind::UniqueViolation, "users_email_key"), |_| {
            AppError::Conflict("unexpected".into())
        });
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unique_violations_map_to_domain_errors() {
        let err = map_unique_violation(pg_error(ErrorKind::UniqueViolation, "users_email_key"), |_| {
            AppError::EmailAlreadyExists
        });
        assert!(matches!(err, AppError::EmailAlreadyExists));
    }
}
