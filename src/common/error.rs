// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// Erro único da aplicação. Todo erro vira `{ message, error }` na resposta,
// sem resultados parciais.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação feita pelos serviços (ex: mês fora de 1..=12)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Tempo limite da consulta excedido")]
    DeadlineExceeded,

    #[error("Consulta cancelada")]
    Cancelled,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, error): (&str, Value) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ("Um ou mais parâmetros são inválidos.", json!(details))
            }
            AppError::InvalidInput(msg) => ("Um ou mais parâmetros são inválidos.", json!(msg)),
            AppError::InvalidToken => (
                "Token de autenticação inválido ou ausente.",
                json!(self.to_string()),
            ),
            AppError::DeadlineExceeded => {
                tracing::warn!("Consulta interrompida: {}", self);
                ("A consulta não terminou a tempo.", json!(self.to_string()))
            }
            AppError::Cancelled => (
                "O servidor está encerrando, tente novamente.",
                json!(self.to_string()),
            ),
            // Banco e erros internos viram 500 com a mensagem original em `error`.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ("Ocorreu um erro inesperado.", json!(e.to_string()))
            }
        };

        let body = Json(json!({ "message": message, "error": error }));
        (status, body).into_response()
    }
}
