// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::orders::OrderStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Conflitos do upsert de preço diário NÃO aparecem aqui: são resolvidos
// automaticamente no banco (last-write-wins).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Ponto de entrega não encontrado")]
    PointNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Preço não encontrado")]
    PriceNotFound,

    #[error("Ação não permitida: {0}")]
    Forbidden(String),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    // Nenhuma linha de preço dentro da janela de 7 dias: "preço não definido",
    // e não "último preço conhecido".
    #[error("Nenhum preço corrente para esta categoria neste ponto")]
    StalePrice,

    // A atualização condicional não afetou nenhuma linha: outra transição
    // venceu a corrida.
    #[error("O pedido mudou de status durante a operação")]
    TransitionConflict,

    #[error("Este pedido já possui registro de conclusão")]
    CompletionAlreadyRecorded,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
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
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidTransition { from, to } => {
                // Estados terminais ganham mensagem própria.
                let message = if from.is_terminal() {
                    format!("O pedido está em um estado terminal ({}) e não pode mais mudar.", from)
                } else {
                    format!("Transição de status inválida: {} -> {}.", from, to)
                };
                let body = Json(json!({ "error": message }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            AppError::Forbidden(reason) => {
                let body = Json(json!({ "error": reason }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::PointNotFound => (StatusCode::NOT_FOUND, "Ponto de entrega não encontrado."),
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "Pedido não encontrado."),
            AppError::PriceNotFound => (StatusCode::NOT_FOUND, "Preço não encontrado."),
            AppError::StalePrice => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Nenhum preço corrente (últimos 7 dias) para esta categoria neste ponto.",
            ),
            AppError::TransitionConflict => (
                StatusCode::CONFLICT,
                "O pedido mudou de status durante a operação. Recarregue e tente novamente.",
            ),
            AppError::CompletionAlreadyRecorded => (
                StatusCode::CONFLICT,
                "Este pedido já possui um registro de conclusão.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos dá.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_stable_status_codes() {
        let cases = [
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AppError::OrderNotFound, StatusCode::NOT_FOUND),
            (AppError::PointNotFound, StatusCode::NOT_FOUND),
            (AppError::EmailAlreadyExists, StatusCode::CONFLICT),
            (AppError::TransitionConflict, StatusCode::CONFLICT),
            (
                AppError::CompletionAlreadyRecorded,
                StatusCode::CONFLICT,
            ),
            (AppError::StalePrice, StatusCode::UNPROCESSABLE_ENTITY),
            (
                AppError::Forbidden("sem permissão".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::InvalidTransition {
                    from: OrderStatus::Pending,
                    to: OrderStatus::Completed,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn terminal_states_get_their_own_message() {
        let response = AppError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Assigned,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("terminal"));

        let response = AppError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Completed,
        }
        .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("pending -> completed"));
    }

    #[test]
    fn validation_errors_return_bad_request() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("price", validator::ValidationError::new("range"));
        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
