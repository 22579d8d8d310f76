// src/db/chat_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::chat::{ChatMessage, ChatTarget},
};

// Mensagem + nome e papel do remetente
const SELECT_MESSAGE: &str = r#"
    SELECT c.id, c.company_id, c.project_id, c.receiver_id, c.sender_id,
           u.full_name AS sender_name, u.role AS sender_role,
           c.message, c.is_read, c.created_at
    FROM chats c
    JOIN users u ON u.id = c.sender_id
"#;

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sala geral: mensagens sem obra e sem destinatário.
    pub async fn general_history(&self, company_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        let sql = format!(
            "{SELECT_MESSAGE} WHERE c.company_id = $1 AND c.project_id IS NULL AND c.receiver_id IS NULL ORDER BY c.created_at"
        );
        let messages = sqlx::query_as::<_, ChatMessage>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    pub async fn project_history(&self, project_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        let sql = format!("{SELECT_MESSAGE} WHERE c.project_id = $1 ORDER BY c.created_at");
        let messages = sqlx::query_as::<_, ChatMessage>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    /// Conversa privada entre dois usuários, nos dois sentidos.
    pub async fn private_history(&self, me: Uuid, other: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        let sql = format!(
            r#"{SELECT_MESSAGE}
            WHERE c.project_id IS NULL
              AND ((c.sender_id = $1 AND c.receiver_id = $2) OR (c.sender_id = $2 AND c.receiver_id = $1))
            ORDER BY c.created_at"#
        );
        let messages = sqlx::query_as::<_, ChatMessage>(&sql)
            .bind(me)
            .bind(other)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    /// Marca como lidas as mensagens que `other` mandou para `me`.
    pub async fn mark_read(&self, me: Uuid, other: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE chats SET is_read = TRUE WHERE receiver_id = $1 AND sender_id = $2 AND NOT is_read",
        )
        .bind(me)
        .bind(other)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        sender_id: Uuid,
        target: ChatTarget,
        message: &str,
    ) -> Result<ChatMessage, AppError> {
        let (project_id, receiver_id) = match target {
            ChatTarget::General => (None, None),
            ChatTarget::Project(id) => (Some(id), None),
            ChatTarget::Private(id) => (None, Some(id)),
        };

        let mut tx = self.pool.begin().await?;
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO chats (company_id, project_id, receiver_id, sender_id, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(project_id)
        .bind(receiver_id)
        .bind(sender_id)
        .bind(message)
        .fetch_one(&mut *tx)
        .await?;

        let sql = format!("{SELECT_MESSAGE} WHERE c.id = $1");
        let created = sqlx::query_as::<_, ChatMessage>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(created)
    }
}
