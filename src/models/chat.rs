// src/models/chat.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub sender_role: Role,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoomKind {
    General,
    Project,
    Private,
}

// Sala sintética montada para a lista de conversas
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub kind: ChatRoomKind,
    /// Id da obra ou do usuário; ausente na sala geral.
    pub id: Option<Uuid>,
    pub name: String,
    pub role: Option<Role>,
}

/// Destino de uma mensagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTarget {
    General,
    Project(Uuid),
    Private(Uuid),
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub project_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    /// Envia para a sala geral da empresa.
    #[serde(default)]
    pub general: bool,
    #[validate(length(min = 1, max = 4000, message = "Message must not be empty."))]
    pub message: String,
}

impl SendMessagePayload {
    pub fn target(&self) -> Option<ChatTarget> {
        match (self.project_id, self.receiver_id) {
            (Some(project_id), _) => Some(ChatTarget::Project(project_id)),
            (None, Some(receiver_id)) => Some(ChatTarget::Private(receiver_id)),
            (None, None) if self.general => Some(ChatTarget::General),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(project_id: Option<Uuid>, receiver_id: Option<Uuid>, general: bool) -> SendMessagePayload {
        SendMessagePayload { project_id, receiver_id, general, message: "oi".into() }
    }

    #[test]
    fn project_wins_over_receiver() {
        let p = Uuid::new_v4();
        let r = Uuid::new_v4();
        assert_eq!(payload(Some(p), Some(r), false).target(), Some(ChatTarget::Project(p)));
        assert_eq!(payload(None, Some(r), true).target(), Some(ChatTarget::Private(r)));
    }

    #[test]
    fn general_must_be_explicit() {
        assert_eq!(payload(None, None, true).target(), Some(ChatTarget::General));
        assert_eq!(payload(None, None, false).target(), None);
    }
}
