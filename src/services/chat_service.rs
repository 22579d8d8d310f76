// src/services/chat_service.rs

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ChatRepository, UserRepository},
    models::{
        auth::{Actor, Role, User},
        chat::{ChatMessage, ChatRoom, ChatRoomKind, ChatTarget, SendMessagePayload},
    },
    realtime::{Notifier, RealtimeEvent, Room},
    services::project_service::ProjectService,
};

/// Papéis com quem cada papel pode abrir conversa privada.
pub fn dm_targets(role: Role) -> &'static [Role] {
    use Role::*;
    match role {
        SuperAdmin => &[CompanyOwner],
        CompanyOwner => &[Pm, Foreman, Worker, Engineer, Client, Subcontractor],
        Pm => &[CompanyOwner, Pm, Foreman, Worker, Engineer, Client, Subcontractor],
        Foreman => &[CompanyOwner, Pm, Foreman, Worker, Subcontractor],
        Worker => &[Pm, Foreman, Worker],
        Engineer => &[CompanyOwner, Pm, Engineer],
        Client => &[CompanyOwner, Pm],
        Subcontractor => &[Pm, Foreman],
    }
}

pub fn can_dm(from: Role, to: Role) -> bool {
    dm_targets(from).contains(&to)
}

/// Sala geral da empresa. SUPER_ADMIN não pertence a nenhuma empresa.
pub fn can_use_general_room(role: Role) -> bool {
    !matches!(role, Role::Subcontractor | Role::SuperAdmin)
}

#[derive(Clone)]
pub struct ChatService {
    repo: ChatRepository,
    user_repo: UserRepository,
    project_service: ProjectService,
    notifier: Arc<dyn Notifier>,
}

impl ChatService {
    pub fn new(
        repo: ChatRepository,
        user_repo: UserRepository,
        project_service: ProjectService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { repo, user_repo, project_service, notifier }
    }

    /// Sala geral, obras visíveis e contatos permitidos.
    pub async fn rooms(&self, actor: &Actor) -> Result<Vec<ChatRoom>, AppError> {
        let mut rooms = Vec::new();
        if can_use_general_room(actor.role) {
            rooms.push(ChatRoom {
                kind: ChatRoomKind::General,
                id: None,
                name: "General".to_string(),
                role: None,
            });
        }

        let projects = self.project_service.list(actor).await?;
        rooms.extend(projects.into_iter().map(|project| ChatRoom {
            kind: ChatRoomKind::Project,
            id: Some(project.id),
            name: project.name,
            role: None,
        }));

        let contacts = self
            .user_repo
            .colleagues_with_roles(actor.tenant_scope(), dm_targets(actor.role), actor.id)
            .await?;
        rooms.extend(contacts.into_iter().map(|user| ChatRoom {
            kind: ChatRoomKind::Private,
            id: Some(user.id),
            name: user.full_name,
            role: Some(user.role),
        }));

        Ok(rooms)
    }

    pub async fn general_history(&self, actor: &Actor) -> Result<Vec<ChatMessage>, AppError> {
        if !can_use_general_room(actor.role) {
            return Err(AppError::forbidden("Not authorized to access the general chat"));
        }
        self.repo.general_history(actor.company_id).await
    }

    pub async fn project_history(&self, actor: &Actor, project_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        self.ensure_project_room(actor, project_id).await?;
        self.repo.project_history(project_id).await
    }

    /// Histórico privado; marca como lidas as mensagens recebidas.
    pub async fn private_history(&self, actor: &Actor, other_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        self.load_contact(actor, other_id).await?;
        let messages = self.repo.private_history(actor.id, other_id).await?;
        self.repo.mark_read(actor.id, other_id).await?;
        Ok(messages)
    }

    pub async fn send(&self, actor: &Actor, payload: &SendMessagePayload) -> Result<ChatMessage, AppError> {
        let target = payload
            .target()
            .ok_or_else(|| AppError::bad_request("Project ID or Receiver ID is required"))?;

        let (company_id, rooms) = match target {
            ChatTarget::General => {
                if !can_use_general_room(actor.role) {
                    return Err(AppError::forbidden("Not authorized to access the general chat"));
                }
                (actor.company_id, vec![Room::Company(actor.company_id)])
            }
            ChatTarget::Project(project_id) => {
                let company_id = self.ensure_project_room(actor, project_id).await?;
                (company_id, vec![Room::Project(project_id)])
            }
            ChatTarget::Private(receiver_id) => {
                let receiver = self.load_contact(actor, receiver_id).await?;
                // Emite também ao remetente para sincronizar outros dispositivos
                (receiver.company_id, vec![Room::User(receiver.id), Room::User(actor.id)])
            }
        };

        let message = self
            .repo
            .create(company_id, actor.id, target, &payload.message)
            .await?;

        let frame = json!(message);
        for room in rooms {
            self.notifier.emit(room, RealtimeEvent::NewMessage, frame.clone());
        }
        Ok(message)
    }

    async fn ensure_project_room(&self, actor: &Actor, project_id: Uuid) -> Result<Uuid, AppError> {
        let project = self.project_service.load_visible(actor, project_id).await?;
        Ok(project.company_id)
    }

    async fn load_contact(&self, actor: &Actor, other_id: Uuid) -> Result<User, AppError> {
        let other = self
            .user_repo
            .find_by_id(other_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        actor.ensure_tenant(other.company_id, "user")?;
        if !can_dm(actor.role, other.role) {
            return Err(AppError::forbidden(format!(
                "{} cannot message {}",
                actor.role, other.role
            )));
        }
        Ok(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_talks_to_crew_only() {
        assert!(can_dm(Role::Worker, Role::Foreman));
        assert!(can_dm(Role::Worker, Role::Pm));
        assert!(can_dm(Role::Worker, Role::Worker));
        assert!(!can_dm(Role::Worker, Role::CompanyOwner));
        assert!(!can_dm(Role::Worker, Role::Client));
    }

    #[test]
    fn client_reaches_owner_and_pm() {
        assert_eq!(dm_targets(Role::Client), &[Role::CompanyOwner, Role::Pm]);
        assert!(!can_dm(Role::Client, Role::Foreman));
    }

    #[test]
    fn super_admin_only_reaches_owners() {
        assert!(can_dm(Role::SuperAdmin, Role::CompanyOwner));
        assert!(!can_dm(Role::SuperAdmin, Role::Pm));
        for role in Role::ALL {
            assert!(!can_dm(role, Role::SuperAdmin), "{role}");
        }
    }

    #[test]
    fn pm_reaches_everyone_in_the_company() {
        for role in Role::ALL.into_iter().filter(|r| *r != Role::SuperAdmin) {
            assert!(can_dm(Role::Pm, role), "{role}");
        }
    }

    #[test]
    fn general_room_excludes_subcontractors_and_super_admin() {
        assert!(!can_use_general_room(Role::Subcontractor));
        assert!(can_use_general_room(Role::Client));
        assert!(!can_use_general_room(Role::SuperAdmin));
        assert_eq!(dm_targets(Role::Subcontractor), &[Role::Pm, Role::Foreman]);
    }
}
