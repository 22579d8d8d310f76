// src/realtime/hub.rs

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::{
    common::geo::GeoPoint,
    models::auth::{Actor, Role},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    Project(Uuid),
    User(Uuid),
    Company(Uuid),
    Everyone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RealtimeEvent {
    NewMessage,
    OnlineUsersCount,
    UserStatusChange,
    LocationUpdate,
    PermissionsUpdated,
}

/// Evento publicado no canal de broadcast.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub room: Room,
    pub event: RealtimeEvent,
    pub payload: Value,
    /// Conexão de origem, que não recebe o próprio eco.
    pub exclude: Option<Uuid>,
}

impl Envelope {
    pub fn is_for(&self, conn_id: Uuid, presence: &Presence) -> bool {
        if self.exclude == Some(conn_id) {
            return false;
        }
        match self.room {
            Room::Everyone => true,
            Room::Company(company_id) => presence.company_id == company_id,
            Room::User(user_id) => presence.user_id == user_id,
            Room::Project(project_id) => presence.projects.contains(&project_id),
        }
    }

    pub fn frame(&self) -> String {
        json!({ "event": self.event, "payload": self.payload }).to_string()
    }
}

/// Estado de uma conexão.
#[derive(Debug, Clone)]
pub struct Presence {
    pub user_id: Uuid,
    pub role: Role,
    pub company_id: Uuid,
    pub location: Option<GeoPoint>,
    pub projects: HashSet<Uuid>,
}

impl Presence {
    fn new(actor: &Actor) -> Self {
        Self {
            user_id: actor.id,
            role: actor.role,
            company_id: actor.company_id,
            location: None,
            projects: HashSet::new(),
        }
    }
}

/// Destino dos eventos gerados pelos serviços.
pub trait Notifier: Send + Sync {
    fn emit(&self, room: Room, event: RealtimeEvent, payload: Value);
}

#[derive(Clone)]
pub struct RealtimeHub {
    sender: broadcast::Sender<Envelope>,
    clients: Arc<RwLock<HashMap<Uuid, Presence>>>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    fn publish(&self, envelope: Envelope) {
        // Sem ninguém conectado o envio falha, e tudo bem
        let _ = self.sender.send(envelope);
    }

    /// Registra a conexão e avisa os demais.
    pub async fn connect(&self, actor: &Actor) -> (Uuid, Presence) {
        let conn_id = Uuid::new_v4();
        let presence = Presence::new(actor);
        let online = {
            let mut clients = self.clients.write().await;
            clients.insert(conn_id, presence.clone());
            clients.len()
        };

        tracing::info!(user_id = %actor.id, role = %actor.role, online, "cliente conectado ao canal em tempo real");
        self.publish(Envelope {
            room: Room::Everyone,
            event: RealtimeEvent::OnlineUsersCount,
            payload: json!(online),
            exclude: None,
        });
        self.publish(Envelope {
            room: Room::Company(actor.company_id),
            event: RealtimeEvent::UserStatusChange,
            payload: json!({ "userId": actor.id, "status": "online" }),
            exclude: Some(conn_id),
        });
        (conn_id, presence)
    }

    pub async fn disconnect(&self, conn_id: Uuid) {
        let (removed, online) = {
            let mut clients = self.clients.write().await;
            let removed = clients.remove(&conn_id);
            (removed, clients.len())
        };
        let Some(presence) = removed else {
            return;
        };

        tracing::info!(user_id = %presence.user_id, online, "cliente desconectado do canal em tempo real");
        self.publish(Envelope {
            room: Room::Everyone,
            event: RealtimeEvent::OnlineUsersCount,
            payload: json!(online),
            exclude: None,
        });
        self.publish(Envelope {
            room: Room::Company(presence.company_id),
            event: RealtimeEvent::UserStatusChange,
            payload: json!({ "userId": presence.user_id, "status": "offline" }),
            exclude: None,
        });
    }

    pub async fn join_project(&self, conn_id: Uuid, project_id: Uuid) {
        if let Some(presence) = self.clients.write().await.get_mut(&conn_id) {
            presence.projects.insert(project_id);
        }
    }

    /// Guarda a última posição e repassa só para o mesmo tenant.
    pub async fn update_location(&self, conn_id: Uuid, location: GeoPoint) {
        let presence = {
            let mut clients = self.clients.write().await;
            match clients.get_mut(&conn_id) {
                Some(presence) => {
                    presence.location = Some(location);
                    presence.clone()
                }
                None => return,
            }
        };
        self.publish(Envelope {
            room: Room::Company(presence.company_id),
            event: RealtimeEvent::LocationUpdate,
            payload: json!({
                "userId": presence.user_id,
                "role": presence.role,
                "latitude": location.latitude,
                "longitude": location.longitude,
            }),
            exclude: Some(conn_id),
        });
    }

    pub async fn online_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

impl Notifier for RealtimeHub {
    fn emit(&self, room: Room, event: RealtimeEvent, payload: Value) {
        self.publish(Envelope { room, event, payload, exclude: None });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, company_id: Uuid) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id }
    }

    #[tokio::test]
    async fn connect_and_disconnect_track_online_count() {
        let hub = RealtimeHub::new(16);
        let mut rx = hub.subscribe();
        let (conn, _) = hub.connect(&actor(Role::Worker, Uuid::new_v4())).await;
        assert_eq!(hub.online_count().await, 1);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event, RealtimeEvent::OnlineUsersCount);
        assert_eq!(first.payload, json!(1));

        hub.disconnect(conn).await;
        assert_eq!(hub.online_count().await, 0);
        // Desconectar de novo não publica nada
        hub.disconnect(conn).await;
    }

    #[tokio::test]
    async fn location_updates_stay_inside_the_tenant() {
        let hub = RealtimeHub::new(16);
        let tenant = Uuid::new_v4();
        let (sender_conn, sender) = hub.connect(&actor(Role::Foreman, tenant)).await;
        let (peer_conn, peer) = hub.connect(&actor(Role::Pm, tenant)).await;
        let (stranger_conn, stranger) = hub.connect(&actor(Role::Pm, Uuid::new_v4())).await;

        let mut rx = hub.subscribe();
        hub.update_location(sender_conn, GeoPoint { latitude: 1.0, longitude: 2.0 }).await;
        let envelope = rx.recv().await.unwrap();

        assert_eq!(envelope.event, RealtimeEvent::LocationUpdate);
        assert!(envelope.is_for(peer_conn, &peer));
        assert!(!envelope.is_for(sender_conn, &sender));
        assert!(!envelope.is_for(stranger_conn, &stranger));
    }

    #[tokio::test]
    async fn project_rooms_need_a_join() {
        let hub = RealtimeHub::new(16);
        let (conn, mut presence) = hub.connect(&actor(Role::Worker, Uuid::new_v4())).await;
        let project_id = Uuid::new_v4();
        let envelope = Envelope {
            room: Room::Project(project_id),
            event: RealtimeEvent::NewMessage,
            payload: json!({}),
            exclude: None,
        };
        assert!(!envelope.is_for(conn, &presence));
        presence.projects.insert(project_id);
        assert!(envelope.is_for(conn, &presence));
    }

    #[test]
    fn emit_without_listeners_is_silent() {
        let hub = RealtimeHub::new(4);
        hub.emit(Room::Everyone, RealtimeEvent::PermissionsUpdated, json!({ "role": "PM" }));
    }

    #[test]
    fn frames_carry_event_name_and_payload() {
        let envelope = Envelope {
            room: Room::Everyone,
            event: RealtimeEvent::PermissionsUpdated,
            payload: json!({ "role": "PM" }),
            exclude: None,
        };
        let frame: Value = serde_json::from_str(&envelope.frame()).unwrap();
        assert_eq!(frame["event"], "permissions_updated");
        assert_eq!(frame["payload"]["role"], "PM");
    }
}
