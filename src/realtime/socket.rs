// src/realtime/socket.rs

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::{
    common::{error::AppError, geo::GeoPoint},
    config::AppState,
    models::auth::Actor,
    realtime::hub::Presence,
};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Mensagens que o cliente pode mandar pelo socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    JoinProject { project_id: Uuid },
    UpdateLocation { latitude: f64, longitude: f64 },
}

// GET /ws?token=...
pub async fn ws_handler(
    State(app_state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let token = query
        .token
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))?;
    let user = app_state.auth_service.validate_token(&token).await?;
    let actor = user.actor();

    Ok(ws.on_upgrade(move |socket| serve_socket(socket, app_state, actor)))
}

async fn serve_socket(mut socket: WebSocket, app_state: AppState, actor: Actor) {
    let hub = app_state.hub.clone();
    let mut rx = hub.subscribe();
    let (conn_id, mut presence) = hub.connect(&actor).await;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "erro no socket");
                        break;
                    }
                };
                match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(message) => handle_client_message(&app_state, &actor, conn_id, &mut presence, message).await,
                    Err(e) => tracing::debug!(error = %e, "mensagem de socket ignorada"),
                }
            }
            event = rx.recv() => {
                match event {
                    Ok(envelope) if envelope.is_for(conn_id, &presence) => {
                        if socket.send(Message::Text(envelope.frame().into())).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, user_id = %actor.id, "cliente lento perdeu eventos");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    hub.disconnect(conn_id).await;
}

async fn handle_client_message(
    app_state: &AppState,
    actor: &Actor,
    conn_id: Uuid,
    presence: &mut Presence,
    message: ClientMessage,
) {
    match message {
        ClientMessage::JoinProject { project_id } => {
            let allowed = match app_state.resolver.project_access(actor).await {
                Ok(access) => app_state
                    .resolver
                    .ensure_project_visible(actor, &access, project_id)
                    .await
                    .is_ok(),
                Err(e) => {
                    tracing::warn!(error = %e, "falha ao resolver obras visíveis");
                    false
                }
            };
            if !allowed {
                tracing::debug!(user_id = %actor.id, %project_id, "entrada na sala da obra negada");
                return;
            }
            presence.projects.insert(project_id);
            app_state.hub.join_project(conn_id, project_id).await;
        }
        ClientMessage::UpdateLocation { latitude, longitude } => {
            let location = GeoPoint { latitude, longitude };
            presence.location = Some(location);
            app_state.hub.update_location(conn_id, location).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_messages() {
        let project_id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"join_project","projectId":"{project_id}"}}"#);
        match serde_json::from_str::<ClientMessage>(&raw).unwrap() {
            ClientMessage::JoinProject { project_id: parsed } => assert_eq!(parsed, project_id),
            other => panic!("unexpected {other:?}"),
        }

        let raw = r#"{"type":"update_location","latitude":-23.55,"longitude":-46.63}"#;
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(raw).unwrap(),
            ClientMessage::UpdateLocation { .. }
        ));
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"shutdown"}"#).is_err());
    }
}
