//! HTTP and WebSocket surface of the leads module.
//!
//! Both endpoints require authentication: the group never declares
//! itself public, so the host's default policy applies.

use std::sync::Arc;

use appgate_auth::{AuthorizedUser, Identity};
use appgate_kit::RouteGroup;
use axum::Json;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::{get, post};
use http::{Method, StatusCode};

use crate::domain::{LeadSubmissionRequest, LeadSubmissionResponse};

pub fn route_group() -> anyhow::Result<Arc<RouteGroup>> {
    Ok(Arc::new(
        RouteGroup::builder()
            // The handler consumes the caller identity, so the
            // requirement is declared on the endpoint itself and holds
            // even if the host disables group-level auth.
            .authenticated_route(
                Method::POST,
                "/leads/submit",
                "submit_lead",
                post(submit_lead),
            )
            .websocket("/leads/stream", "lead_stream", get(lead_stream))
            .build(),
    ))
}

/// Record a lead and return the ROI calculation it was based on.
async fn submit_lead(
    AuthorizedUser(identity): AuthorizedUser,
    Json(payload): Json<LeadSubmissionRequest>,
) -> Result<Json<LeadSubmissionResponse>, (StatusCode, Json<serde_json::Value>)> {
    payload.contact.validate().map_err(reject)?;
    payload.inputs.validate().map_err(reject)?;

    let roi = roi::calculate(&payload.inputs);

    // The lead lands in the log stream; downstream delivery picks it up
    // from there.
    tracing::info!(
        submitted_by = %identity.subject,
        name = %payload.contact.name,
        email = %payload.contact.email,
        company = %payload.contact.company,
        phone = %payload.contact.phone,
        notes = payload.contact.notes.as_deref().unwrap_or(""),
        net_annual_savings = roi.metrics.net_annual_savings,
        "new lead submitted"
    );

    Ok(Json(LeadSubmissionResponse {
        roi,
        message: "Lead received successfully.".to_owned(),
    }))
}

fn reject(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "error": message })),
    )
}

/// Live lead feed. The middleware has already authenticated the upgrade
/// request; an unauthenticated caller never reaches this handler.
async fn lead_stream(ws: WebSocketUpgrade, AuthorizedUser(identity): AuthorizedUser) -> Response {
    ws.on_upgrade(move |socket| stream_session(socket, identity))
}

async fn stream_session(mut socket: WebSocket, identity: Identity) {
    let greeting = serde_json::json!({
        "event": "connected",
        "subject": identity.subject,
    });
    if socket
        .send(Message::Text(greeting.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    let mut received: u64 = 0;
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(_) => {
                received += 1;
                let ack = serde_json::json!({ "event": "ack", "received": received });
                if socket
                    .send(Message::Text(ack.to_string().into()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}
