use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    routing::{delete, get, post},
};
use chrono::Utc;

use folio_content::{Message, NewMessage};
use folio_core::MessageId;

use crate::app::dto::Envelope;
use crate::app::errors::{ApiError, ApiJson, ApiResult};
use crate::app::routes::{parse_id, protected};
use crate::app::services::AppServices;
use crate::middleware::AuthState;

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route("/send", post(send_message))
        .route("/delete/:id", protected(delete(delete_message), &auth))
        .route("/getall", protected(get(list_messages), &auth))
}

/// Public contact form; the message is addressed to the portfolio owner.
pub async fn send_message(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewMessage>,
) -> ApiResult<Envelope<Message>> {
    let draft = body.validate()?;
    let recipient = services.portfolio_owner().await?.map(|owner| owner.id);
    let message = Message::create(draft, recipient, Utc::now());
    services.messages.insert(&message).await?;

    tracing::info!(message_id = %message.id, "message received");
    Ok(Envelope::data(message).with_message("Message Sent!").created())
}

pub async fn delete_message(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope> {
    let id: MessageId = parse_id(&id)?;
    if !services.messages.delete(id).await? {
        return Err(ApiError::not_found("Message not found!"));
    }
    Ok(Envelope::message("Message Deleted!"))
}

pub async fn list_messages(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Envelope<Vec<Message>>> {
    Ok(Envelope::data(services.messages.list().await?))
}
