use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::{
    domain::new_subscriber::{NewSubscriber, NewSubscriberBody},
    email_client::EmailClient,
    email_templates::{confirmation_email, CONFIRMATION_SUBJECT},
    routes::{error_chain_fmt, error_json},
    subscriber_store::{InsertError, StoreError, SubscriberStore},
};

type SubscribeBody = web::Either<web::Json<NewSubscriberBody>, web::Form<NewSubscriberBody>>;

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, store, email_client),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn handle_create_subscription(
    body: SubscribeBody,
    store: web::Data<SubscriberStore>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, SubscribeError> {
    let body = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };
    tracing::Span::current().record("subscriber_email", &tracing::field::debug(&body.email));

    let new_subscriber: NewSubscriber = body.try_into().map_err(SubscribeError::ValidationError)?;
    let recipient = new_subscriber.submitted_email.clone();

    store.insert(new_subscriber).await?;

    // The subscription stands even when the welcome email cannot be delivered
    if let Err(err) = email_client
        .send_email(&recipient, CONFIRMATION_SUBJECT, &confirmation_email())
        .await
    {
        tracing::error!(
            "Failed to send a confirmation email to {}: {:?}",
            recipient,
            err
        );
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Subscribed successfully",
    })))
}

/// Maps payloads the `Json`/`Form` extractors cannot decode onto our own error body.
pub fn subscribe_body_rejected<E: std::fmt::Display>(err: E, _: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected subscription payload: {}", err);
    SubscribeError::ValidationError(err.to_string()).into()
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Already subscribed")]
    AlreadySubscribed,
    #[error("Failed to store the new subscriber.")]
    StoreError(#[source] StoreError),
}

impl From<InsertError> for SubscribeError {
    fn from(err: InsertError) -> Self {
        match err {
            InsertError::AlreadySubscribed(_) => SubscribeError::AlreadySubscribed,
            InsertError::Store(err) => SubscribeError::StoreError(err),
        }
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::AlreadySubscribed => StatusCode::CONFLICT,
            SubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            SubscribeError::ValidationError(_) => "Invalid email address",
            SubscribeError::AlreadySubscribed => "Already subscribed",
            SubscribeError::StoreError(_) => "Failed to save subscription",
        };

        error_json(self.status_code(), message)
    }
}
