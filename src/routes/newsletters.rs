use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::authentication::{AdminToken, AuthError};
use crate::domain::newsletter::{BroadcastReport, NewsletterIssue, NewsletterIssueBody};
use crate::email_client::EmailClient;
use crate::email_templates::newsletter_email;
use crate::routes::{error_chain_fmt, error_json};
use crate::subscriber_store::{StoreError, SubscriberStore};

type NewsletterBody = web::Either<web::Json<NewsletterIssueBody>, web::Form<NewsletterIssueBody>>;

#[tracing::instrument(
    name = "Publishing a newsletter to all subscribers",
    skip(request, body, store, email_client, admin_token)
)]
pub async fn publish_newsletter(
    request: HttpRequest,
    body: NewsletterBody,
    store: web::Data<SubscriberStore>,
    email_client: web::Data<EmailClient>,
    admin_token: web::Data<AdminToken>,
) -> Result<HttpResponse, PublishNewsletterError> {
    admin_token.authorize(request.headers())?;

    let body = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };
    let issue: NewsletterIssue = body
        .try_into()
        .map_err(PublishNewsletterError::ValidationError)?;

    let recipients: Vec<_> = store
        .all()
        .await
        .map_err(PublishNewsletterError::GetSubscribersError)?
        .into_iter()
        .map(|subscriber| subscriber.email)
        .collect();

    if recipients.is_empty() {
        return Err(PublishNewsletterError::NoSubscribers);
    }

    let html = newsletter_email(&issue.subject, &issue.content);
    let report = BroadcastReport::from(
        email_client
            .broadcast_email(recipients, &issue.subject, &html)
            .await,
    );

    tracing::info!(
        total_sent = report.total_sent,
        sent = report.sent,
        failed = report.failed,
        "Newsletter broadcast finished"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "totalSent": report.total_sent,
        "sent": report.sent,
        "failed": report.failed,
        "results": report.results,
    })))
}

/// Maps payloads the `Json`/`Form` extractors cannot decode onto our own error body.
pub fn newsletter_body_rejected<E: std::fmt::Display>(err: E, _: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected newsletter payload: {}", err);
    PublishNewsletterError::ValidationError(err.to_string()).into()
}

#[derive(thiserror::Error)]
pub enum PublishNewsletterError {
    #[error("{0}")]
    ValidationError(String),
    #[error("No subscribers")]
    NoSubscribers,
    #[error("Failed to get subscribers from the store.")]
    GetSubscribersError(#[source] StoreError),
    #[error(transparent)]
    AuthError(#[from] AuthError),
}

impl std::fmt::Debug for PublishNewsletterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PublishNewsletterError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublishNewsletterError::ValidationError(_) | PublishNewsletterError::NoSubscribers => {
                StatusCode::BAD_REQUEST
            }
            PublishNewsletterError::GetSubscribersError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PublishNewsletterError::AuthError(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            PublishNewsletterError::ValidationError(_) => "Subject and content required",
            PublishNewsletterError::NoSubscribers => "No subscribers",
            PublishNewsletterError::GetSubscribersError(_) => "Failed to load subscribers",
            PublishNewsletterError::AuthError(_) => "Unauthorized",
        };

        error_json(self.status_code(), message)
    }
}
