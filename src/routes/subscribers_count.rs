use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::authentication::{AdminToken, AuthError};
use crate::routes::{error_chain_fmt, error_json};
use crate::subscriber_store::{StoreError, SubscriberStore};

#[tracing::instrument(name = "Counting subscribers", skip(request, store, admin_token))]
pub async fn subscribers_count(
    request: HttpRequest,
    store: web::Data<SubscriberStore>,
    admin_token: web::Data<AdminToken>,
) -> Result<HttpResponse, SubscribersCountError> {
    admin_token.authorize(request.headers())?;

    let count = store.count().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

#[derive(thiserror::Error)]
pub enum SubscribersCountError {
    #[error("Failed to count subscribers.")]
    StoreError(#[from] StoreError),
    #[error(transparent)]
    AuthError(#[from] AuthError),
}

impl std::fmt::Debug for SubscribersCountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribersCountError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribersCountError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubscribersCountError::AuthError(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            SubscribersCountError::StoreError(_) => "Failed to count subscribers",
            SubscribersCountError::AuthError(_) => "Unauthorized",
        };

        error_json(self.status_code(), message)
    }
}
