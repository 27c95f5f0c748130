mod health_check;
mod newsletters;
mod subscribers_count;
mod subscriptions;

pub use health_check::health_check;
pub use newsletters::{newsletter_body_rejected, publish_newsletter, PublishNewsletterError};
pub use subscribers_count::{subscribers_count, SubscribersCountError};
pub use subscriptions::{handle_create_subscription, subscribe_body_rejected, SubscribeError};

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

/// JSON body returned by every failing endpoint.
#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn error_json(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody { error: message })
}

/// Writes an error followed by each of its causes, one per line.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
