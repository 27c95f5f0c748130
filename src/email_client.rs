use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::newsletter::DeliveryOutcome;
use crate::domain::subscriber_email::SubscriberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: SubscriberEmail,
    api_key: Secret<String>,
    max_concurrent_sends: usize,
}

#[derive(serde::Serialize)]
pub struct SendEmailBody {
    personalizations: Vec<SengridPersonalization>,
    from: SengridEmail,
    subject: String,
    content: Vec<SengridContent>,
}

#[derive(serde::Serialize)]
struct SengridEmail {
    email: String,
}

#[derive(serde::Serialize)]
struct SengridPersonalization {
    to: Vec<SengridEmail>,
}

#[derive(serde::Serialize)]
struct SengridContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: SubscriberEmail,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        // rustls verifies the mail provider's certificate, invalid certificates are never accepted
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .https_only(base_url.starts_with("https://"))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            api_key,
            max_concurrent_sends: 1,
        })
    }

    /// Caps how many emails a broadcast keeps in flight. Zero is treated as one.
    pub fn with_max_concurrent_sends(mut self, max_concurrent_sends: usize) -> EmailClient {
        self.max_concurrent_sends = max_concurrent_sends.max(1);
        self
    }

    /// `recipient` is passed through untouched, stored addresses are already validated.
    #[tracing::instrument(name = "Send an email", skip(self, subject, html_content))]
    pub async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/mail/send", self.base_url);
        let body = SendEmailBody {
            from: SengridEmail {
                email: String::from(self.sender.as_ref()),
            },
            personalizations: vec![SengridPersonalization {
                to: vec![SengridEmail {
                    email: String::from(recipient),
                }],
            }],
            subject: String::from(subject),
            content: vec![SengridContent {
                content_type: String::from("text/html"),
                value: String::from(html_content),
            }],
        };

        self.http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }

    /// Sends the same email to every recipient and reports the outcome of each delivery,
    /// in recipient order. Failed deliveries are logged and never retried.
    #[tracing::instrument(
        name = "Broadcast an email",
        skip(self, recipients, html_content),
        fields(recipients = recipients.len(), max_concurrent_sends = self.max_concurrent_sends)
    )]
    pub async fn broadcast_email(
        &self,
        recipients: Vec<SubscriberEmail>,
        subject: &str,
        html_content: &str,
    ) -> Vec<DeliveryOutcome> {
        stream::iter(recipients)
            .map(|recipient| async move {
                let success = match self.send_email(recipient.as_ref(), subject, html_content).await {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::error!("Failed to send an email to {}: {:?}", recipient, err);
                        false
                    }
                };

                DeliveryOutcome {
                    email: recipient,
                    success,
                }
            })
            .buffered(self.max_concurrent_sends)
            .collect()
            .await
    }
}
