use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

/// A newsletter ready to be broadcast: both subject and content are non-blank.
#[derive(Debug)]
pub struct NewsletterIssue {
    pub subject: String,
    pub content: String,
}

#[derive(Deserialize, Debug)]
pub struct NewsletterIssueBody {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl TryFrom<NewsletterIssueBody> for NewsletterIssue {
    type Error = String;

    fn try_from(body: NewsletterIssueBody) -> Result<Self, Self::Error> {
        match (body.subject, body.content) {
            (Some(subject), Some(content))
                if !subject.trim().is_empty() && !content.trim().is_empty() =>
            {
                Ok(NewsletterIssue { subject, content })
            }
            _ => Err(String::from("Subject and content required")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeliveryOutcome {
    pub email: SubscriberEmail,
    pub success: bool,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReport {
    pub total_sent: usize,
    pub sent: usize,
    pub failed: usize,
    pub results: Vec<DeliveryOutcome>,
}

impl From<Vec<DeliveryOutcome>> for BroadcastReport {
    fn from(results: Vec<DeliveryOutcome>) -> Self {
        let sent = results.iter().filter(|outcome| outcome.success).count();

        BroadcastReport {
            total_sent: results.len(),
            sent,
            failed: results.len() - sent,
            results,
        }
    }
}
