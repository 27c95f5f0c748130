use chrono::{DateTime, Utc};

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber_email::SubscriberEmail;

/// A stored subscription. Records are created once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn subscribe_now(new_subscriber: NewSubscriber) -> Subscriber {
        Subscriber {
            email: new_subscriber.email,
            subscribed_at: Utc::now(),
        }
    }
}
