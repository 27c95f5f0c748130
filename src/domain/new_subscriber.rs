use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    // The address exactly as typed, used as the confirmation recipient
    pub submitted_email: String,
}

/// Payload of a subscription request, either JSON or an url-encoded form.
#[derive(Deserialize, Debug)]
pub struct NewSubscriberBody {
    // Missing or null fields go through our own validation
    #[serde(default)]
    pub email: Option<String>,
}

impl TryFrom<NewSubscriberBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: NewSubscriberBody) -> Result<Self, Self::Error> {
        let submitted_email = body.email.unwrap_or_default();
        let email = SubscriberEmail::parse(submitted_email.clone())?;

        Ok(NewSubscriber {
            email,
            submitted_email,
        })
    }
}
