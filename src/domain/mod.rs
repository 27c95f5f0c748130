pub mod new_subscriber;
pub mod newsletter;
pub mod subscriber;
pub mod subscriber_email;
