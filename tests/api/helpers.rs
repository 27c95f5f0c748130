use once_cell::sync::Lazy;
use reqwest::Response;
use secrecy::Secret;
use std::path::PathBuf;
use uuid::Uuid;
use wiremock::MockServer;

use delta_newsletter::{
    config::get_configuration,
    domain::subscriber::Subscriber,
    startup::Application,
    subscriber_store::SubscriberStore,
    telemetry::{get_subscriber, init_subscriber},
};

// Ensure that the `tracing` stack is only initialised once. Set TEST_LOG to see the logs.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = String::from("info");
    let subscriber_name = String::from("test");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init tracing.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to init tracing.");
    }
});

pub struct TestApp {
    pub address: String,
    pub store_path: PathBuf,
    pub email_server: MockServer,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with_admin_token(None).await
    }

    pub async fn spawn_app_with_admin_token(admin_token: Option<&str>) -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let email_server = MockServer::start().await;
        // Every test gets its own store file
        let store_path = std::env::temp_dir()
            .join(format!("delta-newsletter-{}", Uuid::new_v4()))
            .join("subscribers.json");

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_email_client_base_url(email_server.uri());
        config.set_store_path(store_path.clone());
        config.set_admin_token(admin_token.map(|token| Secret::new(token.to_string())));

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            store_path,
            email_server,
        }
    }

    pub async fn post_subscription(&self, body: serde_json::Value) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/api/subscribe", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscription_form(&self, body: &'static str) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/api/subscribe", self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_newsletter_form(&self, body: &'static str) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/api/newsletter", self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_newsletter(&self, body: serde_json::Value) -> Response {
        self.post_newsletter_with_token(body, None).await
    }

    pub async fn post_newsletter_with_token(
        &self,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> Response {
        let mut request = reqwest::Client::new()
            .post(&format!("{}/api/newsletter", self.address))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request.")
    }

    pub async fn get_subscribers_count(&self, token: Option<&str>) -> Response {
        let mut request =
            reqwest::Client::new().get(&format!("{}/api/subscribers-count", self.address));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request.")
    }

    pub async fn count(&self) -> u64 {
        let body: serde_json::Value = self
            .get_subscribers_count(None)
            .await
            .json()
            .await
            .expect("Count response was not JSON.");

        body["count"].as_u64().expect("Missing count.")
    }

    pub async fn stored_subscribers(&self) -> Vec<Subscriber> {
        SubscriberStore::new(&self.store_path)
            .all()
            .await
            .expect("Failed to read the subscribers store.")
    }
}
