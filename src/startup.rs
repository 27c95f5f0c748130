use actix_web::dev::Server;
use actix_web::error::{JsonPayloadError, UrlencodedError};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::authentication::AdminToken;
use crate::config::Settings;
use crate::email_client::EmailClient;
use crate::routes::{
    handle_create_subscription, health_check, newsletter_body_rejected, publish_newsletter,
    subscribe_body_rejected, subscribers_count,
};
use crate::subscriber_store::SubscriberStore;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> anyhow::Result<Self> {
        let store = SubscriberStore::new(config.get_store_path());
        store
            .init()
            .await
            .context("Failed to initialise the subscribers store.")?;

        let sender_email = config
            .get_email_client_sender()
            .map_err(anyhow::Error::msg)
            .context("Sender email is not valid.")?;
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.get_email_client_api(),
            Some(config.get_email_client_timeout()),
        )
        .context("Failed to build the email client.")?
        .with_max_concurrent_sends(config.get_email_client_max_concurrent_sends());

        if config.get_admin_token().is_none() {
            tracing::warn!("No admin token configured, admin endpoints are open");
        }

        let listener = TcpListener::bind(config.get_address())
            .with_context(|| format!("Failed to bind the address {}.", config.get_address()))?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            store,
            email_client,
            AdminToken(config.get_admin_token()),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: SubscriberStore,
    email_client: EmailClient,
    admin_token: AdminToken,
) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);
    let email_client = web::Data::new(email_client);
    let admin_token = web::Data::new(admin_token);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/subscribe")
                            .app_data(web::JsonConfig::default().error_handler(
                                subscribe_body_rejected::<JsonPayloadError>,
                            ))
                            .app_data(web::FormConfig::default().error_handler(
                                subscribe_body_rejected::<UrlencodedError>,
                            ))
                            .route(web::post().to(handle_create_subscription)),
                    )
                    .service(
                        web::resource("/newsletter")
                            .app_data(web::JsonConfig::default().error_handler(
                                newsletter_body_rejected::<JsonPayloadError>,
                            ))
                            .app_data(web::FormConfig::default().error_handler(
                                newsletter_body_rejected::<UrlencodedError>,
                            ))
                            .route(web::post().to(publish_newsletter)),
                    )
                    .route("/subscribers-count", web::get().to(subscribers_count)),
            )
            .app_data(store.clone())
            .app_data(email_client.clone())
            .app_data(admin_token.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
