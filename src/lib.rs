pub mod authentication;
pub mod config;
pub mod domain;
pub mod email_client;
pub mod email_templates;
pub mod routes;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
