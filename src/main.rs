use delta_newsletter::config::get_configuration;
use delta_newsletter::startup::Application;
use delta_newsletter::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        String::from("delta_newsletter"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber)?;

    let config = get_configuration()?;
    let application = Application::build(config).await?;

    tracing::info!("Newsletter server listening on port {}", application.get_port());

    application.run_until_stop().await?;

    Ok(())
}
