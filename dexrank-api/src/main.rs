use dexrank_api::configuration::get_configuration;
use dexrank_api::startup::Application;
use dexrank_api::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing telemetry.
    let subscriber = get_subscriber("info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    // Get config settings
    let configuration = get_configuration()?;

    // Load the catalog and start the web app
    let application = Application::build(&configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
