use clipshelf_api::setup;
use clipshelf_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env in development; ignored when the file is absent.
    let _ = dotenvy::dotenv();

    setup::init_tracing();

    let config = Config::from_env()?;
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
