use foodrag_cli::{commands, logging, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let app = App::bootstrap()?;
    let index = app.upstash()?;
    commands::run_ingest(&app, &index, app.config.index.sync_guard, true, &mut std::io::stdout()).await?;
    Ok(())
}
