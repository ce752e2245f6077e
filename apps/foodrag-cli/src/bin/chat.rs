use foodrag_cli::{commands, logging, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let app = App::bootstrap()?;
    let index = app.upstash()?;
    let model = app.groq()?;
    commands::run_chat(&app, &index, &model, std::io::stdin().lock(), &mut std::io::stdout()).await?;
    Ok(())
}
