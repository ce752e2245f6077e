use foodrag_cli::app::{groq_client, load_config, upstash_index};
use foodrag_cli::{commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = load_config()?;
    let index = upstash_index(&config)?;
    let model = groq_client(&config)?;
    commands::run_test_queries(&config, &index, &model, &mut std::io::stdout()).await?;
    Ok(())
}
