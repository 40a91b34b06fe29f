//! Ask command - answer one question on the terminal

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

pub async fn run(config: AppConfig, question: &str) -> anyhow::Result<()> {
    init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config).await?;
    let answer = state.orchestrator.answer(question).await?;

    println!("{}", answer.text);
    println!("{}", answer.details());

    Ok(())
}
