use crate::config::AppConfig;
use crate::error::{Result, ResultExt};
use crate::progress::ProgressTracker;
use crate::ui;
use github::GithubPublisher;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use workflow::TokenPublisher;

pub fn execute(config: Option<PathBuf>) -> Result<()> {
    let runtime = Runtime::new().with_context(|| "Failed to start the async runtime")?;
    runtime.block_on(run(config))
}

async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let mut progress = ProgressTracker::new("Token Launch status").with_steps(vec![
        "Load configuration".to_string(),
        "Check extraction file".to_string(),
        "Initialize GitHub client".to_string(),
        "Check repository access".to_string(),
    ]);

    progress.start_step();
    let (config, used) = AppConfig::load_or_default(config_path.as_deref())?;
    progress.complete_step();
    match &used {
        Some(path) => ui::field("Config", &path.display().to_string()),
        None => ui::field("Config", "defaults (no file found)"),
    }

    progress.start_step();
    if config.source.path.is_file() {
        progress.complete_step();
    } else {
        progress.fail_step(&format!("{} does not exist", config.source.path.display()));
    }
    ui::field("Source", &config.source.path.display().to_string());
    ui::field("Output dir", &config.export.output_dir.display().to_string());

    let Some(github) = config.github else {
        progress.skip_step("no [github] table");
        progress.skip_step("local-only mode");
        progress.complete();
        return Ok(());
    };

    let publisher = GithubPublisher::new(github)?;
    ui::field("Repository", &publisher.repository().to_string());
    ui::field("Branch", &publisher.config().branch);
    ui::field("Path", &publisher.config().path);

    progress.start_step();
    if let Err(err) = publisher.initialize().await {
        progress.fail_step(&err.user_message());
        progress.skip_step("no GitHub client");
        progress.complete();
        return Ok(());
    }
    progress.complete_step();

    progress.start_step();
    let connectivity = publisher.check_connectivity().await;
    if connectivity.push_available() {
        progress.complete_step();
    } else {
        let reason = connectivity
            .error
            .unwrap_or_else(|| "repository unreachable".to_string());
        progress.fail_step(&reason);
    }

    progress.complete();
    Ok(())
}
