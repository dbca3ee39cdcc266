use anyhow::Context;
use megadex::{PipelineConfig, pipeline};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("Reading config from {}", path.display());
            PipelineConfig::from_toml_file(&path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    pipeline::run(&config)
        .with_context(|| format!("pipeline failed on {}", config.input.display()))?;
    Ok(())
}
