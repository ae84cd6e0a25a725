//! Entry point: logging, config, and the single top-level error handler.

mod config;

use std::process::ExitCode;

use anyhow::Result;

use crate::config::AppConfig;

fn run(cfg: AppConfig) -> Result<()> {
    let settings = platform::RunSettings {
        backends: cfg.backends,
        width: cfg.width,
        height: cfg.height,
        paths: renderer::ScenePaths::in_dir(&cfg.data_dir),
    };
    platform::run_with_renderer(settings)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from_env();
    log::info!(
        "Starting. Backend: {:?}, window_size={}x{}, data_dir={}",
        cfg.backends,
        cfg.width,
        cfg.height,
        cfg.data_dir.display()
    );

    match run(cfg) {
        Ok(()) => {
            log::info!("Graceful shutdown. Bye!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
