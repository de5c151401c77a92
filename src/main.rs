use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use scene_viewer::cli::Cli;
use scene_viewer::renderer::RendererOptions;
use scene_viewer::{App, ViewerConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = ViewerConfig::from_cli(&cli).context("failed to load configuration")?;
    log::debug!("{config:?}");

    let options = RendererOptions {
        backends: cli.backend.to_wgpu(),
        debug: cli.debug,
        overlay: !cli.no_ui,
    };

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(config, options);

    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(error) = app.take_error() {
        return Err(error).context("viewer stopped");
    }

    Ok(())
}
