//! Application entry point — slidecast.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the tokio runtime (current-thread — the whole application
//!    is cooperative; concurrency is suspension, never parallelism).
//! 4. Build the generative-service client and the vocalizer.
//! 5. Run the terminal front-end loop until `:quit`.

use std::sync::Arc;

use anyhow::Result;
use slidecast::{
    app::SlidecastApp,
    config::AppConfig,
    genai::{GenAiClient, ImageGenerator, TextGenerator},
    narration::{new_shared_narration, ProcessVocalizer, Vocalizer},
    pacing::Pacer,
    pipeline::SlidePipeline,
    show::new_shared_show,
};

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("slidecast starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    match config.resolve_api_key() {
        Some(key) => config.genai.api_key = Some(key),
        None => log::warn!(
            "No API key found (settings.toml genai.api_key or GEMINI_API_KEY); \
             generation requests will fail until one is provided"
        ),
    }

    // 3. Runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // 4. Collaborators
    let client = Arc::new(GenAiClient::from_config(&config.genai));
    let text: Arc<dyn TextGenerator> = client.clone();
    let image: Arc<dyn ImageGenerator> = client;

    let vocalizer: Arc<dyn Vocalizer> = Arc::new(ProcessVocalizer::from_config(&config.narration));
    let narration = new_shared_narration(vocalizer, config.narration.start_enabled);

    let show = new_shared_show();
    let pipeline = SlidePipeline::new(
        Arc::clone(&show),
        Arc::clone(&narration),
        text,
        image,
        Pacer::from_config(&config.pacing),
    );

    // 5. Front-end loop
    let mut app = SlidecastApp::new(show, narration, pipeline, &config);
    rt.block_on(app.run())
}
