use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice_chat::prompts::{fetch_prompts, resolve_prompt_id};
use voice_chat::{
    create_router, AppState, AudioPlayerFactory, Config, ConsoleTranscript, HttpChatBackend,
    HttpSpeechSynthesizer, MemoryTranscript, PipelineParts, ReplyPipeline, SharedSettings,
    Transcript, TurnError, VoiceInput,
};

#[derive(Parser)]
#[command(name = "voice-chat", version, about = "Streaming voice chat client")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config/voice-chat")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the local control API
    Serve,
    /// Send one message
    Send { text: String },
    /// Chat interactively, one message per line
    Repl,
    /// Transcribe a recording and send it
    Transcribe { file: PathBuf },
    /// List available system prompts
    Prompts,
}

struct Runtime {
    pipeline: Arc<ReplyPipeline>,
    backend: Arc<HttpChatBackend>,
}

fn build_runtime(
    cfg: &Config,
    transcript: Arc<dyn Transcript>,
    settings: &SharedSettings,
) -> Runtime {
    let backend = Arc::new(HttpChatBackend::new(&cfg.backend.base_url));
    let synthesizer = Arc::new(HttpSpeechSynthesizer::new(
        &cfg.backend.base_url,
        &cfg.speech.synthesize_path,
    ));
    let player = AudioPlayerFactory::create(&cfg.playback);
    info!("Audio player: {}", player.name());

    let pipeline = ReplyPipeline::new(PipelineParts {
        backend: backend.clone(),
        synthesizer,
        player: Arc::from(player),
        transcript,
        settings: Arc::new(settings.clone()),
        rooms: Arc::new(settings.clone()),
    })
    .with_frame_interval(cfg.render.frame_interval());

    Runtime {
        pipeline: Arc::new(pipeline),
        backend,
    }
}

/// Pick a listed prompt unless the configured one is still offered
async fn select_prompt(backend: &HttpChatBackend, settings: &SharedSettings) {
    let prompts = fetch_prompts(backend).await;
    let saved = settings.snapshot().chat.prompt_id;
    let prompt_id = resolve_prompt_id(saved.as_deref(), &prompts);
    info!("Using prompt {} ({} available)", prompt_id, prompts.len());
    settings.set_prompt_id(&prompt_id);
}

fn report(result: Result<voice_chat::TurnOutcome, TurnError>) {
    match result {
        Ok(outcome) => {
            println!();
            info!(
                "Reply {} done ({} clips, persisted={})",
                outcome.message_id, outcome.clips, outcome.persisted
            );
        }
        Err(TurnError::EmptyInput) => {}
        Err(e) => warn!("{}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Chat backend: {}", cfg.backend.base_url);

    let settings = SharedSettings::new(cfg.chat.settings(), cfg.chat.room_id.clone());

    match cli.command {
        Command::Serve => {
            let transcript = Arc::new(MemoryTranscript::new());
            let runtime = build_runtime(&cfg, transcript.clone(), &settings);
            select_prompt(&runtime.backend, &settings).await;

            let state = AppState::new(runtime.pipeline, transcript, settings, runtime.backend);
            let app = create_router(state);

            let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("Control API listening on {}", addr);

            axum::serve(listener, app)
                .await
                .context("HTTP server failed")?;
        }

        Command::Send { text } => {
            let runtime = build_runtime(&cfg, Arc::new(ConsoleTranscript::new()), &settings);
            select_prompt(&runtime.backend, &settings).await;
            report(runtime.pipeline.submit(&text).await);
        }

        Command::Repl => {
            let runtime = build_runtime(&cfg, Arc::new(ConsoleTranscript::new()), &settings);
            select_prompt(&runtime.backend, &settings).await;

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
                report(runtime.pipeline.submit(&line).await);
            }
        }

        Command::Transcribe { file } => {
            let transcript: Arc<dyn Transcript> = Arc::new(ConsoleTranscript::new());
            let runtime = build_runtime(&cfg, transcript.clone(), &settings);
            select_prompt(&runtime.backend, &settings).await;

            let voice = VoiceInput::new(runtime.backend.clone(), runtime.pipeline, transcript);
            match voice.submit_recording(&file).await {
                Ok(_) => println!(),
                Err(e) => warn!("{}", e),
            }
        }

        Command::Prompts => {
            let backend = HttpChatBackend::new(&cfg.backend.base_url);
            for prompt in fetch_prompts(&backend).await {
                println!("{}\t{}", prompt.id, prompt.name);
            }
        }
    }

    Ok(())
}
