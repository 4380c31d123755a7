use anyhow::Result;
use clap::Parser;
use roshambo_core::{FrameSource, GameSession, GameState};
use roshambo_capture::{CommandFrameSource, FileFrameSource};
use roshambo_vision::GeminiClassifier;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

mod render;

#[derive(Parser)]
#[command(name = "roshambo")]
#[command(about = "Rock, Paper, Scissors against a vision model", long_about = None)]
struct Cli {
    /// Play against a still image instead of a webcam
    #[arg(long, conflicts_with = "capture_cmd")]
    image: Option<PathBuf>,

    /// Custom capture command template with an {output} placeholder
    #[arg(long)]
    capture_cmd: Option<String>,

    /// Video device for the default ffmpeg capture
    #[arg(long, default_value = "/dev/video0")]
    device: String,

    /// Gemini model override
    #[arg(long)]
    model: Option<String>,

    /// Countdown tick length in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut classifier = GeminiClassifier::from_env();
    if let Some(model) = &cli.model {
        classifier = classifier.with_model(model);
    }

    let frames: Arc<dyn FrameSource> = if let Some(image) = &cli.image {
        Arc::new(FileFrameSource::new(image))
    } else if let Some(template) = &cli.capture_cmd {
        Arc::new(CommandFrameSource::from_template(template)?)
    } else {
        Arc::new(CommandFrameSource::ffmpeg(&cli.device))
    };

    let mut session = GameSession::new(frames, Arc::new(classifier))
        .with_tick(Duration::from_millis(cli.tick_ms));

    render::banner();
    let camera_banner = match session.start_camera().await {
        Ok(()) => None,
        Err(err) => {
            let message = err.user_message();
            render::camera_banner(&message);
            Some(message)
        }
    };

    run_loop(&mut session, camera_banner.as_deref()).await
}

async fn run_loop(session: &mut GameSession, camera_banner: Option<&str>) -> Result<()> {
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match line.trim() {
            "" | "play" | "p" => {
                if let Some(message) = camera_banner {
                    render::camera_banner(message);
                    continue;
                }
                play_round(session).await?;
            }
            "log" | "l" => render::log(session.controller().log()),
            "quit" | "exit" | "q" => return Ok(()),
            _ => render::help(),
        }
    }
}

async fn play_round(session: &mut GameSession) -> Result<()> {
    // Returning to Idle is the "play again" intent from the last round.
    if matches!(
        session.controller().state(),
        GameState::Results | GameState::Error
    ) {
        session.play_again()?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            render::event(&event);
        }
    });

    let outcome = session.play_round(tx).await;
    printer.await?;
    outcome?;
    Ok(())
}
