use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wesign::capture::{FrameSourceConfig, TestPatternSource};
use wesign::classify::HttpClassifier;
use wesign::cli::{Cli, Commands, ConfigAction};
use wesign::config::Config;
use wesign::landmarks::NullAnnotator;
use wesign::session::{Session, SessionConfig, SessionEvent};
use wesign::voice::lookup_signs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.service_url.clone() {
        config.classifier.service_url = url;
    }

    match cli.command {
        None => run_session(config, cli.quiet, None).await?,
        Some(Commands::Run { duration }) => {
            run_session(config, cli.quiet, duration.map(Duration::from_secs)).await?;
        }
        Some(Commands::Signs) => print_signs(),
        Some(Commands::Lookup { words }) => print_lookup(&words.join(" ")),
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref(), &config)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}

async fn run_session(config: Config, quiet: bool, duration: Option<Duration>) -> Result<()> {
    let mut session_config = SessionConfig::from_config(&config);
    session_config.quiet = quiet;

    let (tx, rx) = crossbeam_channel::unbounded();
    let session = Session::new(session_config).with_event_sender(tx);

    let source = Box::new(TestPatternSource::new(FrameSourceConfig {
        width: config.capture.width,
        height: config.capture.height,
        frame_rate: config.capture.frame_rate,
    }));
    // No platform landmark tracker is wired in yet; frames reach the
    // service without skeleton overlays.
    let annotator = Arc::new(NullAnnotator);
    let classifier = Arc::new(HttpClassifier::new(&config.classifier.service_url));

    let handle = session
        .start(source, annotator, classifier)
        .await
        .context("failed to start detection session")?;

    if !quiet {
        eprintln!(
            "wesign: session running against {} (ctrl-c to stop)",
            config.classifier.service_url
        );
    }

    let deadline = duration.map(|d| tokio::time::Instant::now() + d);
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut last = handle.prediction();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                for event in rx.try_iter() {
                    if let SessionEvent::PredictionUpdated(state) = event
                        && state != last
                    {
                        println!("{}  {:.0}%", state.label, state.confidence);
                        last = state;
                    }
                }
                if let Some(deadline) = deadline
                    && tokio::time::Instant::now() >= deadline
                {
                    break;
                }
            }
        }
    }

    handle.stop().await?;
    Ok(())
}

fn print_signs() {
    for sign in wesign::signs::list_signs() {
        println!("{:<12} {}", sign.word, sign.description);
    }
}

fn print_lookup(utterance: &str) {
    for m in lookup_signs(utterance) {
        println!("{:<12} {}", m.word, m.sign.description);
    }
}

fn handle_config_command(action: ConfigAction, path: Option<&Path>, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Init => {
            let path = path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            if path.exists() {
                anyhow::bail!("config file already exists: {}", path.display());
            }
            Config::default().save(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
