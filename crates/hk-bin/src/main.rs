//! hostelkit entrypoint: replays a UI event script against headless widgets
//! and prints a JSON line for every state change.
use anyhow::{Context, Result};
use clap::Parser;
use core_carousel::CarouselOptions;
use core_config::load_from;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, TickEventSource};
use core_forms::{FormGuard, ProfileForm};
use core_gallery::{Gallery, GalleryOptions, MediaItem};
use core_page::{Faq, FaqItem};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;
mod script;
mod surfaces;

use runtime::{HostelRuntime, PageSetup};
use script::{ScriptEventSource, ScriptInput};

const LOG_FILE_NAME: &str = "hostelkit.log";

/// Parse `<id>=<count>`.
fn parse_carousel_arg(raw: &str) -> Result<(String, usize), String> {
    let (id, count) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <id>=<count>, got `{raw}`"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err("carousel id must not be empty".to_string());
    }
    let count = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid item count `{count}`: {e}"))?;
    Ok((id.to_string(), count))
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "hostelkit", version, about = "Headless hostel listing widgets")]
struct Args {
    /// Optional configuration file path (overrides discovery of `hostelkit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Event script to replay. Reads stdin when omitted.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
    /// Initial viewport width in CSS pixels.
    #[arg(long = "width", default_value_t = 1280)]
    pub width: u32,
    /// Carousel to mount, as `<id>=<item count>`. Repeatable.
    #[arg(long = "carousel", value_parser = parse_carousel_arg)]
    pub carousels: Vec<(String, usize)>,
    /// Gallery media, as `image:<src>` or `video:<src>`. Repeatable.
    #[arg(long = "media")]
    pub media: Vec<MediaItem>,
    /// Support page FAQ entry, as `question|answer`. Repeatable.
    #[arg(long = "faq")]
    pub faq: Vec<FaqItem>,
    /// Username saved on the account; edits back to it raise no error.
    #[arg(long = "username", default_value = "")]
    pub username: String,
    /// Email saved on the account.
    #[arg(long = "email", default_value = "")]
    pub email: String,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            std::fs::remove_file(&log_path)
                .with_context(|| format!("removing stale {}", log_path.display()))?;
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn run(&mut self, args: Args) -> Result<(PageSetup, ScriptInput, Duration)> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let config = load_from(args.config.clone())?;
        let file = &config.file;

        let carousels = if args.carousels.is_empty() {
            vec![("latest".to_string(), 10), ("more".to_string(), 6)]
        } else {
            args.carousels
        };
        let gallery = Gallery::new(args.media, GalleryOptions::from_config(&file.gallery));
        let faq = Faq::new(args.faq);
        let profile = ProfileForm {
            username: args.username,
            email: args.email,
            ..ProfileForm::default()
        };
        let script = match args.script {
            Some(path) => ScriptInput::File(path),
            None => ScriptInput::Stdin,
        };

        info!(
            target: "runtime.startup",
            config = ?config.source,
            width = args.width,
            carousels = carousels.len(),
            media = gallery.len(),
            faq = faq.len(),
            bio_max = file.forms.bio_max,
            step = file.carousel.step.as_str(),
            tick_ms = file.runtime.tick_ms,
            "bootstrap_complete"
        );

        let setup = PageSetup {
            width: args.width,
            carousels,
            carousel_options: CarouselOptions::from_config(&file.carousel),
            gallery,
            forms: FormGuard::from_config(&file.forms),
            profile,
            faq,
        };
        Ok((setup, script, Duration::from_millis(file.runtime.tick_ms)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let (setup, script, tick) = startup.run(args)?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(tick));
    registry.register(ScriptEventSource::new(script));
    let source_handles = registry.spawn_all(&tx);

    let stdout = std::io::stdout().lock();
    let mut runtime = HostelRuntime::new(setup, stdout, tx, rx, source_handles);
    runtime.run().await
}
