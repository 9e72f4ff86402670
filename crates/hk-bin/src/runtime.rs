//! Event loop owning every widget instance.

use crate::surfaces;
use anyhow::Result;
use core_carousel::{AdvanceOutcome, Carousel, CarouselOptions, CarouselSet, CarouselSnapshot};
use core_events::{CommandEvent, Event, EventHooks, InputEvent, NavKey, NoopEventHooks};
use core_forms::{
    CharCount, ErrorSlot, Field, FormGuard, ModalSnapshot, ModalState, PictureFile, ProfileForm,
    SaveButtonState, check_email, check_username,
};
use core_gallery::{Gallery, GallerySnapshot, MediaSwap};
use core_layout::Viewport;
use core_page::{CompareSnapshot, CompareTray, Faq, FaqSnapshot};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// One line of output per observable state change.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Carousel(CarouselSnapshot),
    Gallery(GallerySnapshot),
    MediaSwap(MediaSwap),
    Form(FormReport),
    Validation {
        ok: bool,
        field: Option<&'static str>,
        error: Option<String>,
    },
    Upload {
        accepted: bool,
        error: Option<String>,
    },
    Modal(ModalSnapshot),
    Faq(FaqSnapshot),
    Compare(CompareSnapshot),
    /// Blocking message the page would show in an alert box.
    Alert {
        message: String,
    },
}

/// Profile form state after an edit.
#[derive(Debug, Serialize)]
pub struct FormReport {
    pub field: &'static str,
    pub save_enabled: bool,
    pub blocked: Option<String>,
    pub bio_count: String,
    pub bio_low: bool,
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    CommandQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

/// Everything the runtime mounts at startup.
pub struct PageSetup {
    pub width: u32,
    pub carousels: Vec<(String, usize)>,
    pub carousel_options: CarouselOptions,
    pub gallery: Gallery,
    pub forms: FormGuard,
    /// Account values the username/email checks compare against.
    pub profile: ProfileForm,
    pub faq: Faq,
}

pub struct HostelRuntime<W: Write> {
    carousels: CarouselSet,
    gallery: Gallery,
    forms: FormGuard,
    saved: ProfileForm,
    profile: ProfileForm,
    modals: ModalState,
    faq: Faq,
    compare: CompareTray,
    out: W,
    hooks: Box<dyn EventHooks>,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
}

impl<W: Write> HostelRuntime<W> {
    pub fn new(
        setup: PageSetup,
        out: W,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        source_handles: Vec<JoinHandle<()>>,
    ) -> Self {
        let PageSetup {
            width,
            carousels: specs,
            carousel_options,
            gallery,
            forms,
            profile,
            faq,
        } = setup;
        let viewport = Viewport::resolve(
            width,
            &carousel_options.breakpoints,
            &carousel_options.page_sizes,
        );
        let mut carousels = CarouselSet::new();
        for (id, count) in specs {
            let bindings = surfaces::bindings(&id, carousel_options.gap, viewport);
            let carousel = Carousel::mount(id, count, bindings, carousel_options.clone(), width);
            if let Some(old) = carousels.insert(carousel) {
                warn!(target: "runtime", id = old.id(), "duplicate_carousel_replaced");
            }
        }
        Self {
            carousels,
            gallery,
            forms,
            saved: profile.clone(),
            profile,
            modals: ModalState::new(),
            faq,
            compare: CompareTray::new(),
            out,
            hooks: Box::new(NoopEventHooks),
            rx,
            tx: Some(tx),
            source_handles,
        }
    }

    #[cfg(test)]
    pub fn carousels(&self) -> &CarouselSet {
        &self.carousels
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn emit(&mut self, report: Report) {
        let written = serde_json::to_writer(&mut self.out, &report)
            .map_err(anyhow::Error::from)
            .and_then(|()| writeln!(self.out).map_err(anyhow::Error::from));
        if let Err(err) = written {
            error!(target: "runtime", %err, "report_write_failed");
        }
    }

    /// Report the initial state of every mounted widget.
    pub fn emit_initial(&mut self) {
        let snapshots: Vec<_> = self.carousels.iter().map(|c| c.snapshot()).collect();
        for snap in snapshots {
            self.emit(Report::Carousel(snap));
        }
        if !self.gallery.is_empty() {
            let snap = self.gallery.snapshot();
            self.emit(Report::Gallery(snap));
        }
        if !self.faq.is_empty() {
            let snap = self.faq.snapshot();
            self.emit(Report::Faq(snap));
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.emit_initial();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            self.hooks.pre_handle(&event);

            let control = match &event {
                Event::Input(input) => self.handle_input_event(input, Instant::now()),
                Event::Command(cmd) => self.handle_command_event(cmd),
                Event::Tick => self.handle_tick(Instant::now()),
                Event::Shutdown => self.handle_shutdown(),
            };

            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue => self.hooks.post_handle(&event),
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        self.out.flush()?;
        Ok(())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        if let Some(tx) = self.tx.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "dropping_runtime_sender"
            );
            drop(tx);
        }

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_stopped"
                ),
                Ok(Err(err)) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_cancelled"
                ),
                Ok(Err(err)) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "event_source_task_error"
                ),
                Err(_) => warn!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "event_source_task_timeout"
                ),
            }
        }

        self.carousels.teardown_all();
        for carousel in self.carousels.iter() {
            let m = carousel.metrics_snapshot();
            info!(
                target: "runtime.shutdown",
                id = carousel.id(),
                advances = m.advances,
                boundary_noops = m.boundary_noops,
                resize_events = m.resize_events,
                resize_collapsed = m.resize_collapsed,
                resizes_applied = m.resizes_applied,
                index_reclamped = m.index_reclamped,
                fallback_width = m.fallback_width,
                "carousel_metrics"
            );
        }

        let t = core_events::telemetry_snapshot();
        info!(
            target: "runtime.shutdown",
            input_events = t.input_events,
            resize_events = t.resize_events,
            ticks = t.ticks,
            channel_send_failures = t.channel_send_failures,
            "event_telemetry"
        );

        log_shutdown_stage(reason, "complete");
    }

    fn handle_input_event(&mut self, input: &InputEvent, now: Instant) -> LoopControl {
        match input {
            InputEvent::Nav {
                carousel,
                direction,
            } => self.handle_nav(carousel, *direction),
            InputEvent::Resize(width) => self.handle_resize(*width, now),
            InputEvent::Thumbnail(index) => {
                if self.gallery.select(*index, now) {
                    self.emit_gallery();
                }
                LoopControl::Continue
            }
            InputEvent::Swipe { start_x, end_x } => {
                if self.gallery.swipe(*start_x, *end_x, now).is_some() {
                    self.emit_gallery();
                }
                LoopControl::Continue
            }
            InputEvent::Key(key) => {
                if self.gallery.key(*key, now).is_some() {
                    self.emit_gallery();
                }
                if *key == NavKey::Escape && self.modals.escape().is_some() {
                    self.emit_modal();
                }
                LoopControl::Continue
            }
            InputEvent::Field { name, value } => self.handle_field(name, value),
            InputEvent::Validate => self.handle_validate(),
            InputEvent::Upload { mime, size } => self.handle_upload(mime, *size),
            InputEvent::FaqToggle(index) => {
                if self.faq.toggle(*index).is_some() {
                    self.emit_faq();
                }
                LoopControl::Continue
            }
            InputEvent::FaqSearch(term) => {
                self.faq.search(term);
                self.emit_faq();
                LoopControl::Continue
            }
            InputEvent::Compare { id, name } => {
                match self.compare.toggle(id, name) {
                    Ok(_) => {
                        let snap = self.compare.snapshot();
                        self.emit(Report::Compare(snap));
                    }
                    Err(err) => self.emit(Report::Alert {
                        message: err.to_string(),
                    }),
                }
                LoopControl::Continue
            }
            InputEvent::ModalOpen(id) => {
                self.modals.open(id.as_str());
                self.emit_modal();
                LoopControl::Continue
            }
            InputEvent::ModalClose(id) => {
                self.modals.close(id);
                self.emit_modal();
                LoopControl::Continue
            }
            InputEvent::OverlayClick => {
                if self.modals.overlay_click().is_some() {
                    self.emit_modal();
                }
                LoopControl::Continue
            }
        }
    }

    /// Store the edit, re-run the local username/email check and report the
    /// save button.
    fn handle_field(&mut self, name: &str, value: &str) -> LoopControl {
        let field = match name.parse::<Field>() {
            Ok(field) => field,
            Err(err) => {
                warn!(target: "runtime", %err, "field_unknown");
                return LoopControl::Continue;
            }
        };
        self.profile.set(field, value);

        let current = self.saved.get(field);
        let check = match field {
            Field::Username => Some((ErrorSlot::Username, check_username(current, value))),
            Field::Email => Some((ErrorSlot::Email, check_email(current, value))),
            _ => None,
        };
        if let Some((slot, check)) = check {
            trace!(target: "runtime", field = field.as_str(), ?check, "field_checked");
            self.modals.apply_check(slot, &check);
            self.emit_modal();
        }

        let save = self.forms.save_button_state(&self.profile);
        let count = self.forms.bio_count(&self.profile.bio);
        let report = FormReport {
            field: field.as_str(),
            save_enabled: save.is_enabled(),
            blocked: match save {
                SaveButtonState::Enabled => None,
                SaveButtonState::Disabled(reason) => Some(reason.to_string()),
            },
            bio_count: count.label(),
            bio_low: matches!(count, CharCount::Remaining { low: true, .. }),
        };
        self.emit(Report::Form(report));
        LoopControl::Continue
    }

    fn handle_validate(&mut self) -> LoopControl {
        let report = match self.forms.validate(&self.profile) {
            Ok(_) => Report::Validation {
                ok: true,
                field: None,
                error: None,
            },
            Err(err) => Report::Validation {
                ok: false,
                field: Some(err.field().as_str()),
                error: Some(err.to_string()),
            },
        };
        self.emit(report);
        LoopControl::Continue
    }

    fn handle_upload(&mut self, mime: &str, size: u64) -> LoopControl {
        let file = PictureFile {
            mime: mime.to_string(),
            size,
        };
        let report = match self.forms.check_picture(&file) {
            Ok(()) => Report::Upload {
                accepted: true,
                error: None,
            },
            Err(err) => Report::Upload {
                accepted: false,
                error: Some(err.to_string()),
            },
        };
        self.emit(report);
        LoopControl::Continue
    }

    fn handle_nav(&mut self, id: &str, direction: core_events::NavDirection) -> LoopControl {
        match self.carousels.advance(id, direction) {
            Some(AdvanceOutcome::Moved { .. }) => {
                if let Some(snap) = self.carousels.get(id).map(Carousel::snapshot) {
                    self.emit(Report::Carousel(snap));
                }
            }
            Some(outcome) => {
                debug!(target: "runtime", id, direction = direction.as_str(), ?outcome, "nav_ignored")
            }
            None => warn!(target: "runtime", id, "nav_unknown_carousel"),
        }
        LoopControl::Continue
    }

    fn handle_resize(&mut self, width: u32, now: Instant) -> LoopControl {
        core_events::RESIZE_EVENTS_TOTAL.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let armed = self.carousels.notify_resize(width, now);
        trace!(target: "carousel.resize", width, armed, "resize_observed");
        LoopControl::Continue
    }

    /// Expire due deadlines: debounced resizes, then the gallery fade.
    fn handle_tick(&mut self, now: Instant) -> LoopControl {
        for id in self.carousels.poll_resize(now) {
            if let Some(snap) = self.carousels.get(&id).map(Carousel::snapshot) {
                self.emit(Report::Carousel(snap));
            }
        }
        if let Some(swap) = self.gallery.poll(now) {
            self.emit(Report::MediaSwap(swap));
        }
        LoopControl::Continue
    }

    fn emit_gallery(&mut self) {
        let snap = self.gallery.snapshot();
        self.emit(Report::Gallery(snap));
    }

    fn emit_modal(&mut self) {
        let snap = self.modals.snapshot();
        self.emit(Report::Modal(snap));
    }

    fn emit_faq(&mut self) {
        let snap = self.faq.snapshot();
        self.emit(Report::Faq(snap));
    }

    fn handle_command_event(&mut self, cmd: &CommandEvent) -> LoopControl {
        match cmd {
            CommandEvent::Quit => LoopControl::Break {
                reason: ShutdownReason::CommandQuit,
            },
        }
    }

    fn handle_shutdown(&mut self) -> LoopControl {
        LoopControl::Break {
            reason: ShutdownReason::ShutdownEvent,
        }
    }
}
