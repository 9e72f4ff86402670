//! Media gallery navigator for the hostel detail page.
//!
//! A row of thumbnails drives one main media slot. Activating a thumbnail
//! highlights it at once, while the main slot swaps after a short fade so the
//! transition can play. Swipes on the main slot and the arrow keys step to the
//! neighbouring item relative to what is currently *displayed*; navigation
//! never wraps around.

use core_config::GalleryConfig;
use core_events::{NavDirection, NavKey};
use serde::Serialize;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub src: String,
}

impl MediaItem {
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            src: src.into(),
        }
    }

    pub fn video(src: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            src: src.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaParseError {
    #[error("media entry {0:?} is missing the `kind:` prefix")]
    MissingKind(String),
    #[error("unknown media kind {0:?} (expected `image` or `video`)")]
    UnknownKind(String),
    #[error("media entry has an empty source")]
    EmptySource,
}

/// Parses `image:<src>` / `video:<src>`.
impl FromStr for MediaItem {
    type Err = MediaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, src) = s
            .split_once(':')
            .ok_or_else(|| MediaParseError::MissingKind(s.to_string()))?;
        let src = src.trim();
        if src.is_empty() {
            return Err(MediaParseError::EmptySource);
        }
        match kind.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::image(src)),
            "video" => Ok(Self::video(src)),
            other => Err(MediaParseError::UnknownKind(other.to_string())),
        }
    }
}

/// What the main media slot shows after a swap.
///
/// `Video`: show the video element, load `src` into it, hide the image.
/// `Image`: pause and hide the video element, show the image with `src`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "show", rename_all = "lowercase")]
pub enum MainMedia {
    Video { src: String },
    Image { src: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSwap {
    pub index: usize,
    /// One-based position shown in the media counter.
    pub counter: usize,
    pub main: MainMedia,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GallerySnapshot {
    pub len: usize,
    pub active: usize,
    pub displayed: usize,
    pub counter: usize,
    pub swap_pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryOptions {
    pub fade: Duration,
    pub swipe_threshold: f32,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

impl GalleryOptions {
    pub fn from_config(cfg: &GalleryConfig) -> Self {
        Self {
            fade: Duration::from_millis(cfg.fade_ms),
            swipe_threshold: cfg.swipe_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingSwap {
    due: Instant,
    index: usize,
}

#[derive(Debug)]
pub struct Gallery {
    items: Vec<MediaItem>,
    options: GalleryOptions,
    /// Highlighted thumbnail.
    active: usize,
    /// Item currently in the main slot.
    displayed: usize,
    pending: Option<PendingSwap>,
}

impl Gallery {
    pub fn new(items: Vec<MediaItem>, options: GalleryOptions) -> Self {
        Self {
            items,
            options,
            active: 0,
            displayed: 0,
            pending: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn displayed(&self) -> usize {
        self.displayed
    }

    /// One-based counter for the displayed item, 0 for an empty gallery.
    pub fn counter(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.displayed + 1
        }
    }

    pub fn swap_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Activate thumbnail `index`. Out-of-range indices are ignored. A swap
    /// still fading is replaced by this one.
    pub fn select(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.items.len() {
            trace!(target: "gallery", index, len = self.items.len(), "select_out_of_range");
            return false;
        }
        self.active = index;
        self.pending = Some(PendingSwap {
            due: now + self.options.fade,
            index,
        });
        debug!(target: "gallery", index, "thumbnail_selected");
        true
    }

    /// Complete a due swap.
    pub fn poll(&mut self, now: Instant) -> Option<MediaSwap> {
        let pending = self.pending.filter(|p| now >= p.due)?;
        self.pending = None;
        let item = self.items.get(pending.index)?;
        self.displayed = pending.index;
        let main = match item.kind {
            MediaKind::Video => MainMedia::Video {
                src: item.src.clone(),
            },
            MediaKind::Image => MainMedia::Image {
                src: item.src.clone(),
            },
        };
        debug!(target: "gallery", index = pending.index, kind = ?item.kind, "main_media_swapped");
        Some(MediaSwap {
            index: pending.index,
            counter: pending.index + 1,
            main,
        })
    }

    /// Step to the neighbour of the displayed item. Returns `false` at either
    /// end.
    pub fn navigate(&mut self, direction: NavDirection, now: Instant) -> bool {
        let target = match direction {
            NavDirection::Next if self.displayed + 1 < self.items.len() => self.displayed + 1,
            NavDirection::Prev if self.displayed > 0 => self.displayed - 1,
            _ => return false,
        };
        self.select(target, now)
    }

    /// Horizontal touch gesture. Travel must exceed the swipe threshold;
    /// leftward travel (`start_x > end_x`) moves to the next item.
    pub fn swipe(&mut self, start_x: f32, end_x: f32, now: Instant) -> Option<NavDirection> {
        let diff = start_x - end_x;
        if !(diff.abs() > self.options.swipe_threshold) {
            trace!(target: "gallery", diff, "swipe_below_threshold");
            return None;
        }
        let direction = if diff > 0.0 {
            NavDirection::Next
        } else {
            NavDirection::Prev
        };
        self.navigate(direction, now).then_some(direction)
    }

    pub fn key(&mut self, key: NavKey, now: Instant) -> Option<NavDirection> {
        let direction = key.direction()?;
        self.navigate(direction, now).then_some(direction)
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            len: self.items.len(),
            active: self.active,
            displayed: self.displayed,
            counter: self.counter(),
            swap_pending: self.pending.is_some(),
        }
    }
}
