//! Configuration loading and parsing.
//!
//! Parses `hostelkit.toml` (or an override path provided by the binary). Every
//! field has a default so a missing file, a missing table or a partially filled
//! table all yield a usable configuration. Unknown fields are ignored (TOML
//! deserialization tolerance).
//!
//! Values are not trusted blindly: [`Config::normalize`] clamps or reverts
//! anything the widgets cannot work with (zero page sizes, unordered
//! breakpoints, non-finite lengths) and logs each adjustment on the `config`
//! target. The raw parsed file is retained next to the normalized one.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Name of the configuration file looked up in the working directory and the
/// platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "hostelkit.toml";

/// How far a carousel moves per previous/next activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepPolicy {
    /// Jump by a full page (`PageSize` items).
    #[default]
    Page,
    /// Jump by a single item.
    Item,
}

impl StepPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepPolicy::Page => "page",
            StepPolicy::Item => "item",
        }
    }
}

/// Items visible at once per viewport class.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PageSizesConfig {
    #[serde(default = "PageSizesConfig::default_xs")]
    pub xs: usize,
    #[serde(default = "PageSizesConfig::default_s")]
    pub s: usize,
    #[serde(default = "PageSizesConfig::default_m")]
    pub m: usize,
    #[serde(default = "PageSizesConfig::default_l")]
    pub l: usize,
}

impl Default for PageSizesConfig {
    fn default() -> Self {
        Self {
            xs: Self::default_xs(),
            s: Self::default_s(),
            m: Self::default_m(),
            l: Self::default_l(),
        }
    }
}

impl PageSizesConfig {
    const fn default_xs() -> usize {
        2
    }
    const fn default_s() -> usize {
        2
    }
    const fn default_m() -> usize {
        3
    }
    const fn default_l() -> usize {
        4
    }
}

/// Inclusive upper bounds (CSS pixels) of the XS, S and M viewport classes.
/// Anything wider is L.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointsConfig {
    #[serde(default = "BreakpointsConfig::default_xs_max")]
    pub xs_max: u32,
    #[serde(default = "BreakpointsConfig::default_s_max")]
    pub s_max: u32,
    #[serde(default = "BreakpointsConfig::default_m_max")]
    pub m_max: u32,
}

impl Default for BreakpointsConfig {
    fn default() -> Self {
        Self {
            xs_max: Self::default_xs_max(),
            s_max: Self::default_s_max(),
            m_max: Self::default_m_max(),
        }
    }
}

impl BreakpointsConfig {
    const fn default_xs_max() -> u32 {
        480
    }
    const fn default_s_max() -> u32 {
        768
    }
    const fn default_m_max() -> u32 {
        1024
    }

    fn is_strictly_increasing(&self) -> bool {
        self.xs_max < self.s_max && self.s_max < self.m_max
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CarouselConfig {
    #[serde(default)]
    pub step: StepPolicy,
    /// Horizontal gap between cards, in CSS pixels.
    #[serde(default = "CarouselConfig::default_gap")]
    pub gap: f32,
    /// Card width used when the rendered card cannot be measured.
    #[serde(default = "CarouselConfig::default_fallback_item_width")]
    pub fallback_item_width: f32,
    #[serde(default = "CarouselConfig::default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub page_sizes: PageSizesConfig,
    #[serde(default)]
    pub breakpoints: BreakpointsConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            step: StepPolicy::default(),
            gap: Self::default_gap(),
            fallback_item_width: Self::default_fallback_item_width(),
            debounce_ms: Self::default_debounce_ms(),
            page_sizes: PageSizesConfig::default(),
            breakpoints: BreakpointsConfig::default(),
        }
    }
}

impl CarouselConfig {
    const fn default_gap() -> f32 {
        20.0
    }
    const fn default_fallback_item_width() -> f32 {
        280.0
    }
    const fn default_debounce_ms() -> u64 {
        150
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Delay between a thumbnail activation and the main media swap.
    #[serde(default = "GalleryConfig::default_fade_ms")]
    pub fade_ms: u64,
    /// Minimum horizontal travel (exclusive) for a touch gesture to count as
    /// a swipe.
    #[serde(default = "GalleryConfig::default_swipe_threshold")]
    pub swipe_threshold: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            fade_ms: Self::default_fade_ms(),
            swipe_threshold: Self::default_swipe_threshold(),
        }
    }
}

impl GalleryConfig {
    const fn default_fade_ms() -> u64 {
        150
    }
    const fn default_swipe_threshold() -> f32 {
        50.0
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FormsConfig {
    #[serde(default = "FormsConfig::default_bio_max")]
    pub bio_max: usize,
    /// Largest accepted profile picture, in bytes.
    #[serde(default = "FormsConfig::default_picture_max_bytes")]
    pub picture_max_bytes: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            bio_max: Self::default_bio_max(),
            picture_max_bytes: Self::default_picture_max_bytes(),
        }
    }
}

impl FormsConfig {
    const fn default_bio_max() -> usize {
        500
    }
    const fn default_picture_max_bytes() -> u64 {
        5 * 1024 * 1024
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Tick interval driving deadline expiry (debounce, fades).
    #[serde(default = "RuntimeConfig::default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::default_tick_ms(),
        }
    }
}

impl RuntimeConfig {
    const fn default_tick_ms() -> u64 {
        10
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub forms: FormsConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,      // original file string (optional)
    pub source: Option<PathBuf>,  // path the file was read from
    pub file: ConfigFile,         // parsed (or default) data, normalized in place
}

/// Best-effort config path: working directory first, then the platform config
/// dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("hostelkit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load configuration from `path` (or the discovered path). A missing or
/// malformed file yields defaults; the result is always normalized.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let mut cfg = match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Config {
                raw: Some(content),
                source: Some(path),
                file,
            },
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    };
    cfg.normalize();
    Ok(cfg)
}

impl Config {
    /// Clamp or revert values the widgets cannot use. Returns the number of
    /// adjustments made.
    pub fn normalize(&mut self) -> usize {
        let mut adjusted = 0;
        let carousel = &mut self.file.carousel;

        for (class, size) in [
            ("xs", &mut carousel.page_sizes.xs),
            ("s", &mut carousel.page_sizes.s),
            ("m", &mut carousel.page_sizes.m),
            ("l", &mut carousel.page_sizes.l),
        ] {
            if *size == 0 {
                info!(target: "config", class, raw = 0, clamped = 1, "page_size_clamped");
                *size = 1;
                adjusted += 1;
            }
        }

        if !carousel.breakpoints.is_strictly_increasing() {
            let raw = carousel.breakpoints;
            carousel.breakpoints = BreakpointsConfig::default();
            info!(
                target: "config",
                xs_max = raw.xs_max,
                s_max = raw.s_max,
                m_max = raw.m_max,
                "breakpoints_unordered_reverted"
            );
            adjusted += 1;
        }

        if !carousel.gap.is_finite() || carousel.gap < 0.0 {
            info!(target: "config", raw = carousel.gap, "gap_reverted");
            carousel.gap = CarouselConfig::default_gap();
            adjusted += 1;
        }

        if !carousel.fallback_item_width.is_finite() || carousel.fallback_item_width <= 0.0 {
            info!(target: "config", raw = carousel.fallback_item_width, "fallback_item_width_reverted");
            carousel.fallback_item_width = CarouselConfig::default_fallback_item_width();
            adjusted += 1;
        }

        let gallery = &mut self.file.gallery;
        if !gallery.swipe_threshold.is_finite() || gallery.swipe_threshold < 0.0 {
            info!(target: "config", raw = gallery.swipe_threshold, "swipe_threshold_reverted");
            gallery.swipe_threshold = GalleryConfig::default_swipe_threshold();
            adjusted += 1;
        }

        if self.file.runtime.tick_ms == 0 {
            info!(target: "config", raw = 0, clamped = 1, "tick_ms_clamped");
            self.file.runtime.tick_ms = 1;
            adjusted += 1;
        }

        adjusted
    }
}
