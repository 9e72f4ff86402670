//! Viewport classes and the tables keyed by them.

use core_config::{BreakpointsConfig, PageSizesConfig};
use serde::Serialize;

/// Discrete bucket of viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Xs,
    S,
    M,
    L,
}

impl ViewportClass {
    pub const ALL: [ViewportClass; 4] = [
        ViewportClass::Xs,
        ViewportClass::S,
        ViewportClass::M,
        ViewportClass::L,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportClass::Xs => "xs",
            ViewportClass::S => "s",
            ViewportClass::M => "m",
            ViewportClass::L => "l",
        }
    }
}

/// Inclusive upper bounds of the XS, S and M classes. Invariant:
/// `xs_max < s_max < m_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    xs_max: u32,
    s_max: u32,
    m_max: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            xs_max: 480,
            s_max: 768,
            m_max: 1024,
        }
    }
}

impl Breakpoints {
    /// Build from explicit bounds. Returns `None` unless strictly increasing.
    pub fn new(xs_max: u32, s_max: u32, m_max: u32) -> Option<Self> {
        (xs_max < s_max && s_max < m_max).then_some(Self {
            xs_max,
            s_max,
            m_max,
        })
    }

    /// Unordered bounds fall back to the defaults (config normalization
    /// already reverts them, this keeps direct callers honest too).
    pub fn from_config(cfg: &BreakpointsConfig) -> Self {
        Self::new(cfg.xs_max, cfg.s_max, cfg.m_max).unwrap_or_default()
    }

    #[must_use]
    pub fn classify(&self, width: u32) -> ViewportClass {
        if width <= self.xs_max {
            ViewportClass::Xs
        } else if width <= self.s_max {
            ViewportClass::S
        } else if width <= self.m_max {
            ViewportClass::M
        } else {
            ViewportClass::L
        }
    }
}

/// Cards visible at once per viewport class. Every entry is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeTable {
    sizes: [usize; 4],
}

impl Default for PageSizeTable {
    fn default() -> Self {
        Self { sizes: [2, 2, 3, 4] }
    }
}

impl PageSizeTable {
    /// Zero entries are raised to 1.
    pub fn new(xs: usize, s: usize, m: usize, l: usize) -> Self {
        Self {
            sizes: [xs.max(1), s.max(1), m.max(1), l.max(1)],
        }
    }

    pub fn from_config(cfg: &PageSizesConfig) -> Self {
        Self::new(cfg.xs, cfg.s, cfg.m, cfg.l)
    }

    pub fn get(&self, class: ViewportClass) -> usize {
        self.sizes[class as usize]
    }
}
