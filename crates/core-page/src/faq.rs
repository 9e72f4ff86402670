//! FAQ accordion with a live search filter.
//!
//! Opening a question closes whichever one was open, so at most one answer
//! is expanded. The search box hides items whose question and answer both
//! miss the term; matching ignores case and an empty term shows everything.

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

impl FaqItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    fn matches(&self, term: &str) -> bool {
        self.question.to_lowercase().contains(term) || self.answer.to_lowercase().contains(term)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FaqParseError {
    #[error("faq entry {0:?} must look like `question|answer`")]
    MissingSeparator(String),
    #[error("faq entry has an empty question")]
    EmptyQuestion,
}

/// Parses `question|answer`.
impl FromStr for FaqItem {
    type Err = FaqParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (question, answer) = s
            .split_once('|')
            .ok_or_else(|| FaqParseError::MissingSeparator(s.to_string()))?;
        let question = question.trim();
        if question.is_empty() {
            return Err(FaqParseError::EmptyQuestion);
        }
        Ok(Self::new(question, answer.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqSnapshot {
    pub len: usize,
    pub open: Option<usize>,
    pub visible: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct Faq {
    items: Vec<FaqItem>,
    open: Option<usize>,
    /// Lowercased search term.
    term: String,
}

impl Faq {
    pub fn new(items: Vec<FaqItem>) -> Self {
        Self {
            items,
            open: None,
            term: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    /// Flip item `index`, closing any other open item. Returns the item's new
    /// state, or `None` for an out-of-range index.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        if index >= self.items.len() {
            trace!(target: "page.faq", index, len = self.items.len(), "toggle_out_of_range");
            return None;
        }
        let now_open = self.open != Some(index);
        self.open = now_open.then_some(index);
        debug!(target: "page.faq", index, open = now_open, "faq_toggled");
        Some(now_open)
    }

    /// Apply the search box contents. Returns how many items stay visible.
    pub fn search(&mut self, term: &str) -> usize {
        self.term = term.to_lowercase();
        let visible = self.visible().count();
        debug!(target: "page.faq", term, visible, "faq_filtered");
        visible
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|item| item.matches(&self.term))
    }

    /// Indices of the items the current term leaves on screen.
    pub fn visible(&self) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&self.term))
            .map(|(i, _)| i)
    }

    pub fn snapshot(&self) -> FaqSnapshot {
        FaqSnapshot {
            len: self.items.len(),
            open: self.open,
            visible: self.visible().collect(),
        }
    }
}
