//! dpviet - Vietnamese Slang Localization for Subtitle Scripts
//!
//! Rewrites the dialogue of subtitle (.srt) and plain-text scripts with fixed
//! lexicon, pronoun and tone-ending rules in Ho Chi Minh City style, leaving
//! blank lines, indices and timecodes untouched.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod report;
pub mod subtitle;
pub mod translate;
pub mod workflow;

pub use config::Config;
pub use document::{DocumentRewriter, RewrittenDocument};
pub use error::{DpVietError, Result};
pub use subtitle::{classify, LineKind};
