//! Namer.
//!
//! Turns a merged record into concrete, filesystem-safe output paths,
//! shortening titles at punctuation boundaries when the resulting paths
//! would exceed the platform limit.

mod chunk;
mod config;
mod plan;
mod sanitize;
mod template;
mod types;

pub use chunk::split_by_punctuation;
pub use config::{CensorLabels, NamerConfig, NamingDefaults, Platform};
pub use plan::Namer;
pub use sanitize::sanitize;
pub use template::{Template, TemplateError, KNOWN_KEYS};
pub use types::NamingPlan;
