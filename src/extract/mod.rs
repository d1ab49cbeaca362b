// src/extract/mod.rs
//! Turning one rendered job card into a candidate record

pub mod card;
pub mod dates;
pub mod resolver;

pub use card::{extract_card, CardOutcome, FieldSelectors, SkipReason};
pub use dates::{local_today, normalize_date_at};
pub use resolver::{is_placeholder, resolve_text};
