//! Core functionality for tagsift
//!
//! This crate contains the tag extraction engine and the code review
//! platform clients used by the tagsift CLI.

pub mod platform;
pub mod tags;
