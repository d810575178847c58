//! # Blockfit
//!
//! A snap-to-grid assembly puzzle built on [`snap_engine`]: authored
//! multi-cell pieces, study conditions with different snap distances, and
//! completion-time recording. The binary target runs a scripted headless
//! session for exercising the whole stack without a renderer.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod shapes;
pub mod study;
