#![allow(clippy::single_component_path_imports)]

//! `s3dat-rs` reads the graphics containers of a classic late-90s strategy
//! game: monolithic `.dat` bundles of sprite sequences, overlay tables, and
//! animation scripts. The reader validates the container directory up front
//! and decodes images lazily through pluggable per-category bitmap
//! translators.
//!
//! See [`DatFile`](prelude::DatFile) for the container API and
//! [`compose_animation`](prelude::compose_animation) for turning animation
//! scripts into drawable frames.

pub use s3dat_internal::*;
