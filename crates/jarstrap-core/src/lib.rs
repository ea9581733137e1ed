//! Core library for the jarstrap launcher toolkit.
//!
//! jarstrap turns a Java archive into a native launcher by patching a C source
//! template and compiling it. This crate holds the template-patching engine and
//! everything around it that does not shell out:
//!
//! - [`window`]: single-pass, marker-delimited patch window engine
//! - [`declaration`]: codec for the `static const` configuration declarations
//! - [`byte_array`]: streaming renderer for the embedded `ARCHIVE_DATA[]` literal
//! - [`config_patch`] / [`archive_patch`]: the two passes run over a template
//! - [`defaults`]: read-only scan of a template's current configuration
//! - [`params`]: launcher parameters, validation, JSON parameter files
//! - [`toolchain`]: build variants and the [`toolchain::BuildToolchain`] trait
//!
//! The CMake + make toolchain lives in
//! [`jarstrap_cmake`](https://docs.rs/jarstrap-cmake).

pub mod archive_patch;
pub mod byte_array;
pub mod config_patch;
pub mod declaration;
pub mod defaults;
pub mod error;
pub mod fsutil;
pub mod params;
pub mod project;
pub mod templates;
pub mod toolchain;
pub mod window;
