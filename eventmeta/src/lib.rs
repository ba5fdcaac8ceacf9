//! # eventmeta: analytics event metadata
//!
//! `eventmeta` describes a single analytics event (a detected object, its attributes,
//! and the state derived by downstream analytics) and converts it into wire payloads.
//!
//! ## Overview
//!
//! - **Model**: strongly typed primitives, a closed set of object variants plus an
//!   opaque `Custom` arm, and the [`Event`] envelope that ties them together.
//! - **Converters**: the [`Converter`] trait and the built-in JSON, minimal JSON and
//!   protobuf encodings, each with a matching decoder.
//! - **Registry**: binds [`PayloadFormat`] ids to converters, including custom
//!   converters registered at startup under the `<prefix>_<tag>` naming contract.
//! - **Coding**: a small length-prefixed framing so payloads can share a byte stream.
mod config;
mod error;
mod format;
mod model;
mod registry;

pub mod coding;
pub mod convert;

pub use config::*;
pub use convert::{Converter, Decoder};
pub use error::*;
pub use format::*;
pub use model::*;
pub use registry::*;
