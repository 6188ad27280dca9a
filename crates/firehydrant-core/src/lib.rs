//! # firehydrant-core
//!
//! Core types and utilities for working with the FireHydrant API.
//!
//! ## Modules
//!
//! - [`error`] - Error type, error codes and conversions
//! - [`id`] - Strongly-typed resource identifiers
//! - [`config`] - Client configuration
//! - [`query`] - Query parameter builder and the [`QueryValueEncoder`] capability
//! - [`labels`] - Label selectors and their canonical encoding

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod id;
pub mod labels;
pub mod query;

// Re-export commonly used types
pub use error::{Error, Result};
pub use labels::{LabelEncoding, LabelsSelector};
pub use query::{EncodedParameters, QueryParams, QueryValueEncoder};
