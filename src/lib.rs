// src/lib.rs
pub mod autocast;
pub mod config;
pub mod error;
pub mod models;
pub mod param_resolver;
pub mod run_dir;
pub mod snapshot;
pub mod validation;
pub mod yaml_parser;

pub use autocast::{coerce, infer};
pub use error::{CastError, ResolveError};
pub use models::{ParamEntry, ParamMap, ParamReference, ParamValue, RunMetadata, ScalarValue};
pub use param_resolver::{ResolvedRun, parse_run_metadata, resolve};
