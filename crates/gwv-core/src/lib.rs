pub mod config;
pub mod logging;

pub mod cache;
pub mod checksum;
pub mod checksums;
pub mod remote;
pub mod scan;
pub mod validate;

pub use validate::{find_invalid_wrapper_jars, ValidationOptions, ValidationResult, Validator};
