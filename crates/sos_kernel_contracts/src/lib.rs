#![forbid(unsafe_code)]

pub mod achievement;
pub mod common;
pub mod contact;
pub mod emergency;
pub mod progress;
pub mod reward;

pub use common::{ContractViolation, SchemaVersion, Validate};
