#![forbid(unsafe_code)]

pub mod repo;
pub mod state;
