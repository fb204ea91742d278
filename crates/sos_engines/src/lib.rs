#![forbid(unsafe_code)]

pub mod achievement;
pub mod instructions;
pub mod keyword;
pub mod progress;
pub mod record_hash;
pub mod reward;
pub mod wake;
