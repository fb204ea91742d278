#![forbid(unsafe_code)]

pub mod achievements;
pub mod config;
pub mod contacts;
pub mod dispatch;
pub mod emergency;
pub mod training;
