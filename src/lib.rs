pub mod common;
pub mod errors;
pub mod extractor;
pub mod plan;

pub mod database;
pub mod services;
