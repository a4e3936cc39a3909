//! Passage analyzer: sends an English passage to a hosted language model and
//! renders the returned JSON analysis as an HTML report.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
