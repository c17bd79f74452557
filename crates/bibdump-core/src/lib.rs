pub mod config;
pub mod error;
pub mod logging;

// Pipeline stages, in run order.
pub mod index;
pub mod download;
pub mod extract;
pub mod tidy;

pub mod http;
pub mod pipeline;
pub mod url_model;
