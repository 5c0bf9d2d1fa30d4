//! Pressroom document service
//!
//! Typesets LaTeX file sets and assembles PDFs and images into a single PDF,
//! each request in its own scratch workspace, by driving latexmk, qpdf and
//! ImageMagick.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
