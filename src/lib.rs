//! # codesearch
//!
//! A small web front end for GitHub code search.
//!
//! A keyword and a language go to the GitHub code search API (first page
//! only). The raw hits are refined by [`code_refine`]: hits whose fragments
//! lack the literal keyword are dropped, and the rest are re-ranked by the
//! star count of their repository, using a bounded number of lookups. The
//! result is rendered as a plain HTML page.
//!
//! - [`config`]: TOML configuration and credential lookup
//! - [`server`]: axum router and request handling
//! - [`page`]: HTML rendering

pub mod config;
pub mod error;
pub mod page;
pub mod server;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use server::{AppState, router, serve};
