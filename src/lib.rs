//! Natural-language Q&A over oil prices, FX rates and weather.
//!
//! A question goes through three stages: pattern-based analysis into an
//! intent + parameter record, a data fetch that falls back to deterministic
//! synthetic data when live sources are unavailable, and response synthesis
//! (fixed templates, or a chat model when one is configured) that pairs the
//! answer text with a chart-ready payload.
//!
//! ```no_run
//! use market_query::config::AppConfig;
//! use market_query::core::orchestrator::QueryPipeline;
//!
//! # async fn demo() {
//! let pipeline = QueryPipeline::new(&AppConfig::from_env());
//! let result = pipeline.process("oil prices for the last 30 days").await;
//! println!("{}", result.response.text);
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod llm;
pub mod models;
pub mod profiles;
pub mod query;
pub mod response;

pub use crate::config::AppConfig;
pub use crate::core::orchestrator::QueryPipeline;
pub use crate::error::MarketQueryError;
pub use crate::models::{Answer, Intent, PipelineResult};
