//! Resume analysis: prompt packaging, the backend seam, response validation,
//! and derived metrics.

pub mod backend;
pub mod candidate;
pub mod formatter;
pub mod handlers;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod response;
