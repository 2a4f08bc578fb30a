//! Domain model for the outreach assistant: accounts, enrichment bundles,
//! recommendation output and the pure logic that shapes them.

pub mod accounts;
pub mod activity;
pub mod error;
pub mod prompts;
pub mod recommendations;
pub mod reshape;
pub mod search;
pub mod styles;
