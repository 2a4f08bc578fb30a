//! Orchestration over the provider traits. Handlers stay thin and call in here.

pub mod accounts;
pub mod composer;
pub mod contacts;
pub mod enrichment;
pub mod generation;
pub mod sender;
pub mod web_search;
