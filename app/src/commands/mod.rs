//! Command handlers.

pub mod links;
pub mod queue;
pub mod records;
pub mod scrape;
pub mod sites;
