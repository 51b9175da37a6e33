// src/collect/providers/mod.rs
pub mod rss;

pub use rss::RssSource;
