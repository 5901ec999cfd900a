pub mod catalog;
pub mod config;
pub mod fulfillment;
pub mod matcher;
pub mod rewrite;

pub use catalog::{Catalog, CatalogError, Product};
pub use fulfillment::{DisplayStrategy, FormatterSettings, WebhookReply};
pub use matcher::{MatchQuality, MatchSet, SearchOutcome};
