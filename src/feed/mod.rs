//! Feed retrieval and extraction.
//!
//! - [`fetcher`] - HTTP retrieval with timeout, retry and size limits
//! - [`parser`] - XML to channel/item records using `quick-xml`
//! - [`types`] - the records themselves
//!
//! # Example
//!
//! ```ignore
//! use rss_reader::feed::{fetch_feed, parse_feed, FetchOptions};
//!
//! let xml = fetch_feed(&client, "https://example.com/feed.xml", &FetchOptions::default()).await?;
//! let feed = parse_feed(&xml)?;
//! println!("{} items", feed.items.len());
//! ```

mod fetcher;
mod parser;
mod types;

pub use fetcher::{build_client, fetch_feed, FetchError, FetchOptions};
pub use parser::{parse_feed, ParseError, MAX_XML_DEPTH};
pub use types::{Channel, Item, ItemField, ParsedFeed, Text};
