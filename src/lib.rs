//! Command-line RSS reader.
//!
//! Fetches an RSS document, extracts the channel and its items, and renders
//! them either as human-readable text or as a pretty-printed JSON document.
//!
//! ```
//! let xml = "<rss><channel><title>Example</title><link>http://x</link>\
//!            <item><title>A</title></item><item><title>B</title></item>\
//!            </channel></rss>";
//!
//! let lines = rss_reader::rss_parser(xml, Some(1), false).unwrap();
//! assert_eq!(lines, vec!["Feed: Example", "Link: http://x", " ", "Title: A", " ", " "]);
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod render;
pub mod util;

pub use config::Config;
pub use error::{ReaderError, UnhandledError};
pub use render::OutputFormat;

/// Parses an RSS document and renders it as output lines.
///
/// `limit` caps the number of items; `None` and `Some(0)` both select every
/// item. With `json` set, the result holds exactly one element: the whole
/// pretty-printed document.
pub fn rss_parser(xml: &str, limit: Option<usize>, json: bool) -> Result<Vec<String>, ReaderError> {
    let feed = feed::parse_feed(xml)?;
    let lines = render::render(&feed, limit, OutputFormat::from_json_flag(json))?;
    Ok(lines)
}

/// Fetches the feed at `source` and renders it.
///
/// Every failure (bad URL, transport, XML, rendering) is reported as a
/// single [`UnhandledError`].
pub async fn read_feed(
    client: &reqwest::Client,
    source: &str,
    config: &Config,
    limit: Option<usize>,
    json: bool,
) -> Result<Vec<String>, UnhandledError> {
    let url = util::validate_url(source, config.allow_private_hosts).map_err(ReaderError::from)?;
    tracing::info!(url = %url, limit = ?limit, json = json, "Reading feed");

    let xml = feed::fetch_feed(client, url.as_str(), &feed::FetchOptions::from(config))
        .await
        .map_err(ReaderError::from)?;

    Ok(rss_parser(&xml, limit, json)?)
}
