//! Output rendering for parsed feeds.
//!
//! A parsed feed becomes an ordered sequence of output lines:
//!
//! - [`OutputFormat::Json`]: a single element holding the pretty-printed
//!   JSON document (see [`json`])
//! - [`OutputFormat::Text`]: one element per human-readable line (see [`text`])
//!
//! Both formats apply the same item selection through [`select_items`].

mod json;
mod text;

use thiserror::Error;

use crate::feed::{Item, ParsedFeed};

/// Errors raised while rendering a parsed feed.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A field required by text output (channel `title`/`link`, item `title`) is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A category list being joined contains an empty `<category>`.
    #[error("Cannot join categories: empty <category> element in {0}")]
    NullCategory(&'static str),

    /// An item has a `<description>` tag with no text.
    #[error("Cannot render item description: <description> element is empty")]
    NullDescription,

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Selects the items to render.
///
/// A limit of `0` behaves exactly like no limit. A limit larger than the
/// item count selects everything.
pub fn select_items(items: &[Item], limit: Option<usize>) -> &[Item] {
    match limit {
        Some(n) if n > 0 => &items[..n.min(items.len())],
        _ => items,
    }
}

/// Renders a parsed feed into output lines.
///
/// # Errors
///
/// See [`RenderError`]. Text output requires the channel to carry `title`
/// and `link`; JSON output includes them only when present.
pub fn render(
    feed: &ParsedFeed,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<Vec<String>, RenderError> {
    let items = select_items(&feed.items, limit);
    tracing::debug!(
        selected = items.len(),
        total = feed.items.len(),
        format = ?format,
        "Rendering feed"
    );

    match format {
        OutputFormat::Json => Ok(vec![json::render_json(&feed.channel, items)?]),
        OutputFormat::Text => text::render_text(&feed.channel, items),
    }
}

/// Joins a category list, failing on empty `<category>` entries.
fn join_categories(
    categories: &[Option<String>],
    separator: &str,
    owner: &'static str,
) -> Result<String, RenderError> {
    let parts = categories
        .iter()
        .map(|c| c.as_deref().ok_or(RenderError::NullCategory(owner)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(separator))
}
