use serde::Serialize;

use super::{join_categories, RenderError};
use crate::feed::{Channel, Item, Text};

/// JSON document layout: channel fields in fixed order, then `items`.
///
/// Absent channel fields are skipped; present-but-empty ones serialize as
/// `null`. The channel category is flattened into a single string while
/// item categories stay lists.
#[derive(Serialize)]
struct FeedDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<Option<&'a str>>,
    #[serde(rename = "lastBuildDate", skip_serializing_if = "Option::is_none")]
    last_build_date: Option<Option<&'a str>>,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub_date: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(rename = "managingEditor", skip_serializing_if = "Option::is_none")]
    managing_editor: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Option<&'a str>>,
    items: &'a [Item],
}

fn field(value: &Option<Text>) -> Option<Option<&str>> {
    value.as_ref().map(|t| t.as_deref())
}

/// Serializes the channel and selected items as pretty-printed JSON
/// (two-space indent, non-ASCII characters written as-is).
pub(super) fn render_json(channel: &Channel, items: &[Item]) -> Result<String, RenderError> {
    let category = channel
        .category
        .as_deref()
        .map(|c| join_categories(c, "", "channel"))
        .transpose()?;

    let document = FeedDocument {
        title: field(&channel.title),
        link: field(&channel.link),
        last_build_date: field(&channel.last_build_date),
        pub_date: field(&channel.pub_date),
        language: field(&channel.language),
        category,
        managing_editor: field(&channel.managing_editor),
        description: field(&channel.description),
        items,
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_feed;

    fn render(xml: &str) -> Result<String, RenderError> {
        let feed = parse_feed(xml).unwrap();
        render_json(&feed.channel, &feed.items)
    }

    #[test]
    fn test_keys_in_fixed_order_and_only_when_present() {
        let json = render(
            "<rss><channel>\
             <description>D</description><language>en</language><title>T</title>\
             </channel></rss>",
        )
        .unwrap();
        let expected = "{\n  \"title\": \"T\",\n  \"language\": \"en\",\n  \"description\": \"D\",\n  \"items\": []\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_channel_category_concatenated() {
        let json = render(
            "<rss><channel><category>News</category><category> Tech </category></channel></rss>",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["category"], "NewsTech");
    }

    #[test]
    fn test_channel_null_category_fails() {
        let result = render("<rss><channel><category>News</category><category/></channel></rss>");
        assert!(matches!(result, Err(RenderError::NullCategory("channel"))));
    }

    #[test]
    fn test_empty_tag_serializes_as_null() {
        let json = render("<rss><channel><title/></channel></rss>").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["title"].is_null());
        assert!(value.as_object().unwrap().contains_key("title"));
    }

    #[test]
    fn test_items_verbatim_with_category_list() {
        let json = render(
            "<rss><channel><item>\
             <link>http://a</link><title>A</title><category>x</category><category/>\
             </item></channel></rss>",
        )
        .unwrap();
        let expected = r#"{
  "items": [
    {
      "link": "http://a",
      "title": "A",
      "category": [
        "x",
        null
      ]
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_non_ascii_not_escaped() {
        let json = render("<rss><channel><title>Новости ü 日本</title></channel></rss>").unwrap();
        assert!(json.contains("Новости ü 日本"));
    }
}
