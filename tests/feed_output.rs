//! End-to-end tests for XML → output lines, in both formats.
//!
//! These go through the public `rss_parser` entry point only, so they pin
//! down the observable output contract rather than internal record shapes.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rss_reader::render::RenderError;
use rss_reader::{rss_parser, ReaderError};

const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Yahoo News - Latest News &amp; Headlines</title>
    <link>https://news.yahoo.com/rss/</link>
    <description>The latest news and headlines from Yahoo! News.</description>
    <language>en-US</language>
    <lastBuildDate>Mon, 20 Jun 2022 04:50:56 GMT</lastBuildDate>
    <category>World</category>
    <category> Politics </category>
    <item>
      <title>First story</title>
      <link>https://news.yahoo.com/first.html</link>
      <pubDate>Mon, 20 Jun 2022 04:10:00 GMT</pubDate>
      <author>Reporter One</author>
      <category>World</category>
      <description>Summary of the first story.</description>
    </item>
    <item>
      <title>Second story</title>
      <link>https://news.yahoo.com/second.html</link>
    </item>
    <item>
      <title>Third story</title>
    </item>
  </channel>
</rss>"#;

fn feed_with_items(n: usize) -> String {
    let mut xml = String::from("<rss><channel><title>T</title><link>http://t</link>");
    for i in 0..n {
        xml.push_str(&format!("<item><title>Item {i}</title></item>"));
    }
    xml.push_str("</channel></rss>");
    xml
}

fn title_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter(|l| l.starts_with("Title: "))
        .map(String::as_str)
        .collect()
}

#[test]
fn test_text_output_for_sample_feed() {
    let lines = rss_parser(SAMPLE_FEED, Some(2), false).unwrap();
    assert_eq!(
        lines,
        vec![
            "Feed: Yahoo News - Latest News & Headlines",
            "Link: https://news.yahoo.com/rss/",
            "Last Build Date: Mon, 20 Jun 2022 04:50:56 GMT",
            "Language: en-US",
            "Categories: ['World', 'Politics']",
            "Description: The latest news and headlines from Yahoo! News.",
            " ",
            "Title: First story",
            "Author: Reporter One",
            "Published: Mon, 20 Jun 2022 04:10:00 GMT",
            "Link: https://news.yahoo.com/first.html",
            "Categories: World",
            " ",
            "Summary of the first story.",
            " ",
            " ",
            "Title: Second story",
            "Link: https://news.yahoo.com/second.html",
            " ",
            " ",
        ]
    );
}

#[test]
fn test_json_output_for_sample_feed() {
    let lines = rss_parser(SAMPLE_FEED, None, true).unwrap();
    assert_eq!(lines.len(), 1);

    let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    let object = value.as_object().unwrap();
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    let mut expected_keys = vec![
        "title",
        "link",
        "lastBuildDate",
        "language",
        "category",
        "description",
        "items",
    ];
    expected_keys.sort_unstable();
    let mut sorted_keys = keys.clone();
    sorted_keys.sort_unstable();
    assert_eq!(sorted_keys, expected_keys);

    assert_eq!(value["category"], "WorldPolitics");
    assert_eq!(value["items"].as_array().unwrap().len(), 3);
    assert_eq!(value["items"][0]["category"], serde_json::json!(["World"]));
    assert!(value["items"][2].get("link").is_none());
}

#[test]
fn test_json_channel_keys_in_fixed_order() {
    let lines = rss_parser(SAMPLE_FEED, Some(1), true).unwrap();
    let json = &lines[0];
    let positions: Vec<usize> = [
        "\"title\"",
        "\"link\"",
        "\"lastBuildDate\"",
        "\"language\"",
        "\"category\"",
        "\"description\"",
        "\"items\"",
    ]
    .iter()
    .map(|k| json.find(k).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(json.starts_with("{\n  \"title\": "));
}

#[test]
fn test_spec_example_limit_one() {
    let xml = "<rss><channel><title>Example</title><link>http://x</link>\
               <item><title>A</title></item><item><title>B</title></item></channel></rss>";
    let lines = rss_parser(xml, Some(1), false).unwrap();
    assert_eq!(
        lines,
        vec!["Feed: Example", "Link: http://x", " ", "Title: A", " ", " "]
    );
}

#[test]
fn test_missing_title_fails_in_text_but_not_json() {
    let xml = "<rss><channel><link>http://x</link><item><title>A</title></item></channel></rss>";

    let err = rss_parser(xml, None, false).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::Render(RenderError::MissingField("title"))
    ));

    let lines = rss_parser(xml, None, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert!(value.get("title").is_none());
    assert_eq!(value["link"], "http://x");
}

#[test]
fn test_pub_date_comes_from_pud_date_tag() {
    let xml = "<rss><channel><title>T</title><link>L</link>\
               <pubDate>ignored</pubDate><pudDate>kept</pudDate></channel></rss>";

    let lines = rss_parser(xml, None, false).unwrap();
    assert!(lines.contains(&"Publish Date: kept".to_string()));
    assert!(!lines.iter().any(|l| l.contains("ignored")));

    let json = rss_parser(xml, None, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json[0]).unwrap();
    assert_eq!(value["pubDate"], "kept");
}

#[test]
fn test_missing_channel_is_parse_error() {
    let err = rss_parser("<rss></rss>", None, false).unwrap_err();
    assert!(matches!(err, ReaderError::Parse(_)));
}

#[test]
fn test_malformed_xml_is_parse_error() {
    let err = rss_parser("<rss><channel>", None, true).unwrap_err();
    assert!(matches!(err, ReaderError::Parse(_)));
}

#[test]
fn test_crlf_feed_prints_plain_newlines() {
    let xml = "<?xml version=\"1.0\"?>\r\n<rss><channel>\r\n<title>T</title><link>L</link>\r\n\
               <item><title>A</title><description>one\r\ntwo</description></item>\r\n\
               </channel></rss>\r\n";

    let lines = rss_parser(xml, None, false).unwrap();
    assert!(lines.contains(&"one\ntwo".to_string()));
    assert!(!lines.iter().any(|l| l.contains('\r')));

    let json = rss_parser(xml, None, true).unwrap();
    assert!(json[0].contains(r#""description": "one\ntwo""#));
}

#[test]
fn test_default_namespace_feed_has_no_channel() {
    let xml = r#"<rss xmlns="http://purl.org/rss/1.0/"><channel><title>T</title></channel></rss>"#;
    let err = rss_parser(xml, None, true).unwrap_err();
    assert!(matches!(err, ReaderError::Parse(_)));
}

#[test]
fn test_unquoted_attribute_is_parse_error() {
    let xml = "<rss version=2.0><channel><title>T</title><link>L</link></channel></rss>";
    let err = rss_parser(xml, None, false).unwrap_err();
    assert!(matches!(err, ReaderError::Parse(_)));
}

proptest! {
    #[test]
    fn prop_text_item_count_matches_selection(n in 0usize..20, limit in proptest::option::of(0usize..25)) {
        let lines = rss_parser(&feed_with_items(n), limit, false).unwrap();
        let expected = match limit {
            Some(l) if l > 0 => l.min(n),
            _ => n,
        };
        let titles = title_lines(&lines);
        prop_assert_eq!(titles.len(), expected);
        for (i, title) in titles.iter().enumerate() {
            prop_assert_eq!(*title, format!("Title: Item {i}"));
        }
    }

    #[test]
    fn prop_json_item_count_matches_selection(n in 0usize..20, limit in proptest::option::of(0usize..25)) {
        let lines = rss_parser(&feed_with_items(n), limit, true).unwrap();
        prop_assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let expected = match limit {
            Some(l) if l > 0 => l.min(n),
            _ => n,
        };
        prop_assert_eq!(value["items"].as_array().unwrap().len(), expected);
    }

    #[test]
    fn prop_zero_limit_same_as_none(n in 0usize..10, json in any::<bool>()) {
        let xml = feed_with_items(n);
        prop_assert_eq!(
            rss_parser(&xml, Some(0), json).unwrap(),
            rss_parser(&xml, None, json).unwrap()
        );
    }
}
