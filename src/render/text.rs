use super::{join_categories, RenderError};
use crate::feed::{Channel, Item, Text};

/// Separator line emitted around each item.
const SEPARATOR: &str = " ";

/// Placeholder printed for a tag that is present but has no text.
const NULL_TEXT: &str = "None";

fn display(text: &Text) -> &str {
    text.as_deref().unwrap_or(NULL_TEXT)
}

fn required<'a>(value: &'a Option<Text>, name: &'static str) -> Result<&'a str, RenderError> {
    value
        .as_ref()
        .map(display)
        .ok_or(RenderError::MissingField(name))
}

/// Renders the channel header followed by one block per selected item.
pub(super) fn render_text(channel: &Channel, items: &[Item]) -> Result<Vec<String>, RenderError> {
    let mut lines = Vec::new();

    lines.push(format!("Feed: {}", required(&channel.title, "title")?));
    lines.push(format!("Link: {}", required(&channel.link, "link")?));

    if let Some(v) = &channel.last_build_date {
        lines.push(format!("Last Build Date: {}", display(v)));
    }
    if let Some(v) = &channel.pub_date {
        lines.push(format!("Publish Date: {}", display(v)));
    }
    if let Some(v) = &channel.language {
        lines.push(format!("Language: {}", display(v)));
    }
    if let Some(categories) = &channel.category {
        lines.push(format!("Categories: {}", bracketed_list(categories)));
    }
    if let Some(v) = &channel.managing_editor {
        lines.push(format!("Editor: {}", display(v)));
    }
    if let Some(v) = &channel.description {
        lines.push(format!("Description: {}", display(v)));
    }

    for item in items {
        render_item(item, &mut lines)?;
    }

    Ok(lines)
}

fn render_item(item: &Item, lines: &mut Vec<String>) -> Result<(), RenderError> {
    lines.push(SEPARATOR.to_string());
    lines.push(format!("Title: {}", required(&item.title, "title")?));

    if let Some(v) = &item.author {
        lines.push(format!("Author: {}", display(v)));
    }
    if let Some(v) = &item.pub_date {
        lines.push(format!("Published: {}", display(v)));
    }
    if let Some(v) = &item.link {
        lines.push(format!("Link: {}", display(v)));
    }
    if let Some(categories) = &item.category {
        lines.push(format!(
            "Categories: {}",
            join_categories(categories, ", ", "item")?
        ));
    }

    lines.push(SEPARATOR.to_string());
    if let Some(description) = &item.description {
        let text = description.as_ref().ok_or(RenderError::NullDescription)?;
        lines.push(text.clone());
    }
    lines.push(SEPARATOR.to_string());
    Ok(())
}

/// Renders a category list as `['a', 'b', None]`.
fn bracketed_list(values: &[Text]) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|v| match v {
            Some(s) => quote(s),
            None => NULL_TEXT.to_string(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Quotes a string with single quotes, switching to double quotes when the
/// value contains a single quote but no double quote.
fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => out.push_str(&escape_code_point(c)),
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

fn escape_code_point(c: char) -> String {
    match c as u32 {
        n @ 0..=0xff => format!("\\x{n:02x}"),
        n @ 0x100..=0xffff => format!("\\u{n:04x}"),
        n => format!("\\U{n:08x}"),
    }
}

/// Whether a character is shown as-is inside a quoted list entry.
///
/// Control, format, private-use and separator characters are escaped; the
/// ASCII space is the only separator kept literally. Unassigned code points
/// are not tracked and print as-is.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        c as u32,
        // Cc
        0x00..=0x1f | 0x7f..=0x9f
        // Zs, Zl, Zp
        | 0xa0 | 0x1680 | 0x2000..=0x200a | 0x2028 | 0x2029 | 0x202f | 0x205f | 0x3000
        // Cf
        | 0xad | 0x600..=0x605 | 0x61c | 0x6dd | 0x70f | 0x890..=0x891 | 0x8e2 | 0x180e
        | 0x200b..=0x200f | 0x202a..=0x202e | 0x2060..=0x2064 | 0x2066..=0x206f
        | 0xfeff | 0xfff9..=0xfffb | 0x110bd | 0x110cd | 0x13430..=0x1343f
        | 0x1bca0..=0x1bca3 | 0x1d173..=0x1d17a | 0xe0001 | 0xe0020..=0xe007f
        // Co
        | 0xe000..=0xf8ff | 0xf0000..=0xffffd | 0x100000..=0x10fffd
    )
}
