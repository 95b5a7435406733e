use serde::ser::{Serialize, SerializeMap, Serializer};

/// Text content of a recognized tag.
///
/// `None` means the tag was present but carried no text (`<title/>` or
/// `<title></title>`). Absence of the tag itself is modelled one level up,
/// as `Option<Text>` on the record.
pub type Text = Option<String>;

/// Feed-level metadata read from the direct children of `<channel>`.
///
/// Every field is `None` unless its tag appeared at least once. For all
/// fields except `category` the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub title: Option<Text>,
    pub link: Option<Text>,
    pub last_build_date: Option<Text>,
    /// Sourced from a `<pudDate>` tag, not `<pubDate>`.
    pub pub_date: Option<Text>,
    pub language: Option<Text>,
    /// Trimmed text of every `<category>`, in document order.
    pub category: Option<Vec<Text>>,
    pub managing_editor: Option<Text>,
    pub description: Option<Text>,
}

impl Channel {
    /// Records the text of one direct child of `<channel>`.
    ///
    /// Returns `false` for tags that are not part of the channel record.
    pub(crate) fn record(&mut self, tag: &[u8], text: Text) -> bool {
        match tag {
            b"title" => self.title = Some(text),
            b"link" => self.link = Some(text),
            b"lastBuildDate" => self.last_build_date = Some(text),
            b"pudDate" => self.pub_date = Some(text),
            b"language" => self.language = Some(text),
            b"category" => self
                .category
                .get_or_insert_with(Vec::new)
                .push(trim_category(text)),
            b"managingEditor" => self.managing_editor = Some(text),
            b"description" => self.description = Some(text),
            _ => return false,
        }
        true
    }
}

/// Keys an [`Item`] can carry, in the spelling used for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Author,
    PubDate,
    Link,
    Category,
    Description,
}

impl ItemField {
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Self::Title),
            b"author" => Some(Self::Author),
            b"pubDate" => Some(Self::PubDate),
            b"link" => Some(Self::Link),
            b"category" => Some(Self::Category),
            b"description" => Some(Self::Description),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::PubDate => "pubDate",
            Self::Link => "link",
            Self::Category => "category",
            Self::Description => "description",
        }
    }
}

/// One `<item>` of a channel.
///
/// Besides the field values, an item remembers the order in which its keys
/// first appeared so that JSON output lists them the same way the source
/// document did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: Option<Text>,
    pub author: Option<Text>,
    pub pub_date: Option<Text>,
    pub link: Option<Text>,
    pub category: Option<Vec<Text>>,
    pub description: Option<Text>,
    order: Vec<ItemField>,
}

impl Item {
    pub(crate) fn record(&mut self, field: ItemField, text: Text) {
        if !self.order.contains(&field) {
            self.order.push(field);
        }
        match field {
            ItemField::Title => self.title = Some(text),
            ItemField::Author => self.author = Some(text),
            ItemField::PubDate => self.pub_date = Some(text),
            ItemField::Link => self.link = Some(text),
            ItemField::Category => self
                .category
                .get_or_insert_with(Vec::new)
                .push(trim_category(text)),
            ItemField::Description => self.description = Some(text),
        }
    }

    /// Keys present on this item, in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().map(|f| f.key())
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for field in &self.order {
            match field {
                ItemField::Title => map.serialize_entry(field.key(), &as_str(&self.title))?,
                ItemField::Author => map.serialize_entry(field.key(), &as_str(&self.author))?,
                ItemField::PubDate => map.serialize_entry(field.key(), &as_str(&self.pub_date))?,
                ItemField::Link => map.serialize_entry(field.key(), &as_str(&self.link))?,
                ItemField::Category => {
                    map.serialize_entry(field.key(), self.category.as_deref().unwrap_or(&[]))?
                }
                ItemField::Description => {
                    map.serialize_entry(field.key(), &as_str(&self.description))?
                }
            }
        }
        map.end()
    }
}

/// Borrowed view of a recorded field: `None` for absent or empty tags.
pub(crate) fn as_str(field: &Option<Text>) -> Option<&str> {
    field.as_ref().and_then(|t| t.as_deref())
}

fn trim_category(text: Text) -> Text {
    text.map(|t| t.trim().to_string())
}

/// Parsed feed: the channel record plus every item in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub channel: Channel,
    pub items: Vec<Item>,
}
