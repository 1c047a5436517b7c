//! RSS item extraction for search feeds.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SourceError;
use crate::html::{clean_text, decode_entities, strip_cdata};

/// One `<item>` of a search feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
    Description,
    Other,
}

/// Parse `<item>` elements from an RSS document.
///
/// Pulls `<title>`, `<link>` and `<description>`, decoding entities and
/// stripping CDATA markers and HTML tags. Items without a link are skipped.
/// Stops once `max_items` items have been collected.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the document is malformed.
pub fn parse_rss_items(xml: &str, max_items: usize) -> Result<Vec<RssItem>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut field = ItemField::Other;
    let mut current = RssItem::default();

    while items.len() < max_items {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                match name.as_ref() {
                    b"item" => {
                        in_item = true;
                        current = RssItem::default();
                        field = ItemField::Other;
                    }
                    b"title" if in_item => field = ItemField::Title,
                    b"link" if in_item => field = ItemField::Link,
                    b"description" if in_item => field = ItemField::Description,
                    _ => {}
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"item" if in_item => {
                    in_item = false;
                    field = ItemField::Other;
                    let item = RssItem {
                        title: clean_text(&current.title),
                        link: current.link.trim().to_string(),
                        description: clean_text(&current.description),
                    };
                    if !item.link.is_empty() {
                        items.push(item);
                    }
                }
                b"title" | b"link" | b"description" => field = ItemField::Other,
                _ => {}
            },
            Event::Text(e) => {
                if in_item {
                    let text = e.unescape().map_or_else(
                        |_| decode_entities(&String::from_utf8_lossy(&e)),
                        std::borrow::Cow::into_owned,
                    );
                    append_field(&mut current, field, &text);
                }
            }
            Event::CData(e) => {
                if in_item {
                    let raw = String::from_utf8_lossy(&e).into_owned();
                    append_field(&mut current, field, &decode_entities(strip_cdata(&raw)));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn append_field(item: &mut RssItem, field: ItemField, text: &str) {
    let target = match field {
        ItemField::Title => &mut item.title,
        ItemField::Link => &mut item.link,
        ItemField::Description => &mut item.description,
        ItemField::Other => return,
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}
