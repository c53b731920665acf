//! XMP keyword decoder.
//!
//! Keywords come from two RDF containers:
//! - `dc:subject`: flat keywords, one per `rdf:li`
//! - `lr:hierarchicalSubject`: taxonomy paths like `Program|Artemis II`.
//!   The full path is kept, and its leaf is also added as a plain keyword.
//!
//! Elements are matched by local name only. Writers bind these tags to
//! different prefixes, so `dc:subject` and `foo:subject` are the same thing
//! here.
//!
//! All `subject` keywords come first, then all `hierarchicalSubject` ones. Within
//! each group, keywords follow document order. Exact duplicates are dropped,
//! keeping the first occurrence.

use super::ExtractError;
use roxmltree::{Document, Node};
use std::collections::HashSet;

const SUBJECT: &str = "subject";
const HIERARCHICAL_SUBJECT: &str = "hierarchicalSubject";
const LIST_ITEM: &str = "li";
const PATH_SEPARATOR: char = '|';

/// Decode the keyword list from an XMP packet.
///
/// Returns an empty list if the packet is not well-formed XML.
pub fn decode_keywords(packet: &[u8]) -> Vec<String> {
    match read_keywords(packet) {
        Ok(keywords) => keywords,
        Err(err) => {
            log::debug!("XMP keywords unavailable: {err}");
            Vec::new()
        }
    }
}

/// Like [`decode_keywords`], reporting parse failures.
pub fn read_keywords(packet: &[u8]) -> Result<Vec<String>, ExtractError> {
    let text = decode_text(packet);
    let doc =
        Document::parse(&text).map_err(|e| ExtractError::MalformedDocument(e.to_string()))?;

    let mut subjects = Vec::new();
    let mut hierarchical = Vec::new();

    for node in doc.descendants().filter(Node::is_element) {
        match node.tag_name().name() {
            SUBJECT => subjects.extend(list_items(node)),
            HIERARCHICAL_SUBJECT => {
                for path in list_items(node) {
                    let leaf = leaf_segment(&path);
                    hierarchical.push(path);
                    hierarchical.extend(leaf);
                }
            }
            _ => {}
        }
    }

    Ok(dedup(subjects.into_iter().chain(hierarchical)))
}

/// UTF-8 with invalid sequences dropped, NUL and whitespace padding removed.
fn decode_text(packet: &[u8]) -> String {
    let text: String = packet.utf8_chunks().map(|chunk| chunk.valid()).collect();
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string()
}

/// Trimmed, non-empty text of every `li` below `container`.
fn list_items(container: Node<'_, '_>) -> Vec<String> {
    container
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == LIST_ITEM)
        .filter_map(|li| li.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
        .collect()
}

/// Last segment of a `|`-separated path, if the text is a path at all.
fn leaf_segment(path: &str) -> Option<String> {
    if !path.contains(PATH_SEPARATOR) {
        return None;
    }
    path.rsplit(PATH_SEPARATOR)
        .next()
        .map(str::trim)
        .filter(|leaf| !leaf.is_empty())
        .map(String::from)
}

fn dedup(keywords: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}
