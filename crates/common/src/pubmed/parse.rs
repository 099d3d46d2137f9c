//! Parsers for E-utilities responses
//!
//! - esearch XML (`eSearchResult/IdList/Id`)
//! - MEDLINE text records as returned by efetch with `rettype=medline`

use crate::errors::{AppError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// MEDLINE tag holding full author names ("Last, First Middle")
pub const AUTHOR_FIELD: &str = "FAU";

/// Parse esearch response to get PMIDs.
///
/// Returns `None` when the response has no `IdList` or an empty one.
pub fn parse_esearch(xml: &str) -> Result<Option<Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut pmids = Vec::new();
    let mut buf = Vec::new();
    let mut in_id_list = false;
    let mut in_id = false;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"eSearchResult" => saw_root = true,
                b"IdList" => in_id_list = true,
                b"Id" if in_id_list => in_id = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"eSearchResult" => saw_root = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"IdList" => in_id_list = false,
                b"Id" => in_id = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_id => {
                let text = e.unescape().map_err(|e| AppError::InvalidFormat {
                    message: format!("esearch id: {}", e),
                })?;
                let text = text.trim();
                if !text.is_empty() {
                    pmids.push(text.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::InvalidFormat {
                    message: format!("esearch XML parse error: {}", e),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(AppError::InvalidFormat {
            message: "esearch response has no eSearchResult element".to_string(),
        });
    }

    Ok(if pmids.is_empty() { None } else { Some(pmids) })
}

/// One MEDLINE record: tag -> values in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedlineRecord(BTreeMap<String, Vec<String>>);

impl MedlineRecord {
    /// Values recorded for `tag`
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.0.get(tag).map(|v| v.as_slice())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Author list with commas stripped ("Last First Middle")
    pub fn authors(&self) -> Option<Vec<String>> {
        self.get(AUTHOR_FIELD)
            .map(|names| names.iter().map(|n| strip_commas(n)).collect())
    }
}

fn tag_line() -> &'static regex_lite::Regex {
    static TAG_LINE: OnceLock<regex_lite::Regex> = OnceLock::new();
    TAG_LINE.get_or_init(|| {
        regex_lite::Regex::new(r"^([A-Z0-9]{1,4}) *- ?(.*)$").expect("MEDLINE tag pattern is valid")
    })
}

/// Parse the first record of a MEDLINE text document.
///
/// Lines starting with six spaces continue the previous value. Parsing stops
/// at the first blank line after content.
pub fn parse_medline(text: &str) -> MedlineRecord {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut last_tag: Option<String> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            if !fields.is_empty() {
                break;
            }
            continue;
        }

        if line.starts_with("      ") {
            if let Some(value) = last_tag
                .as_ref()
                .and_then(|tag| fields.get_mut(tag))
                .and_then(|values| values.last_mut())
            {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some(caps) = tag_line().captures(line) {
            let tag = caps[1].to_string();
            let value = caps[2].trim().to_string();
            fields.entry(tag.clone()).or_default().push(value);
            last_tag = Some(tag);
        }
    }

    MedlineRecord(fields)
}

/// Read the author list from a cached record.
///
/// Accepts both list and single-string values for the author field, so
/// records written by other tools remain readable.
pub fn authors_from_record(pmid: &str, json: &str) -> Result<Vec<String>> {
    let record: serde_json::Value = serde_json::from_str(json)?;

    let missing = || AppError::MissingField {
        pmid: pmid.to_string(),
        field: AUTHOR_FIELD.to_string(),
    };

    match record.get(AUTHOR_FIELD).ok_or_else(missing)? {
        serde_json::Value::Array(names) => Ok(names
            .iter()
            .filter_map(|n| n.as_str())
            .map(strip_commas)
            .collect()),
        serde_json::Value::String(name) => Ok(vec![strip_commas(name)]),
        _ => Err(missing()),
    }
}

fn strip_commas(name: &str) -> String {
    name.replace(',', "")
}
