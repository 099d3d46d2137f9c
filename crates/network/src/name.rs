//! Author names and short ids
//!
//! PubMed author lists carry names in record order, `Last First Middle`.
//! Display uses `First Middle Last`; graph nodes use the short id
//! `Last_F_M`. Short ids collapse different people sharing a surname and
//! initials onto one node.

use authormaps_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters refused in a searched name
pub const INVALID_CHARS: &str = "@€µ*+~!\"§$%&/()=?`,´#;:_<>|^°ßüÜäÄöÖ";

/// First character upper case, the rest lower case
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `Last First Middle` -> `Last_F_M`
pub fn short_id(record_name: &str) -> String {
    let mut parts = record_name.split_whitespace();
    let last = parts.next().unwrap_or_default();
    let initials: Vec<String> = parts
        .filter_map(|part| part.chars().next())
        .map(String::from)
        .collect();
    format!("{}_{}", last, initials.join("_"))
}

/// `Last First Middle` -> `First Middle Last`
pub fn display_name(record_name: &str) -> String {
    let (last, first) = split_record_name(record_name);
    if first.is_empty() {
        last.to_string()
    } else {
        format!("{} {}", first, last)
    }
}

/// `First Middle Last` -> `Last First Middle`
pub fn record_name_of(display: &str) -> String {
    let mut parts: Vec<&str> = display.split_whitespace().collect();
    match parts.pop() {
        Some(last) if !parts.is_empty() => format!("{} {}", last, parts.join(" ")),
        Some(last) => last.to_string(),
        None => String::new(),
    }
}

/// Split a record name into (surname, remaining names)
pub fn split_record_name(record_name: &str) -> (&str, String) {
    let mut parts = record_name.split_whitespace();
    let last = parts.next().unwrap_or_default();
    (last, parts.collect::<Vec<_>>().join(" "))
}

fn check_chars(value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| INVALID_CHARS.contains(*c)) {
        return Err(AppError::InvalidInput {
            message: format!("invalid character '{}' in '{}'", c, value),
        });
    }
    Ok(())
}

/// A capitalized (first, last) author identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorName {
    first: String,
    last: String,
}

impl AuthorName {
    /// Validated name from separate first and last parts
    pub fn new(first_name: &str, last_name: &str) -> Result<Self> {
        let (first, last) = (first_name.trim(), last_name.trim());
        if first.is_empty() || last.is_empty() {
            return Err(AppError::InvalidInput {
                message: "both first and last name are required".to_string(),
            });
        }
        check_chars(first)?;
        check_chars(last)?;
        Ok(Self::normalized(first, last))
    }

    /// Parse a search box entry, `First [Middle…] Last`
    pub fn parse_query(query: &str) -> Result<Self> {
        check_chars(query)?;

        let parts: Vec<&str> = query.split_whitespace().collect();
        let (first, last) = match parts.as_slice() {
            [] | [_] => {
                return Err(AppError::InvalidInput {
                    message: "only first name given, please enter first and last name".to_string(),
                })
            }
            [first, last] => (first.to_string(), last.to_string()),
            [rest @ .., last] => (rest.join(" "), last.to_string()),
        };

        if first == last {
            return Err(AppError::InvalidInput {
                message: format!("reduplicated name '{}'", query.trim()),
            });
        }

        Ok(Self::normalized(&first, &last))
    }

    /// Name of a co-author as listed on a publication; no character checks
    pub fn from_record(record_name: &str) -> Self {
        let (last, first) = split_record_name(record_name);
        Self::normalized(&first, last)
    }

    fn normalized(first: &str, last: &str) -> Self {
        Self {
            first: capitalize(first),
            last: capitalize(last),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// `Last First`, the form matched against publication author lists
    pub fn record_name(&self) -> String {
        format!("{} {}", self.last, self.first)
    }

    /// `First Last`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    pub fn short_id(&self) -> String {
        short_id(&self.record_name())
    }
}

impl fmt::Display for AuthorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("Srinivasan Sanjana"), "Srinivasan_S");
        assert_eq!(short_id("Srinivasan Sanjana S"), "Srinivasan_S_S");
        assert_eq!(short_id("Hofmann-Apitius Martin"), "Hofmann-Apitius_M");
        assert_eq!(short_id("Consortium"), "Consortium_");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("srinivasan"), "Srinivasan");
        assert_eq!(capitalize("HOFMANN-APITIUS"), "Hofmann-apitius");
        assert_eq!(capitalize("durga N"), "Durga n");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_display_and_record_forms() {
        assert_eq!(display_name("Tripathi Durga N"), "Durga N Tripathi");
        assert_eq!(record_name_of("Durga N Tripathi"), "Tripathi Durga N");
        assert_eq!(display_name("Consortium"), "Consortium");
    }

    #[test]
    fn test_new_normalizes_case() {
        let name = AuthorName::new("sanjana", "SRINIVASAN").unwrap();
        assert_eq!(name.first(), "Sanjana");
        assert_eq!(name.last(), "Srinivasan");
        assert_eq!(name.record_name(), "Srinivasan Sanjana");
        assert_eq!(name.display_name(), "Sanjana Srinivasan");
        assert_eq!(name.short_id(), "Srinivasan_S");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(AuthorName::new("", "Schultz"), Err(AppError::InvalidInput { .. })));
        assert!(matches!(AuthorName::new("Bruce", "Sch(ultz"), Err(AppError::InvalidInput { .. })));
    }

    #[test]
    fn test_parse_query() {
        let name = AuthorName::parse_query("Bruce Schultz").unwrap();
        assert_eq!((name.first(), name.last()), ("Bruce", "Schultz"));

        let name = AuthorName::parse_query("  Durga N  Tripathi ").unwrap();
        assert_eq!((name.first(), name.last()), ("Durga n", "Tripathi"));

        for bad in ["Bruce", "", "Bruce@Schultz", "Jürgen Bajorath", "Martin Martin"] {
            assert!(
                matches!(AuthorName::parse_query(bad), Err(AppError::InvalidInput { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_record() {
        let name = AuthorName::from_record("Tripathi Durga N");
        assert_eq!(name.last(), "Tripathi");
        assert_eq!(name.first(), "Durga n");
        assert_eq!(name.to_string(), "Durga n Tripathi");
    }
}
