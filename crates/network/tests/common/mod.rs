//! Shared fixture: a 35 author, 476 collaboration network around Bruce Schultz
//!
//! Every author is listed on P0, the one publication found for the target.
//! The 31 `CORE` authors (target included) also find P0 in their own search
//! and form a clique. The four `OUTER` authors do not; they are linked to
//! the first `CORE` authors through the Q publications only.

#![allow(dead_code)]

use authormaps_common::MemorySource;

pub const TARGET_FIRST: &str = "Bruce";
pub const TARGET_LAST: &str = "Schultz";
pub const TARGET_RECORD: &str = "Schultz Bruce";

pub const CORE: [&str; 30] = [
    "Hoeng Julia",
    "Ivanov Nikolai V",
    "Peitsch Manuel C",
    "Boue Stephanie",
    "Talikka Marja",
    "Martin Florian",
    "Sewer Alain",
    "Titz Bjoern",
    "Guedj Emmanuel",
    "Phillips Blaine",
    "Vuillaume Gregory",
    "Kogel Ulrike",
    "Luettich Karsten",
    "Mathis Carole",
    "Frentzel Stefan",
    "Leroy Patrice",
    "Elamin Ashraf",
    "Schlage Walter K",
    "Kuczaj Arkadiusz",
    "Xiang Yang",
    "Szostak Justyna",
    "Battey James",
    "Iskandar Anita",
    "Wong Ee Tsin",
    "Veljkovic Emilija",
    "Merg Celine",
    "Steiner Sandro",
    "Poussin Carine",
    "Renggli Keyur",
    "Bornand David",
];

pub const OUTER: [&str; 4] = ["Fields Bryan", "Dulize Remi", "Baumer Karine", "Lebrun Stefan"];

pub const EXPECTED_NODES: usize = 35;
pub const EXPECTED_EDGES: usize = 476;

fn split(record: &str) -> (&str, &str) {
    record.split_once(' ').unwrap_or((record, ""))
}

/// Extra publications per author on top of P0 membership
fn extra_publications(record: &str) -> Vec<&'static str> {
    match record {
        r if r == CORE[0] => vec!["Q1", "Q2", "Q3", "Q4"],
        r if r == CORE[1] => vec!["Q1", "Q2", "Q3"],
        r if r == CORE[2] => vec!["Q1", "Q2"],
        r if r == CORE[3] => vec!["Q1"],
        r if r == OUTER[0] => vec!["Q1"],
        r if r == OUTER[1] => vec!["Q2"],
        r if r == OUTER[2] => vec!["Q3", "Q5"],
        r if r == OUTER[3] => vec!["Q4", "Q5"],
        _ => Vec::new(),
    }
}

/// Every author on P0, target first
pub fn all_authors() -> Vec<&'static str> {
    std::iter::once(TARGET_RECORD)
        .chain(CORE)
        .chain(OUTER)
        .collect()
}

pub fn schultz_network() -> MemorySource {
    let mut source = MemorySource::new().with_publication("P0", all_authors());

    for record in std::iter::once(TARGET_RECORD).chain(CORE) {
        let (last, first) = split(record);
        let mut ids = vec!["P0"];
        ids.extend(extra_publications(record));
        source = source.with_author(last, first, ids);
    }

    for record in OUTER {
        let (last, first) = split(record);
        source = source.with_author(last, first, extra_publications(record));
    }

    source
}
