use serde::{Deserialize, Serialize};

/// A contact document, consumed read-only. Tasks store denormalized copies
/// of contact names with no referential integrity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Avatar background palette for contact badges.
const CONTACT_PALETTE: [&str; 15] = [
    "#FF7A00", "#FF5EB3", "#6E52FF", "#9327FF", "#00BEE8", "#1FD7C1", "#FF745E", "#FFA35E",
    "#FC71FF", "#FFC701", "#0038FF", "#C3FF2B", "#FFE62B", "#FF4646", "#FFBB2B",
];

const FALLBACK_COLOR: &str = "#2A3647";

/// Deterministic avatar color: alphabetical rank of the contact within the
/// current list, modulo the palette. Computed on demand from the list passed
/// in, so there is no cache to go stale when contacts change.
pub fn color_for(name: &str, contacts: &[Contact]) -> &'static str {
    let mut names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    match names.iter().position(|&n| n == name) {
        Some(rank) => CONTACT_PALETTE[rank % CONTACT_PALETTE.len()],
        None => FALLBACK_COLOR,
    }
}

/// Uppercase initials from up to two name parts. Empty input yields an
/// empty string, so absent assignees render blank rather than panicking.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

pub fn find_by_name<'a>(name: &str, contacts: &'a [Contact]) -> Option<&'a Contact> {
    contacts.iter().find(|c| c.name == name)
}
