//! Tabular export of contacts.
//!
//! Exports only see the `(name, email)` projection of each contact.

use crate::models::{Contact, ContactSummary};

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "Name,Email";

/// Project contacts onto `(name, email)`, keeping their order.
pub fn summaries(contacts: &[Contact]) -> Vec<ContactSummary> {
    contacts.iter().map(Contact::summary).collect()
}

/// Render contacts as CSV: a header row, then one `name,email` row each.
///
/// Fields containing a comma, quote, or line break are quoted, with inner
/// quotes doubled. Rows end in `\n`.
pub fn to_csv(contacts: &[Contact]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + contacts.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for summary in summaries(contacts) {
        out.push_str(&csv_field(&summary.name));
        out.push(',');
        out.push_str(&csv_field(&summary.email));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
