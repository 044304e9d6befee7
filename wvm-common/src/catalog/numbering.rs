//! Location display-number assignment

use super::model::Location;
use crate::{Error, Result};

/// Number for a new location: the explicit one if given, otherwise one past
/// the highest sibling number (missing numbers count as 0).
///
/// Siblings are never renumbered, so deletions leave gaps.
pub fn assign_number(siblings: &[Location], explicit: Option<i64>) -> Result<i64> {
    if let Some(number) = explicit {
        return Ok(number);
    }
    let highest = siblings
        .iter()
        .map(|loc| loc.number.unwrap_or(0))
        .max()
        .unwrap_or(0);
    highest.checked_add(1).ok_or_else(|| {
        Error::InvalidInput(format!(
            "Location number {} leaves no room for a next number",
            highest
        ))
    })
}
