use crate::import::normalize::normalize_key;
use crate::import::row::{CellValue, RawRow};

/// Finds the cell for one internal field, trying exact, then normalized,
/// then partial header matches. Aliases are tried in their listed order
/// inside every tier; row headers in column order. Blank cells never match.
///
/// Partial matching is first-match-wins: a short alias such as `Email` also
/// matches `EmailCC`. Put the most specific aliases first.
pub fn resolve_field(row: &RawRow, aliases: &[String]) -> CellValue {
    for alias in aliases {
        if let Some(value) = row.get(alias)
            && !value.is_blank()
        {
            return value.clone();
        }
    }

    let normalized_row = row
        .cells()
        .map(|(header, value)| (header, normalize_key(header), value))
        .collect::<Vec<(&str, String, &CellValue)>>();
    let normalized_aliases = aliases
        .iter()
        .map(|alias| (alias.as_str(), normalize_key(alias)))
        .collect::<Vec<(&str, String)>>();

    for (_, normalized_alias) in &normalized_aliases {
        if normalized_alias.is_empty() {
            continue;
        }
        for (_, normalized_header, value) in &normalized_row {
            if normalized_header == normalized_alias && !value.is_blank() {
                return (*value).clone();
            }
        }
    }

    for (alias, normalized_alias) in &normalized_aliases {
        for (header, normalized_header, value) in &normalized_row {
            if value.is_blank() {
                continue;
            }
            let raw_hit = !alias.is_empty() && header.contains(alias);
            let normalized_hit =
                !normalized_alias.is_empty() && normalized_header.contains(normalized_alias.as_str());
            if raw_hit || normalized_hit {
                return (*value).clone();
            }
        }
    }

    CellValue::Empty
}
