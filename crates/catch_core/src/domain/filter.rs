use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Categorical dimensions the backend can filter chunks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Author,
    Status,
}

impl FilterField {
    /// Metadata key as the backend stores it.
    pub fn wire_key(self) -> &'static str {
        match self {
            FilterField::Author => "Author",
            FilterField::Status => "Status",
        }
    }
}

/// Structured metadata predicate forwarded to the backend.
///
/// Serializes as `{"Author": "x"}` for a single constraint and as
/// `{"$and": [{"Author": "x"}, {"Status": "y"}]}` for a conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPredicate {
    Eq { field: FilterField, value: String },
    And(Vec<FilterPredicate>),
}

impl FilterPredicate {
    pub fn eq(field: FilterField, value: impl Into<String>) -> Self {
        FilterPredicate::Eq {
            field,
            value: value.into(),
        }
    }
}

impl Serialize for FilterPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            FilterPredicate::Eq { field, value } => map.serialize_entry(field.wire_key(), value)?,
            FilterPredicate::And(parts) => map.serialize_entry("$and", parts)?,
        }
        map.end()
    }
}

/// Combine the author and status selections into a predicate.
///
/// Empty values count as "no selection". Both present yields a conjunction ordered
/// author first, then status.
pub fn build_filter_predicate(author: Option<&str>, status: Option<&str>) -> Option<FilterPredicate> {
    let mut parts: Vec<FilterPredicate> = [
        (FilterField::Author, author),
        (FilterField::Status, status),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        value
            .filter(|v| !v.is_empty())
            .map(|v| FilterPredicate::eq(field, v))
    })
    .collect();

    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(FilterPredicate::And(parts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn no_selection_yields_no_predicate() {
        assert_eq!(build_filter_predicate(None, None), None);
        assert_eq!(build_filter_predicate(Some(""), None), None);
    }

    #[test]
    fn single_author_is_a_bare_equality() {
        let p = build_filter_predicate(Some("Dana"), None).unwrap();
        assert_eq!(p, FilterPredicate::eq(FilterField::Author, "Dana"));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({"Author": "Dana"}));
    }

    #[test]
    fn single_status_is_a_bare_equality() {
        let p = build_filter_predicate(None, Some("Done")).unwrap();
        assert_eq!(p, FilterPredicate::eq(FilterField::Status, "Done"));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({"Status": "Done"}));
    }

    #[test]
    fn both_selections_form_ordered_conjunction() {
        let p = build_filter_predicate(Some("Dana"), Some("Done")).unwrap();
        assert_eq!(
            p,
            FilterPredicate::And(vec![
                FilterPredicate::eq(FilterField::Author, "Dana"),
                FilterPredicate::eq(FilterField::Status, "Done"),
            ])
        );
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({"$and": [{"Author": "Dana"}, {"Status": "Done"}]})
        );
    }
}
