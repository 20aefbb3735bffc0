use serde::{Deserialize, Serialize};

/// Query string of list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort_by: Option<String>,
}

/// A payload that is either one element or an array of elements.
///
/// Create endpoints accept both shapes; a single object becomes a
/// one-element batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SingleOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> SingleOrMany<T> {
    /// Normalizes the payload to a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(element) => vec![element],
            Self::Many(elements) => elements,
        }
    }
}

/// Identifier of a freshly created row.
#[derive(Debug, Serialize)]
pub struct CreatedResourceResponse {
    pub id: i32,
}

/// Treats a client-supplied reference of 0 as "no reference".
pub(crate) fn normalize_reference(value: Option<i32>) -> Option<i32> {
    value.filter(|value| *value != 0)
}

#[cfg(test)]
mod tests {
    use super::{SingleOrMany, normalize_reference};

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    #[test]
    fn single_object_becomes_a_one_element_batch() {
        let parsed: Result<SingleOrMany<Payload>, _> =
            serde_json::from_str(r#"{"name": "TJ Sokol"}"#);
        assert!(parsed.is_ok());
        let elements = parsed.map(SingleOrMany::into_vec).unwrap_or_default();
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn arrays_pass_through_in_order() {
        let parsed: Result<SingleOrMany<Payload>, _> =
            serde_json::from_str(r#"[{"name": "A"}, {"name": "B"}]"#);
        assert!(parsed.is_ok());
        let elements = parsed.map(SingleOrMany::into_vec).unwrap_or_default();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].name, "A");
    }

    #[test]
    fn empty_array_is_a_valid_empty_batch() {
        let parsed: Result<SingleOrMany<Payload>, _> = serde_json::from_str("[]");
        assert!(parsed.is_ok());
        assert!(parsed.map(SingleOrMany::into_vec).unwrap_or_default().is_empty());
    }

    #[test]
    fn zero_reference_is_normalized_away() {
        assert_eq!(normalize_reference(Some(0)), None);
        assert_eq!(normalize_reference(Some(7)), Some(7));
        assert_eq!(normalize_reference(None), None);
    }
}
