//! Sort-key allowlisting for list endpoints.
//!
//! Client-supplied sort keys are never interpolated into SQL. A key is
//! resolved through a fixed per-entity allowlist to a qualified column
//! name; unknown keys are rejected instead of silently ignored.

use registar_core::{AppError, AppResult};

/// Fixed mapping from client sort keys to qualified ORDER BY columns.
#[derive(Debug, Clone, Copy)]
pub struct SortAllowlist {
    entity: &'static str,
    default_column: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl SortAllowlist {
    /// Creates an allowlist with a default column for unsorted requests.
    #[must_use]
    pub const fn new(
        entity: &'static str,
        default_column: &'static str,
        entries: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            entity,
            default_column,
            entries,
        }
    }

    /// Resolves an optional client sort key to a safe column name.
    ///
    /// Listings always carry an ORDER BY: a missing key falls back to the
    /// entity's default column rather than unspecified row order.
    pub fn resolve(&self, requested: Option<&str>) -> AppResult<&'static str> {
        let Some(requested) = requested else {
            return Ok(self.default_column);
        };

        self.entries
            .iter()
            .find(|(key, _)| *key == requested)
            .map(|(_, column)| *column)
            .ok_or_else(|| {
                let allowed: Vec<&str> = self.entries.iter().map(|(key, _)| *key).collect();
                AppError::Validation(format!(
                    "cannot sort {} by '{}'; allowed keys: {}",
                    self.entity,
                    requested,
                    allowed.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::SortAllowlist;

    const LIST: SortAllowlist = SortAllowlist::new(
        "club",
        "club.name",
        &[("name", "club.name"), ("city", "city.name")],
    );

    #[test]
    fn missing_key_resolves_to_default_column() {
        assert_eq!(LIST.resolve(None).ok(), Some("club.name"));
    }

    #[test]
    fn known_key_resolves_to_qualified_column() {
        assert_eq!(LIST.resolve(Some("city")).ok(), Some("city.name"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = LIST.resolve(Some("id; DROP TABLE club"));
        assert!(result.is_err());
    }

    #[test]
    fn rejection_names_the_allowed_keys() {
        let message = LIST
            .resolve(Some("street"))
            .map_err(|error| error.to_string())
            .err()
            .unwrap_or_default();
        assert!(message.contains("name, city"));
    }
}
