use ito_core::config::ApiConfig;
use ito_core::schema::{NodeLabel, SEARCHABLE_PROPERTIES};
use thiserror::Error;

pub(crate) const DEFAULT_HOPS: u8 = 1;
pub(crate) const DEFAULT_LIMIT: usize = 100;

pub(crate) const fn default_hops() -> u8 {
    DEFAULT_HOPS
}

pub(crate) const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("Query cannot be empty")]
    EmptyQuery,
    #[error("Query contains forbidden operation: {0}. Only read operations are allowed.")]
    ForbiddenOperation(&'static str),
    #[error("name must not be empty")]
    EmptyName,
    #[error("property_name must not be empty")]
    EmptyPropertyName,
    #[error("Invalid property name. Allowed properties: {}", allowed_properties())]
    UnknownProperty(String),
    #[error("limit must be between 1 and {0}")]
    InvalidLimit(usize),
    #[error("hops must be between 1 and {0}")]
    InvalidHops(u8),
    #[error("start_node_id and end_node_id must differ")]
    SameEndpoints,
}

/// Searchable property names, sorted and comma-separated.
fn allowed_properties() -> String {
    let mut names = SEARCHABLE_PROPERTIES.to_vec();
    names.sort_unstable();
    names.join(", ")
}

pub(crate) fn check_limit(limit: usize, limits: &ApiConfig) -> Result<(), RequestValidationError> {
    if limit == 0 || limit > limits.max_limit {
        return Err(RequestValidationError::InvalidLimit(limits.max_limit));
    }
    Ok(())
}

pub(crate) fn check_hops(hops: u8, limits: &ApiConfig) -> Result<(), RequestValidationError> {
    if hops == 0 || hops > limits.max_hops {
        return Err(RequestValidationError::InvalidHops(limits.max_hops));
    }
    Ok(())
}

/// `:`label`` pattern fragment, or nothing when unrestricted.
///
/// Only the closed label vocabulary is ever interpolated into statement text.
pub(crate) fn label_pattern(label: Option<NodeLabel>) -> String {
    match label {
        Some(label) => format!(":`{}`", label.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds() {
        let limits = ApiConfig::default();
        assert!(check_limit(1, &limits).is_ok());
        assert!(check_limit(1000, &limits).is_ok());
        assert_eq!(
            check_limit(0, &limits),
            Err(RequestValidationError::InvalidLimit(1000))
        );
        assert_eq!(
            check_limit(1001, &limits),
            Err(RequestValidationError::InvalidLimit(1000))
        );
    }

    #[test]
    fn test_hops_bounds() {
        let limits = ApiConfig::default();
        assert!(check_hops(5, &limits).is_ok());
        assert_eq!(
            check_hops(6, &limits),
            Err(RequestValidationError::InvalidHops(5))
        );
        assert_eq!(
            check_hops(0, &limits),
            Err(RequestValidationError::InvalidHops(5))
        );
    }

    #[test]
    fn test_unknown_property_lists_allowed_names_sorted() {
        let message = RequestValidationError::UnknownProperty("invalid_prop".into()).to_string();
        assert!(message.starts_with(
            "Invalid property name. Allowed properties: address, company_type, countries,"
        ));
        assert!(message.contains("ibcRUC, inactivation_date"));
        assert!(message.ends_with("struck_off_date, valid_until"));
    }

    #[test]
    fn test_label_pattern_is_backquoted() {
        assert_eq!(label_pattern(Some(NodeLabel::Officer)), ":`役員/株主`");
        assert_eq!(label_pattern(None), "");
    }
}
