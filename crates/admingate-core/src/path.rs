use crate::error::{GatewayError, Result};

/// Parsed request path: `/{resource}[/{id}[/{action}]]`.
///
/// Created once per request from the URL path segments, immutable, discarded
/// at end of request. `action` implies `id` by construction: the action
/// segment can only exist at index 2, behind an id at index 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub resource: String,
    pub id: Option<String>,
    pub action: Option<String>,
}

impl ResourcePath {
    /// Parse an ordered sequence of path segments.
    ///
    /// Segment 0 is the resource name, segment 1 (if present) the id,
    /// segment 2 (if present) the action. Segments beyond index 2 are
    /// silently ignored; no caller needs deeper nesting, and rejecting
    /// them would break nothing but forward compatibility.
    pub fn parse<S: AsRef<str>>(segments: &[S]) -> Result<Self> {
        let mut segments = segments.iter().map(AsRef::as_ref).filter(|s| !s.is_empty());

        let resource = segments
            .next()
            .ok_or_else(|| GatewayError::invalid_path("missing resource segment"))?
            .to_string();

        Ok(Self {
            resource,
            id: segments.next().map(str::to_string),
            action: segments.next().map(str::to_string),
        })
    }

    /// Parse from a raw path string, e.g. `users/5/upload`.
    pub fn parse_str(path: &str) -> Result<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        Self::parse(&segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_only() {
        let p = ResourcePath::parse(&["users"]).unwrap();
        assert_eq!(p.resource, "users");
        assert_eq!(p.id, None);
        assert_eq!(p.action, None);
    }

    #[test]
    fn test_resource_and_id() {
        let p = ResourcePath::parse(&["roles", "42"]).unwrap();
        assert_eq!(p.resource, "roles");
        assert_eq!(p.id.as_deref(), Some("42"));
        assert_eq!(p.action, None);
    }

    #[test]
    fn test_resource_id_action() {
        let p = ResourcePath::parse(&["iso-companies", "42", "upload"]).unwrap();
        assert_eq!(p.resource, "iso-companies");
        assert_eq!(p.id.as_deref(), Some("42"));
        assert_eq!(p.action.as_deref(), Some("upload"));
    }

    #[test]
    fn test_extra_segments_ignored() {
        let p = ResourcePath::parse(&["users", "5", "upload", "extra", "deep"]).unwrap();
        assert_eq!(p.resource, "users");
        assert_eq!(p.id.as_deref(), Some("5"));
        assert_eq!(p.action.as_deref(), Some("upload"));
    }

    #[test]
    fn test_empty_segments_rejected() {
        let err = ResourcePath::parse::<&str>(&[]).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_blank_segments_skipped() {
        // Trailing slashes produce empty segments; they never become ids.
        let p = ResourcePath::parse_str("/users//5/").unwrap();
        assert_eq!(p.resource, "users");
        assert_eq!(p.id.as_deref(), Some("5"));
        assert_eq!(p.action, None);
    }

    #[test]
    fn test_parse_str_empty_is_invalid() {
        assert!(ResourcePath::parse_str("/").is_err());
        assert!(ResourcePath::parse_str("").is_err());
    }

    #[test]
    fn test_action_implies_id() {
        // There is no segment arrangement where action exists without id.
        let p = ResourcePath::parse(&["users", "5", "export"]).unwrap();
        assert!(p.action.is_some());
        assert!(p.id.is_some());
    }
}
