//! User-Agent string for archive HTTP requests.

/// Tool identification sent with every archive request.
const TOOL_DESCRIPTION: &str = "archive-catalog-tool";

/// Default User-Agent for search and metadata requests.
#[must_use]
pub(crate) fn default_archive_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("iacatalog/{version} ({TOOL_DESCRIPTION})")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_crate_version() {
        let ua = default_archive_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("iacatalog/")
                .and_then(|s| s.split(' ').next())
                .unwrap(),
            "UA must contain crate version"
        );
        assert!(ua.contains(TOOL_DESCRIPTION), "UA must describe the tool: {ua}");
    }
}
