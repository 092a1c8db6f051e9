pub fn join_base_path(base: &str, path: &str) -> Option<String> {
    if base.trim().is_empty() {
        return None;
    }
    let normalized_base = base.trim().trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Some(format!("{normalized_base}{normalized_path}"))
}

/// Keeps error bodies from the provider short enough to show to a user.
pub fn truncate_body(body: &str, limit: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(limit).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slash() {
        assert_eq!(
            join_base_path("https://api.example.com/", "/v1/chat/completions").as_deref(),
            Some("https://api.example.com/v1/chat/completions")
        );
        assert_eq!(
            join_base_path("http://127.0.0.1:9000", "v1/chat").as_deref(),
            Some("http://127.0.0.1:9000/v1/chat")
        );
        assert_eq!(join_base_path("  ", "/v1"), None);
    }

    #[test]
    fn truncates_long_bodies() {
        assert_eq!(truncate_body(" short ", 10), "short");
        assert_eq!(truncate_body("abcdefghij", 4), "abcd...");
    }
}
