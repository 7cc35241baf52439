//! Generation kinds and their upstream endpoints.

use std::fmt;

/// Default upstream base URL (Google Generative Language API)
pub const DEFAULT_UPSTREAM_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Query parameter carrying the API key on every upstream call
pub const API_KEY_PARAM: &str = "key";

/// Supported generation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    /// Text generation via Gemini `generateContent`
    Text,
    /// Image generation via Imagen `predict`
    Image,
}

impl GenerationKind {
    /// Parse the wire tag. Only exact lowercase matches are accepted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }

    /// Model name served for this kind
    pub fn model(&self) -> &'static str {
        match self {
            Self::Text => "gemini-2.0-flash",
            Self::Image => "imagen-3.0-generate-002",
        }
    }

    /// Model method invoked for this kind
    pub fn method(&self) -> &'static str {
        match self {
            Self::Text => "generateContent",
            Self::Image => "predict",
        }
    }

    /// Path of the endpoint relative to the upstream base, e.g.
    /// `models/gemini-2.0-flash:generateContent`
    pub fn endpoint_path(&self) -> String {
        format!("models/{}:{}", self.model(), self.method())
    }

    /// Full endpoint URL (without the key query parameter)
    pub fn endpoint_url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.endpoint_path())
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_tag() {
        for kind in [GenerationKind::Text, GenerationKind::Image] {
            assert_eq!(GenerationKind::from_tag(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn test_from_tag_exact_match_only() {
        assert_eq!(GenerationKind::from_tag("text"), Some(GenerationKind::Text));
        assert_eq!(
            GenerationKind::from_tag("image"),
            Some(GenerationKind::Image)
        );
        assert_eq!(GenerationKind::from_tag("Text"), None);
        assert_eq!(GenerationKind::from_tag(" image"), None);
        assert_eq!(GenerationKind::from_tag("audio"), None);
        assert_eq!(GenerationKind::from_tag(""), None);
    }

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(
            GenerationKind::Text.endpoint_url(DEFAULT_UPSTREAM_BASE),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            GenerationKind::Image.endpoint_url(DEFAULT_UPSTREAM_BASE),
            "https://generativelanguage.googleapis.com/v1beta/models/imagen-3.0-generate-002:predict"
        );
    }

    #[test]
    fn test_endpoint_url_trailing_slash() {
        assert_eq!(
            GenerationKind::Image.endpoint_url("http://localhost:9000/v1beta/"),
            "http://localhost:9000/v1beta/models/imagen-3.0-generate-002:predict"
        );
    }

    #[test]
    fn test_every_kind_has_distinct_endpoint() {
        assert_ne!(
            GenerationKind::Text.endpoint_path(),
            GenerationKind::Image.endpoint_path()
        );
    }
}
