use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the service should match the query.
#[derive(Debug, Deserialize, Serialize, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SearchMode {
    #[default]
    Semantic,
    Broad,
    #[value(name = "exact-title", alias = "exactTitle")]
    ExactTitle,
}

impl SearchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "semantic" => Some(Self::Semantic),
            "broad" => Some(Self::Broad),
            "exacttitle" | "exact-title" | "exact" => Some(Self::ExactTitle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Broad => "broad",
            Self::ExactTitle => "exactTitle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_wire_names() {
        assert_eq!(serde_json::to_value(SearchMode::Semantic).unwrap(), "semantic");
        assert_eq!(serde_json::to_value(SearchMode::Broad).unwrap(), "broad");
        assert_eq!(serde_json::to_value(SearchMode::ExactTitle).unwrap(), "exactTitle");
    }

    #[test]
    fn parse_accepts_wire_and_cli_spellings() {
        assert_eq!(SearchMode::parse("exactTitle"), Some(SearchMode::ExactTitle));
        assert_eq!(SearchMode::parse("exact-title"), Some(SearchMode::ExactTitle));
        assert_eq!(SearchMode::parse(" Broad "), Some(SearchMode::Broad));
        assert_eq!(SearchMode::parse("fuzzy"), None);
    }

    #[test]
    fn default_is_semantic() {
        assert_eq!(SearchMode::default(), SearchMode::Semantic);
    }
}
