use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Serialize, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Relevance,
    Date,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relevance" => Some(Self::Relevance),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
        }
    }
}

/// Advisory filter selections. Shown alongside results; never sent to the
/// service and never used to drop or reorder results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filters {
    pub year: Option<i32>,
    pub journal: Option<String>,
    pub sort: SortOrder,
}

impl Filters {
    /// One-line summary for the results header, or `None` when nothing is selected.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(format!("year {year}"));
        }
        if let Some(journal) = self.journal.as_deref().filter(|j| !j.trim().is_empty()) {
            parts.push(format!("journal \"{}\"", journal.trim()));
        }
        if self.sort != SortOrder::default() {
            parts.push(format!("sort by {}", self.sort.as_str()));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_describe_nothing() {
        assert_eq!(Filters::default().describe(), None);
    }

    #[test]
    fn describe_lists_selected_filters() {
        let filters = Filters {
            year: Some(2022),
            journal: Some(" Nature ".into()),
            sort: SortOrder::Date,
        };
        assert_eq!(
            filters.describe().as_deref(),
            Some(r#"year 2022, journal "Nature", sort by date"#)
        );
    }

    #[test]
    fn blank_journal_is_ignored() {
        let filters = Filters {
            journal: Some("   ".into()),
            ..Filters::default()
        };
        assert_eq!(filters.describe(), None);
    }

    #[test]
    fn sort_parse() {
        assert_eq!(SortOrder::parse("DATE"), Some(SortOrder::Date));
        assert_eq!(SortOrder::parse("citations"), None);
    }
}
