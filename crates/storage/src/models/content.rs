use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ModelName;

/// One generated summary of a patient report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub summary_id: i64,
    pub report_type: String,
    pub model: ModelName,
    /// 1-based position of the summary within its (report type, model) collection
    pub position: i32,
    pub label: String,
    pub explanation: String,
    pub content: String,
}

/// Number of summaries each model produced for one report type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContentCounts {
    pub mistral: i64,
    pub deepseek: i64,
}

impl ContentCounts {
    pub fn add(&mut self, model: ModelName, count: i64) {
        match model {
            ModelName::Mistral => self.mistral += count,
            ModelName::Deepseek => self.deepseek += count,
        }
    }

    /// Pages run over the larger of the two collections, one summary per page.
    pub fn total_pages(&self) -> u32 {
        self.mistral.max(self.deepseek).max(0) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCount {
    pub report_type: String,
    pub model: ModelName,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_uses_larger_collection() {
        let mut counts = ContentCounts::default();
        counts.add(ModelName::Mistral, 12);
        counts.add(ModelName::Deepseek, 15);
        assert_eq!(counts.total_pages(), 15);
    }

    #[test]
    fn test_empty_counts_have_no_pages() {
        assert_eq!(ContentCounts::default().total_pages(), 0);
    }
}
