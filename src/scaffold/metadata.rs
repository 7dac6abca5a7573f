use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Record of how a project was generated, kept next to its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub generator_version: String,
    pub generated_at: DateTime<Utc>,
    pub answers: serde_json::Value,
}

impl GenerationMetadata {
    pub fn new(answers: serde_json::Value) -> Self {
        Self {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            answers,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_timestamp_as_rfc3339() {
        let metadata = GenerationMetadata {
            generator_version: "0.3.0".into(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
            answers: serde_json::json!({"project_name": "shop"}),
        };
        let json = metadata.to_json().unwrap();
        assert!(json.contains("\"generated_at\": \"2026-10-19T08:30:00Z\""));

        let parsed: GenerationMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
    }
}
