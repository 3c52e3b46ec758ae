use serde::Serialize;

use super::PerfumeRecord;

/// Outcome of a recommendation request
///
/// Serialized externally tagged, so each variant renders as a single-key
/// object: `{"match": {...}}`, `{"message": "..."}`, `{"error": "..."}` or
/// `{"Custom Perfume": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// Best-scoring catalog perfume
    #[serde(rename = "match")]
    Match(PerfumeRecord),
    /// Informational fallback when nothing qualifies
    #[serde(rename = "message")]
    Message(String),
    /// The catalog could not be loaded
    #[serde(rename = "error")]
    Error(String),
    /// Description of a custom blend
    #[serde(rename = "Custom Perfume")]
    Customized(String),
}

impl Recommendation {
    /// Short variant name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Recommendation::Match(_) => "match",
            Recommendation::Message(_) => "message",
            Recommendation::Error(_) => "error",
            Recommendation::Customized(_) => "customized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_shape() {
        let value = serde_json::to_value(Recommendation::Message("none".to_string())).unwrap();
        assert_eq!(value, json!({"message": "none"}));
    }

    #[test]
    fn test_error_shape() {
        let value = serde_json::to_value(Recommendation::Error("boom".to_string())).unwrap();
        assert_eq!(value, json!({"error": "boom"}));
    }

    #[test]
    fn test_customized_shape() {
        let value =
            serde_json::to_value(Recommendation::Customized("blend".to_string())).unwrap();
        assert_eq!(value, json!({"Custom Perfume": "blend"}));
    }

    #[test]
    fn test_match_carries_full_record() {
        let record = PerfumeRecord::new()
            .with_field("Name", "Baccarat Rouge 540")
            .with_field("Gender", "Unisex");
        let value = serde_json::to_value(Recommendation::Match(record)).unwrap();
        assert_eq!(
            value,
            json!({"match": {"Name": "Baccarat Rouge 540", "Gender": "Unisex"}})
        );
    }
}
