use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DISCLAIMER: &str = "This assessment is for informational purposes only and is not a substitute for professional medical advice.";

/// Coarse triage tier. Ordering is High > Moderate > Low so callers can
/// compare tiers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
}

impl UrgencyLevel {
    /// Lenient parse for query parameters; anything unrecognized (or absent)
    /// defaults to moderate, matching the original resource endpoint.
    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "high" => Self::High,
            Some(v) if v == "low" => Self::Low,
            _ => Self::Moderate,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "Urgent Care")]
    UrgentCare,
    Hospital,
    #[serde(rename = "Emergency Room")]
    EmergencyRoom,
    Clinic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomReport {
    pub symptoms: String,
    pub location: Option<String>,
}

/// Output of a classification strategy. Immutable once produced; one per
/// request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub urgency_level: UrgencyLevel,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub distance_miles: f64,
    pub wait_time_range: String,
    pub phone: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub nearby_resources: Vec<HealthcareResource>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}
