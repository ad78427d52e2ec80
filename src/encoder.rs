//! Insights encoder
//!
//! Wraps a profile's stats objects into an [`InsightsPayload`] with producer
//! metadata.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::types::{InsightsPayload, InsightsProducer, ViewingInsights};
use crate::{FLUX_VERSION, PRODUCER_NAME};

/// Insights encoder
pub struct InsightsEncoder {
    instance_id: String,
}

impl Default for InsightsEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightsEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode insights computed at `computed_at`
    pub fn encode(
        &self,
        profile_id: &str,
        insights: ViewingInsights,
        computed_at: DateTime<Utc>,
    ) -> InsightsPayload {
        InsightsPayload {
            producer: InsightsProducer {
                name: PRODUCER_NAME.to_string(),
                version: FLUX_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            profile_id: profile_id.to_string(),
            computed_at_utc: computed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            insights,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        profile_id: &str,
        insights: ViewingInsights,
        computed_at: DateTime<Utc>,
    ) -> Result<String, AnalyticsError> {
        let payload = self.encode(profile_id, insights, computed_at);
        serde_json::to_string_pretty(&payload).map_err(AnalyticsError::JsonError)
    }
}
