use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::device::Device;

pub const UNKNOWN: &str = "Unknown";

/// A single page visit as persisted in the visits collection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VisitorLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub page_visited: String,
    pub ip_address: String, // Partition key
    pub device: Device,
    pub browser: String,
    pub referrer: String,
}

impl VisitorLog {
    pub fn new(page_visited: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            page_visited,
            ip_address: UNKNOWN.to_string(),
            device: Device::Unknown,
            browser: UNKNOWN.to_string(),
            referrer: UNKNOWN.to_string(),
        }
    }

    pub fn touch(&mut self) {
        self.date = Utc::now();
    }

    pub fn has_page(&self) -> bool {
        !self.page_visited.trim().is_empty()
    }
}
