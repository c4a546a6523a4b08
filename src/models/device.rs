use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Mobile,
    Desktop,
    Unknown,
}

impl Device {
    /// Classifies a user agent. Matching is case-sensitive.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.is_empty() {
            return Device::Unknown;
        }

        if ["Mobi", "Android", "iPhone"]
            .iter()
            .any(|marker| user_agent.contains(*marker))
        {
            Device::Mobile
        } else {
            Device::Desktop
        }
    }
}
