//! Labour charge rates per packet handled.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborRate {
    pub activity: String,
    /// Rate in paise per packet.
    pub rate_per_packet: u32,
}

impl MasterRecord for LaborRate {
    fn natural_key(&self) -> String {
        self.activity.clone()
    }

    fn label(&self) -> String {
        format!("Labour: {}", self.activity)
    }
}

pub fn labor_rates() -> Vec<LaborRate> {
    [
        ("Loading", 300),
        ("Unloading", 300),
        ("Stacking", 200),
        ("Destacking", 200),
        ("Sorting", 500),
        ("Grading", 500),
    ]
    .into_iter()
    .map(|(activity, rate_per_packet)| LaborRate {
        activity: activity.to_string(),
        rate_per_packet,
    })
    .collect()
}
