//! GST rate slabs.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    pub name: String,
    /// Rate in basis points (1800 = 18%).
    pub rate_bps: u32,
}

impl MasterRecord for TaxRate {
    fn natural_key(&self) -> String {
        self.name.clone()
    }
}

pub fn tax_rates() -> Vec<TaxRate> {
    [("GST 0%", 0), ("GST 5%", 500), ("GST 12%", 1200), ("GST 18%", 1800), ("GST 28%", 2800)]
        .into_iter()
        .map(|(name, rate_bps)| TaxRate {
            name: name.to_string(),
            rate_bps,
        })
        .collect()
}
