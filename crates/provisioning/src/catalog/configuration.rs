//! Tenant-wide system configuration defaults.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

/// How storage rent is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentBasis {
    PerPacket,
    PerQuintal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    /// Singleton key; a tenant has exactly one configuration row.
    pub key: String,
    pub currency: String,
    /// 1-based month the financial year starts in.
    pub financial_year_start_month: u8,
    pub default_packet_weight_grams: u32,
    pub rent_basis: RentBasis,
}

impl MasterRecord for SystemConfiguration {
    fn natural_key(&self) -> String {
        self.key.clone()
    }

    fn label(&self) -> String {
        "System configuration".to_string()
    }
}

pub fn system_configuration() -> Vec<SystemConfiguration> {
    vec![SystemConfiguration {
        key: "default".to_string(),
        currency: "INR".to_string(),
        financial_year_start_month: 4,
        default_packet_weight_grams: 50_000,
        rent_basis: RentBasis::PerPacket,
    }]
}
