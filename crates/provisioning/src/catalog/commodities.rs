//! Commodities accepted for storage.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub name: String,
    pub unit: String,
    pub packet_weight_grams: u32,
}

impl MasterRecord for Commodity {
    fn natural_key(&self) -> String {
        self.name.clone()
    }
}

pub fn commodity_list() -> Vec<Commodity> {
    vec![Commodity {
        name: "Potato".to_string(),
        unit: "packet".to_string(),
        packet_weight_grams: 50_000,
    }]
}
