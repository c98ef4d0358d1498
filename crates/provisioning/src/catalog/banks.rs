//! Banks offered when recording farmer and tenant bank details.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Four-letter IFSC bank prefix.
    pub code: String,
    pub name: String,
}

impl MasterRecord for Bank {
    fn natural_key(&self) -> String {
        self.code.clone()
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

const BANKS: &[(&str, &str)] = &[
    ("SBIN", "State Bank of India"),
    ("PUNB", "Punjab National Bank"),
    ("BARB", "Bank of Baroda"),
    ("CNRB", "Canara Bank"),
    ("UBIN", "Union Bank of India"),
    ("BKID", "Bank of India"),
    ("IOBA", "Indian Overseas Bank"),
    ("CBIN", "Central Bank of India"),
    ("IDIB", "Indian Bank"),
    ("UCBA", "UCO Bank"),
    ("MAHB", "Bank of Maharashtra"),
    ("PSIB", "Punjab & Sind Bank"),
    ("HDFC", "HDFC Bank"),
    ("ICIC", "ICICI Bank"),
    ("UTIB", "Axis Bank"),
    ("KKBK", "Kotak Mahindra Bank"),
    ("INDB", "IndusInd Bank"),
    ("YESB", "Yes Bank"),
    ("IDFB", "IDFC FIRST Bank"),
    ("FDRL", "Federal Bank"),
    ("SIBL", "South Indian Bank"),
    ("KARB", "Karnataka Bank"),
    ("KVBL", "Karur Vysya Bank"),
    ("TMBL", "Tamilnad Mercantile Bank"),
    ("CIUB", "City Union Bank"),
    ("DCBL", "DCB Bank"),
    ("RATN", "RBL Bank"),
    ("BDBL", "Bandhan Bank"),
    ("ESFB", "Equitas Small Finance Bank"),
    ("AUBL", "AU Small Finance Bank"),
    ("UJVN", "Ujjivan Small Finance Bank"),
    ("JAKA", "Jammu & Kashmir Bank"),
    ("CSBK", "CSB Bank"),
    ("DLXB", "Dhanlaxmi Bank"),
    ("NTBL", "Nainital Bank"),
    ("IBKL", "IDBI Bank"),
    ("AIRP", "Airtel Payments Bank"),
    ("IPOS", "India Post Payments Bank"),
    ("PYTM", "Paytm Payments Bank"),
];

pub fn bank_list() -> Vec<Bank> {
    BANKS
        .iter()
        .map(|(code, name)| Bank {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}
