//! Default chart of accounts.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

/// High-level account kind (determines normal balance side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub code: String, // e.g. "1000"
    pub name: String, // e.g. "Cash in Hand"
    pub kind: AccountKind,
}

impl MasterRecord for LedgerAccount {
    fn natural_key(&self) -> String {
        self.code.clone()
    }

    fn label(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

const CHART: &[(&str, &str, AccountKind)] = &[
    // Assets
    ("1000", "Cash in Hand", AccountKind::Asset),
    ("1010", "Petty Cash", AccountKind::Asset),
    ("1100", "Bank Accounts", AccountKind::Asset),
    ("1200", "Accounts Receivable", AccountKind::Asset),
    ("1210", "Rent Receivable", AccountKind::Asset),
    ("1220", "Loans to Farmers", AccountKind::Asset),
    ("1230", "Advances to Farmers", AccountKind::Asset),
    ("1240", "Interest Receivable", AccountKind::Asset),
    ("1300", "Stock in Trade", AccountKind::Asset),
    ("1310", "Packing Material Stock", AccountKind::Asset),
    ("1400", "Prepaid Expenses", AccountKind::Asset),
    ("1410", "Security Deposits", AccountKind::Asset),
    ("1420", "GST Input Credit", AccountKind::Asset),
    ("1430", "TDS Receivable", AccountKind::Asset),
    ("1500", "Land", AccountKind::Asset),
    ("1510", "Building", AccountKind::Asset),
    ("1520", "Plant and Machinery", AccountKind::Asset),
    ("1530", "Refrigeration Equipment", AccountKind::Asset),
    ("1540", "Furniture and Fixtures", AccountKind::Asset),
    ("1550", "Vehicles", AccountKind::Asset),
    ("1560", "Computers", AccountKind::Asset),
    ("1590", "Accumulated Depreciation", AccountKind::Asset),
    // Liabilities
    ("2000", "Accounts Payable", AccountKind::Liability),
    ("2010", "Sundry Creditors", AccountKind::Liability),
    ("2100", "Bank Loan", AccountKind::Liability),
    ("2110", "Bank Overdraft", AccountKind::Liability),
    ("2200", "GST Output Payable", AccountKind::Liability),
    ("2210", "TDS Payable", AccountKind::Liability),
    ("2300", "Salary Payable", AccountKind::Liability),
    ("2310", "Electricity Payable", AccountKind::Liability),
    ("2400", "Advance Rent Received", AccountKind::Liability),
    ("2410", "Farmer Deposits", AccountKind::Liability),
    // Equity
    ("3000", "Capital Account", AccountKind::Equity),
    ("3100", "Drawings", AccountKind::Equity),
    ("3200", "Retained Earnings", AccountKind::Equity),
    // Revenue
    ("4000", "Storage Rent Income", AccountKind::Revenue),
    ("4010", "Loading Charges Income", AccountKind::Revenue),
    ("4020", "Unloading Charges Income", AccountKind::Revenue),
    ("4030", "Sorting and Grading Income", AccountKind::Revenue),
    ("4100", "Trading Sales", AccountKind::Revenue),
    ("4200", "Interest Income", AccountKind::Revenue),
    ("4300", "Commission Income", AccountKind::Revenue),
    ("4900", "Other Income", AccountKind::Revenue),
    // Expenses
    ("5000", "Purchases", AccountKind::Expense),
    ("5100", "Electricity Expense", AccountKind::Expense),
    ("5110", "Diesel and Generator Expense", AccountKind::Expense),
    ("5200", "Salaries and Wages", AccountKind::Expense),
    ("5210", "Labour Charges", AccountKind::Expense),
    ("5300", "Repairs and Maintenance", AccountKind::Expense),
    ("5310", "Ammonia and Refrigerant", AccountKind::Expense),
    ("5400", "Insurance", AccountKind::Expense),
    ("5500", "Rates and Taxes", AccountKind::Expense),
    ("5600", "Bank Charges", AccountKind::Expense),
    ("5610", "Interest Expense", AccountKind::Expense),
    ("5700", "Depreciation", AccountKind::Expense),
    ("5800", "Office Expenses", AccountKind::Expense),
];

pub fn chart_of_accounts() -> Vec<LedgerAccount> {
    CHART
        .iter()
        .map(|(code, name, kind)| LedgerAccount {
            code: code.to_string(),
            name: name.to_string(),
            kind: *kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_kind_ranges() {
        for account in chart_of_accounts() {
            let expected = match account.code.chars().next() {
                Some('1') => AccountKind::Asset,
                Some('2') => AccountKind::Liability,
                Some('3') => AccountKind::Equity,
                Some('4') => AccountKind::Revenue,
                Some('5') => AccountKind::Expense,
                _ => panic!("unexpected code {}", account.code),
            };
            assert_eq!(account.kind, expected, "{}", account.code);
        }
    }
}
