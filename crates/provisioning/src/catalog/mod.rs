//! Static master-data catalogs seeded into every new tenant.
//!
//! Each submodule owns one collection: its record type, the natural key used
//! to detect existing rows, and the fixed target set.

pub mod accounts;
pub mod banks;
pub mod commodities;
pub mod configuration;
pub mod labor;
pub mod permissions;
pub mod taxes;

use crate::task::TaskKey;

pub use accounts::{AccountKind, LedgerAccount, chart_of_accounts};
pub use banks::{Bank, bank_list};
pub use commodities::{Commodity, commodity_list};
pub use configuration::{RentBasis, SystemConfiguration, system_configuration};
pub use labor::{LaborRate, labor_rates};
pub use permissions::{RolePermissions, role_permissions};
pub use taxes::{TaxRate, tax_rates};

pub const CONFIGURATION: TaskKey = TaskKey::from_static("configuration");
pub const PERMISSIONS: TaskKey = TaskKey::from_static("permissions");
pub const TAXES: TaskKey = TaskKey::from_static("taxes");
pub const LABOR: TaskKey = TaskKey::from_static("labor");
pub const ACCOUNTS: TaskKey = TaskKey::from_static("accounts");
pub const BANKS: TaskKey = TaskKey::from_static("banks");
pub const COMMODITIES: TaskKey = TaskKey::from_static("commodities");
