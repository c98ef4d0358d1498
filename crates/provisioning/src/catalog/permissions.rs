//! Default roles and their module permissions.

use serde::{Deserialize, Serialize};

use crate::backend::MasterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    pub role: String,
    /// Opaque permission strings (e.g. "amad.write"); `"*"` grants everything.
    pub permissions: Vec<String>,
}

impl MasterRecord for RolePermissions {
    fn natural_key(&self) -> String {
        self.role.clone()
    }

    fn label(&self) -> String {
        format!("Role: {}", self.role)
    }
}

fn role(name: &str, permissions: &[&str]) -> RolePermissions {
    RolePermissions {
        role: name.to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn role_permissions() -> Vec<RolePermissions> {
    vec![
        // Admins get all permissions (wildcard)
        role("admin", &["*"]),
        role(
            "manager",
            &[
                "amad.read",
                "amad.write",
                "rent.read",
                "rent.write",
                "takpatti.read",
                "takpatti.write",
                "stock_transfer.read",
                "stock_transfer.write",
                "trading.read",
                "trading.write",
                "accounting.read",
                "settings.read",
            ],
        ),
        role(
            "operator",
            &[
                "amad.read",
                "amad.write",
                "takpatti.read",
                "takpatti.write",
                "stock_transfer.read",
                "rent.read",
            ],
        ),
    ]
}
