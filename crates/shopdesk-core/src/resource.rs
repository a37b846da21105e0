// ── Resource registry ──
//
// The backend resources the console knows about, and which operations
// each one exposes. Data calls check the registry before going out so a
// list-only resource can't be written to by accident.

use serde::Serialize;
use strum::{Display, EnumString};

use crate::error::CoreError;

/// A data operation, as named by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    List,
    Show,
    Create,
    Edit,
    Delete,
}

impl Capability {
    pub const ALL: [Self; 5] = [Self::List, Self::Show, Self::Create, Self::Edit, Self::Delete];
}

/// One backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceDef {
    /// Name used on the command line.
    pub name: &'static str,
    /// Human label.
    pub label: &'static str,
    /// Path segment under the API base URL.
    pub path: &'static str,
    pub capabilities: &'static [Capability],
}

impl ResourceDef {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fail with [`CoreError::Unsupported`] unless `capability` is offered.
    pub fn require(&self, capability: Capability) -> Result<(), CoreError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(CoreError::Unsupported {
                resource: self.name.to_owned(),
                operation: capability.to_string(),
            })
        }
    }
}

const FULL: &[Capability] = &Capability::ALL;
const LIST_ONLY: &[Capability] = &[Capability::List];

/// Every resource the console manages.
pub const RESOURCES: &[ResourceDef] = &[
    ResourceDef { name: "products", label: "Products", path: "products", capabilities: FULL },
    ResourceDef { name: "categories", label: "Categories", path: "categories", capabilities: FULL },
    ResourceDef { name: "users", label: "Users", path: "users", capabilities: FULL },
    ResourceDef { name: "orders", label: "Orders", path: "orders", capabilities: FULL },
    ResourceDef { name: "carts", label: "Carts", path: "carts", capabilities: LIST_ONLY },
    ResourceDef { name: "payments", label: "Payments", path: "payment", capabilities: FULL },
    ResourceDef { name: "blog_posts", label: "Blog posts", path: "blog_posts", capabilities: FULL },
];

/// Look a resource up by CLI name or API path.
pub fn lookup(name: &str) -> Result<&'static ResourceDef, CoreError> {
    RESOURCES
        .iter()
        .find(|r| r.name == name || r.path == name)
        .ok_or_else(|| CoreError::UnknownResource {
            name: name.to_owned(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_or_path() {
        assert_eq!(lookup("payments").unwrap().path, "payment");
        assert_eq!(lookup("payment").unwrap().name, "payments");
        assert!(matches!(
            lookup("widgets"),
            Err(CoreError::UnknownResource { .. })
        ));
    }

    #[test]
    fn carts_are_list_only() {
        let carts = lookup("carts").unwrap();
        assert!(carts.supports(Capability::List));
        let err = carts.require(Capability::Delete).unwrap_err();
        assert_eq!(err.to_string(), "Resource 'carts' does not support delete");
    }

    #[test]
    fn capability_parses_snake_case() {
        assert_eq!("edit".parse::<Capability>().unwrap(), Capability::Edit);
    }
}
