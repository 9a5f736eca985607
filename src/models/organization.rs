//! Organization membership payloads

use serde::{Deserialize, Serialize};

// == Organization ==
/// One organization a user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Upstream organization identifier
    pub organization_id: u32,
    /// Display name
    pub name: String,
    /// Number of registered members
    pub member_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_deserialize() {
        let json = r#"[{"organization_id": 7, "name": "Example University", "member_count": 412}]"#;
        let orgs: Vec<Organization> = serde_json::from_str(json).unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].organization_id, 7);
        assert_eq!(orgs[0].name, "Example University");
    }
}
