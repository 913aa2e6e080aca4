use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Author of a message
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_role_wire_names() {
        for role in Role::iter() {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json, serde_json::json!(role.to_string()));
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role() {
        assert!(Role::from_str("moderator").is_err());
    }
}
