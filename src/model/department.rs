use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Fixed set of departments an account may belong to.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
    ToSchema,
)]
pub enum Department {
    AIML,
    DS,
    IT,
    CSE,
    MECHANICAL,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_known_departments_only() {
        assert_eq!(Department::from_str("CSE").unwrap(), Department::CSE);
        assert_eq!(Department::from_str("AIML").unwrap(), Department::AIML);
        assert!(Department::from_str("EEE").is_err());
        assert!(Department::from_str("cse").is_err());
    }
}
