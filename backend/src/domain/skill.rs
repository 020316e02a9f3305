//! Skill catalogue entries.
//!
//! Skills are created on demand when a user adds one to their profile and
//! are unique by case-insensitive name. Admins can toggle approval.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SkillId;

/// Maximum allowed length for a skill name.
pub const SKILL_NAME_MAX: usize = 50;

/// Validation errors for skill values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillValidationError {
    #[error("Please provide a skill name")]
    EmptyName,
    #[error("skill name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("Type must be either \"offered\" or \"wanted\"")]
    UnknownListKind,
}

/// Trimmed skill name as entered by the first user who added it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    /// Validate and construct a [`SkillName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, SkillValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SkillValidationError::EmptyName);
        }
        if trimmed.chars().count() > SKILL_NAME_MAX {
            return Err(SkillValidationError::NameTooLong {
                max: SKILL_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Case-folded key used for uniqueness and lookups.
    ///
    /// # Examples
    /// ```
    /// use skillswap::domain::SkillName;
    ///
    /// let name = SkillName::new(" Rust ").expect("valid");
    /// assert_eq!(name.lookup_key(), "rust");
    /// ```
    pub fn lookup_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for SkillName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SkillName> for String {
    fn from(value: SkillName) -> Self {
        value.0
    }
}

impl TryFrom<String> for SkillName {
    type Error = SkillValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalogue skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: SkillId,
    pub name: SkillName,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// A newly created, approved skill.
    pub fn new(name: SkillName, created_at: DateTime<Utc>) -> Self {
        Self {
            id: SkillId::random(),
            name,
            is_approved: true,
            created_at,
        }
    }
}

/// Identifier and name pair embedded in profiles and swaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub id: SkillId,
    pub name: SkillName,
}

impl From<&Skill> for SkillSummary {
    fn from(value: &Skill) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

/// Which profile list a skill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillListKind {
    Offered,
    Wanted,
}

impl SkillListKind {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Wanted => "wanted",
        }
    }
}

impl FromStr for SkillListKind {
    type Err = SkillValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offered" => Ok(Self::Offered),
            "wanted" => Ok(Self::Wanted),
            _ => Err(SkillValidationError::UnknownListKind),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", SkillValidationError::EmptyName)]
    #[case("   ", SkillValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: SkillValidationError) {
        assert_eq!(SkillName::new(raw).expect_err("blank"), expected);
    }

    #[rstest]
    fn rejects_long_names() {
        let raw = "k".repeat(SKILL_NAME_MAX + 1);
        assert_eq!(
            SkillName::new(raw).expect_err("too long"),
            SkillValidationError::NameTooLong {
                max: SKILL_NAME_MAX
            }
        );
    }

    #[rstest]
    #[case("offered", SkillListKind::Offered)]
    #[case("wanted", SkillListKind::Wanted)]
    fn parses_list_kind(#[case] raw: &str, #[case] expected: SkillListKind) {
        assert_eq!(raw.parse::<SkillListKind>().expect("known kind"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn unknown_list_kind_is_rejected() {
        assert_eq!(
            "both".parse::<SkillListKind>().expect_err("unknown"),
            SkillValidationError::UnknownListKind
        );
    }

    #[rstest]
    fn new_skills_start_approved() {
        let skill = Skill::new(SkillName::new("Baking").expect("valid"), Utc::now());
        assert!(skill.is_approved);
    }
}
