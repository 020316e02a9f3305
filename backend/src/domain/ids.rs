//! UUID-backed identifiers for skills, swaps, and feedback.
//!
//! [`UserId`](super::UserId) keeps the caller's raw text for session
//! round-trips; the identifiers here only need the parsed UUID.

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an already-parsed UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of a catalogue skill.
    SkillId
);

uuid_identifier!(
    /// Identifier of a swap request.
    SwapId
);

uuid_identifier!(
    /// Identifier of a feedback entry.
    FeedbackId
);

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn serialises_as_bare_uuid_string() {
        let id = SwapId::from_uuid(Uuid::nil());
        assert_eq!(
            serde_json::to_value(id).expect("serialise"),
            json!("00000000-0000-0000-0000-000000000000")
        );
    }

    #[rstest]
    fn parse_rejects_garbage() {
        assert!("swap-1".parse::<SkillId>().is_err());
        let id: FeedbackId = "00000000-0000-0000-0000-00000000000a"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-00000000000a");
    }
}
