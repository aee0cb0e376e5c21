//! UUID-backed entity identifiers

/// Declares a UUID newtype identifier with parsing, display and serde support.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID
            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            /// Parse an identifier from its string form
            pub fn parse(value: &str) -> Result<Self, $crate::domain::DomainError> {
                uuid::Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| {
                        $crate::domain::DomainError::invalid_id(format!(
                            "'{}' is not a valid {} id",
                            value, $label
                        ))
                    })
            }

            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

pub(crate) use uuid_id;

#[cfg(test)]
mod tests {
    uuid_id!(
        /// Identifier used only by these tests
        SampleId,
        "sample"
    );

    #[test]
    fn test_parse_round_trip() {
        let id = SampleId::generate();
        let parsed = SampleId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = SampleId::parse("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("not a valid sample id"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = SampleId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
