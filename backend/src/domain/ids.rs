//! UUID-backed identifier newtypes for domain entities.

macro_rules! define_entity_id {
    (
        $(#[$outer:meta])*
        $name:ident
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
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

pub(crate) use define_entity_id;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use uuid::Uuid;

    define_entity_id! {
        /// Identifier used only by these tests.
        ExampleId
    }

    #[rstest]
    fn serialises_as_bare_uuid_string() {
        let uuid = Uuid::nil();
        let id = ExampleId::from_uuid(uuid);
        let json = serde_json::to_value(id).expect("serialise id");
        assert_eq!(json, serde_json::json!(uuid.to_string()));
    }

    #[rstest]
    fn parse_rejects_non_uuid_input() {
        assert!("venue-1".parse::<ExampleId>().is_err());
    }

    #[rstest]
    fn random_ids_differ() {
        assert_ne!(ExampleId::random(), ExampleId::random());
    }
}
