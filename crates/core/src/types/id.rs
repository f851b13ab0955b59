//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Every catalog entity
//! is keyed by a UUID; brands are additionally addressed by slug.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `Uuid` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_uuid()`, `parse()`
/// - `From<Uuid>`, `Into<Uuid>`, `Display` and `FromStr` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use jiraibrary_core::define_id;
/// define_id!(ShelfId);
/// define_id!(BinId);
///
/// let raw = uuid::Uuid::new_v4();
/// let shelf_id = ShelfId::new(raw);
/// let bin_id = BinId::new(raw);
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = bin_id;
/// # let _ = (shelf_id, bin_id);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create a new ID from a UUID value.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }

            /// Parse an ID from its textual form, returning `None` when the
            /// input is not a valid UUID.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                ::uuid::Uuid::parse_str(raw.trim()).ok().map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <::uuid::Uuid as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <::uuid::Uuid as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Catalog entity IDs
define_id!(ItemId);
define_id!(BrandId);
define_id!(CategoryId);
define_id!(SubcategoryId);
define_id!(StyleId);
define_id!(SubstyleId);
define_id!(TagId);
define_id!(ColorId);
define_id!(CollectionId);
define_id!(FabricId);
define_id!(FeatureId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_uuid() {
        let id = TagId::parse("6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10").unwrap();
        assert_eq!(id.to_string(), "6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(ColorId::parse("  6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10 ").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CategoryId::parse("dresses").is_none());
        assert!(CategoryId::parse("").is_none());
    }

    #[test]
    fn test_display_is_lowercase_hyphenated() {
        let id = StyleId::parse("6F1C2A2E-8F4B-4D3A-9C57-1F0B8E2D4A10").unwrap();
        assert_eq!(id.to_string(), "6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10");
    }

    #[test]
    fn test_serde_transparent() {
        let id = FabricId::parse("6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c2a2e-8f4b-4d3a-9c57-1f0b8e2d4a10\"");
        let back: FabricId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
