//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use diamond_assess_core::define_id;
/// define_id!(SampleId);
/// define_id!(BatchId);
///
/// let sample = SampleId::new(1);
/// let batch = BatchId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: SampleId = batch;
/// assert_eq!(sample.as_i64(), batch.as_i64());
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
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(AssessmentRequestId);
define_id!(AssessmentResultId);
define_id!(CertificateId);
define_id!(ServiceId);
define_id!(OrderId);
define_id!(PaymentId);
define_id!(ConversationId);
define_id!(MessageId);
define_id!(FeedbackId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_inner_value() {
        assert_eq!(OrderId::new(42).to_string(), "42");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = CertificateId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: CertificateId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_conversions() {
        let id: UserId = 9.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 9);
    }
}
