//! Payload trait for bucket-defined data shapes.

/// A marker trait for the data carried through a bucket.
///
/// Each bucket picks a single payload type for its request `data`, response
/// `result` and option values. The dispatch core never looks inside a
/// payload; middleware gives it meaning.
///
/// `Clone` is required because a broadcast delivers the same result to many
/// recipients. Schema-less transports typically use `serde_json::Value`;
/// strongly-typed buckets define their own enum or struct.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug)]
/// struct Note { id: Option<u64>, text: String }
///
/// impl Payload for Note {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Payload",
    label = "must be `Clone + Send + Sync + 'static`",
    note = "Bucket payloads must be cloneable for fan-out and thread-safe for async dispatch."
)]
pub trait Payload: Clone + Send + Sync + 'static {}

// Common Payload implementations
impl Payload for () {}
impl Payload for bool {}
impl Payload for i64 {}
impl Payload for u64 {}
impl Payload for f64 {}
impl Payload for String {}
impl Payload for &'static str {}
impl<T: Payload> Payload for Vec<T> {}
impl<T: Payload> Payload for Option<T> {}
impl<T: Payload> Payload for std::sync::Arc<T> {}

#[cfg(feature = "json")]
impl Payload for serde_json::Value {}
