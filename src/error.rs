use thiserror::Error;

/// Failures produced by the builder itself. Driver failures are not wrapped
/// and propagate through [`crate::Result`] unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuarryError {
    /// The value has no parameter type tag, so it can never be bound.
    #[error("bindings with type {0} are not allowed")]
    UnrecognizedBindingType(&'static str),
    /// A dynamic method name did not decompose into a known pattern.
    #[error("call to undefined method Builder::{0}()")]
    UnknownMethod(String),
    /// A dynamic method was invoked with too few required arguments.
    #[error(
        "too few arguments to Builder::{method}(), {received} passed and exactly {expected} expected"
    )]
    ArityError {
        method: String,
        received: usize,
        expected: usize,
    },
}
