use serde::{Deserialize, Serialize};

/// A decoded value paired with the exact bytes it was decoded from.
///
/// The parser needs both: `value` for validation and business logic, `raw` so that
/// transaction hashing can re-concatenate the original pre-image without having to
/// canonicalize var-ints or re-encode integers (and risk drifting from what was
/// actually on disk).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField<T> {
    pub value: T,
    pub raw: Vec<u8>,
}

impl<T> RawField<T> {
    pub fn new(value: T, raw: Vec<u8>) -> Self {
        Self { value, raw }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RawField<U> {
        RawField {
            value: f(self.value),
            raw: self.raw,
        }
    }
}

impl<T> AsRef<[u8]> for RawField<T> {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}
