//! Conversions between optional values and their nullable storage form.
//!
//! Inside the crate an absent value is always `None`. Some upstream payloads
//! zero-fill missing attributes instead; [`from_zero_sentinel`] is the one
//! place where such a zero is read as "absent". This is lossy: a genuine zero
//! cost or zero successful runs coming through that path is dropped as well.

use chrono::{DateTime, Utc};

/// A type with a natural zero that zero-filling payloads use for "absent".
pub trait ZeroSentinel: Sized {
    fn is_zero_sentinel(&self) -> bool;
}

macro_rules! zero_sentinel_numeric {
    ($($t:ty),*) => {
        $(
            impl ZeroSentinel for $t {
                fn is_zero_sentinel(&self) -> bool {
                    *self == <$t>::default()
                }
            }
        )*
    };
}

zero_sentinel_numeric!(i32, i64, f32, f64);

/// The zero instant of a timestamp is the Unix epoch, chrono's default.
impl ZeroSentinel for DateTime<Utc> {
    fn is_zero_sentinel(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

/// Reads a zero-filled value: the zero sentinel becomes `None`.
pub fn from_zero_sentinel<T: ZeroSentinel>(value: T) -> Option<T> {
    if value.is_zero_sentinel() {
        None
    } else {
        Some(value)
    }
}

/// Writes a value in zero-filled form: `None` becomes the zero sentinel.
pub fn to_zero_sentinel<T: ZeroSentinel + Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

/// Maps an optional value into its nullable column type.
pub fn to_storage<T, S>(value: Option<T>) -> Option<S>
where
    S: From<T>,
{
    value.map(S::from)
}

/// Maps a nullable float column back into single precision.
pub fn f32_from_storage(value: Option<f64>) -> Option<f32> {
    value.map(|v| v as f32)
}

/// Combines two values that are only meaningful together.
pub fn paired<A, B>(a: Option<A>, b: Option<B>) -> Option<(A, B)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => None,
    }
}
