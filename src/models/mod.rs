// src/models/mod.rs
pub mod company;
pub mod job;
pub mod user;

pub use company::*;
pub use job::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// For `Option<Option<T>>` patch fields: absent stays `None`, `null` becomes `Some(None)`.
/// Pair with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
