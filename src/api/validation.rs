//! Utilities to help with API request validation.
//!
//! Only obviously absurd input is rejected here. The identity provider has the final say on what
//! an acceptable email or password is, and its errors are forwarded to the client.

use derive_more::derive::{AsRef, Deref, Display};
use serde::Deserialize;
use serde_with::SerializeDisplay;
use thiserror::Error;

/// A user's email address.
///
/// As per RFC 3696 erratum 1690, the theoretical maximum length is 254.
pub type UserEmail = BoundedString<3, 254>;

/// A user's password in plain text.
pub type UserPassword = BoundedString<1, 256>;

/// A [`String`] newtype that guarantees its length is within a certain range.
#[derive(
    Deref,
    AsRef,
    Display,
    Deserialize,
    SerializeDisplay,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
)]
#[as_ref(forward)]
#[serde(try_from = "String")]
pub struct BoundedString<const MIN: usize, const MAX: usize>(String);

impl<const MIN: usize, const MAX: usize> BoundedString<MIN, MAX> {
    /// Gets a reference to the wrapped string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An error constructing a [`BoundedString`].
#[derive(Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BoundedStringError<const MIN: usize, const MAX: usize> {
    /// The length was less than the [`BoundedString`]'s `MIN`.
    #[error("invalid length {0}, expected at least {MIN}")]
    TooShort(usize),

    /// The length was greater than the [`BoundedString`]'s `MAX`.
    #[error("invalid length {0}, expected at most {MAX}")]
    TooLong(usize),
}

impl<const MIN: usize, const MAX: usize> TryFrom<String> for BoundedString<MIN, MAX> {
    type Error = BoundedStringError<MIN, MAX>;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        let length = string.chars().count();

        if length < MIN {
            Err(BoundedStringError::TooShort(length))
        } else if length > MAX {
            Err(BoundedStringError::TooLong(length))
        } else {
            Ok(Self(string))
        }
    }
}
