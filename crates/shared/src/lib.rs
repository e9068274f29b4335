//! Wire types shared between the search client and anything speaking the
//! `/search` protocol.

pub mod domain;
pub mod error;
pub mod protocol;
