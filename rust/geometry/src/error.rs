// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
///
/// Path data and transform lists never produce errors: they degrade to
/// whatever could be parsed. Only scalar values that must be numbers do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid number: {value:?}")]
    InvalidNumber { value: String },
}

impl Error {
    pub fn invalid_number(value: impl Into<String>) -> Self {
        Error::InvalidNumber {
            value: value.into(),
        }
    }
}
