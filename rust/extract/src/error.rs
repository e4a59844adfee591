// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for drawing extraction.

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Document-level failures. Any of these aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not well-formed XML.
    #[error("malformed document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// No `svg` element exists in the document.
    #[error("no <svg> root element found")]
    MissingRoot,

    /// A numeric attribute is present but is not a number.
    #[error("invalid {attribute} on <{element}>: {value:?}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// A configuration file could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_attribute(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Error::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}
