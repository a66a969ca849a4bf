//! Error types shared across the CI Load compilation pipeline.

use thiserror::Error;

/// Errors that abort a declaration compilation.
///
/// Every variant is fatal: the compiler never returns a partially-built
/// document. Absence of a special-tariff catalog match is not represented
/// here because it is the common case and simply injects nothing.
#[derive(Debug, Error)]
pub enum CiLoadError {
    /// A key field exceeds its maximum wire length. Key fields are never
    /// truncated; the upstream data must be corrected and resubmitted.
    #[error("value for {field} exceeds {limit} characters: '{value}'")]
    DataOverflow {
        field: &'static str,
        limit: usize,
        value: String,
    },

    /// A manufacturer identifier has no record in the directory.
    #[error("unknown manufacturer id: {mid}")]
    UnknownManufacturer { mid: String },

    /// A manufacturer record exists but is marked inactive.
    #[error("manufacturer id {mid} is inactive")]
    InactiveManufacturer { mid: String },

    /// No address record for a buyer customer number.
    #[error("no address {address} on file for customer {customer}")]
    MissingBuyerAddress { customer: String, address: String },

    /// A consolidation chain runs deeper than one parent/child hop.
    #[error("line {line_number} consolidates into an already-consolidated line")]
    ConsolidationDepth { line_number: String },

    /// A field value violates its format contract (negative amount,
    /// non-numeric line number).
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// I/O error while emitting the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Result type alias for CI Load operations.
pub type Result<T> = std::result::Result<T, CiLoadError>;

impl CiLoadError {
    /// Create a DataOverflow error.
    pub fn data_overflow(field: &'static str, limit: usize, value: impl Into<String>) -> Self {
        Self::DataOverflow {
            field,
            limit,
            value: value.into(),
        }
    }

    /// Create an UnknownManufacturer error.
    pub fn unknown_manufacturer(mid: impl Into<String>) -> Self {
        Self::UnknownManufacturer { mid: mid.into() }
    }

    /// Create an InactiveManufacturer error.
    pub fn inactive_manufacturer(mid: impl Into<String>) -> Self {
        Self::InactiveManufacturer { mid: mid.into() }
    }

    /// Create a MissingBuyerAddress error.
    pub fn missing_buyer_address(customer: impl Into<String>, address: impl Into<String>) -> Self {
        Self::MissingBuyerAddress {
            customer: customer.into(),
            address: address.into(),
        }
    }

    /// Create a ConsolidationDepth error.
    pub fn consolidation_depth(line_number: impl Into<String>) -> Self {
        Self::ConsolidationDepth {
            line_number: line_number.into(),
        }
    }

    /// Create an InvalidValue error.
    pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
