//! Canonical data model and shared error types for CI Load compilation.

pub mod entry;
pub mod error;
pub mod party;

pub use entry::{
    CiLoadBillOfLading, CiLoadContainer, CiLoadEntry, CiLoadInvoice, CiLoadInvoiceLine,
    CiLoadInvoiceTariff, EntryDate, EntryDateCode, normalize_hts, normalize_line_number,
};
pub use error::{CiLoadError, Result};
pub use party::{Party, PartyQualifier};
