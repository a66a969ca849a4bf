//! Reference-data resolution for CI Load compilation.
//!
//! - **directories**: injected repository traits and in-memory fixtures
//! - **tariff**: special-tariff cross-reference injection and ordering
//! - **party**: buyer/seller synthesis and MID verification

pub mod directories;
pub mod party;
pub mod tariff;

pub use directories::{
    BuyerDirectory, CustomerAddress, InMemoryBuyerDirectory, InMemoryManufacturerDirectory,
    InMemorySpecialTariffCatalog, ManufacturerDirectory, ManufacturerRecord, SpecialTariffCatalog,
    SpecialTariffCrossReference,
};
pub use party::{
    ResolvedLineParties, resolve_line_mid, resolve_line_parties, split_customer_address,
};
pub use tariff::{inject_special_tariffs, resolve_entry_tariffs, sort_special_tariffs};
