//! Reference-data directory contracts.
//!
//! The compiler never reaches into a database; callers inject these traits
//! at construction time. The in-memory implementations double as
//! deterministic test fixtures and as the backing store for JSON fixture
//! files loaded by the CLI.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog of additional "special" HTS numbers (trade-remedy surcharges and
/// similar) required alongside a primary classification.
pub trait SpecialTariffCatalog {
    /// Look up the special HTS for an import-country/HTS/origin triple as of
    /// a governing date. `None` is the common case and injects nothing.
    fn lookup(
        &self,
        import_country: &str,
        hts: &str,
        origin_country: &str,
        as_of: NaiveDate,
    ) -> Option<String>;
}

/// Customer/address directory used to synthesize buyer parties.
pub trait BuyerDirectory {
    /// Resolve one numbered address of a customer.
    fn resolve_customer_address(&self, customer: &str, address: &str) -> Option<CustomerAddress>;
}

/// Manufacturer directory keyed by MID.
pub trait ManufacturerDirectory {
    fn resolve_manufacturer(&self, mid: &str) -> Option<ManufacturerRecord>;
}

/// One numbered address of a customer account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub customer_number: String,
    /// Address slot number, "1" being the primary address.
    pub address_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub subentity: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip: String,
}

/// One manufacturer record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerRecord {
    pub mid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub subentity: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip: String,
    /// Inactive records exist for audit history and never satisfy a lookup.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// One special-tariff cross reference with an optional effective window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialTariffCrossReference {
    pub import_country: String,
    pub hts: String,
    pub origin_country: String,
    pub special_hts: String,
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl SpecialTariffCrossReference {
    fn matches(
        &self,
        import_country: &str,
        hts: &str,
        origin_country: &str,
        as_of: NaiveDate,
    ) -> bool {
        self.import_country.eq_ignore_ascii_case(import_country)
            && self.hts == hts
            && self.origin_country.eq_ignore_ascii_case(origin_country)
            && self.effective_from.is_none_or(|from| as_of >= from)
            && self.effective_to.is_none_or(|to| as_of <= to)
    }
}

/// In-memory special-tariff catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySpecialTariffCatalog {
    #[serde(default)]
    pub entries: Vec<SpecialTariffCrossReference>,
}

impl SpecialTariffCatalog for InMemorySpecialTariffCatalog {
    fn lookup(
        &self,
        import_country: &str,
        hts: &str,
        origin_country: &str,
        as_of: NaiveDate,
    ) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.matches(import_country, hts, origin_country, as_of))
            .map(|entry| entry.special_hts.clone())
    }
}

/// In-memory buyer/customer address directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryBuyerDirectory {
    #[serde(default)]
    pub addresses: Vec<CustomerAddress>,
}

impl BuyerDirectory for InMemoryBuyerDirectory {
    fn resolve_customer_address(&self, customer: &str, address: &str) -> Option<CustomerAddress> {
        self.addresses
            .iter()
            .find(|addr| {
                addr.customer_number.eq_ignore_ascii_case(customer)
                    && addr.address_number == address
            })
            .cloned()
    }
}

/// In-memory manufacturer directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryManufacturerDirectory {
    #[serde(default)]
    pub records: Vec<ManufacturerRecord>,
}

impl ManufacturerDirectory for InMemoryManufacturerDirectory {
    fn resolve_manufacturer(&self, mid: &str) -> Option<ManufacturerRecord> {
        self.records
            .iter()
            .find(|record| record.mid.eq_ignore_ascii_case(mid))
            .cloned()
    }
}
