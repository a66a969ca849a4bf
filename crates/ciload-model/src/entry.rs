//! Canonical CI Load entry model.
//!
//! A `CiLoadEntry` is the intermediate representation of one customs entry:
//! header identifiers, typed dates, bills of lading, containers and invoice
//! detail down to individual tariff classifications. Source-specific
//! translators assemble one entry per upstream document and hand it to the
//! declaration compiler by value; the model itself is never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::party::Party;

/// One customs entry, owning all child collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiLoadEntry {
    pub file_number: String,
    /// Importer account code with the filing engine.
    pub customer: String,
    #[serde(default)]
    pub vessel: String,
    #[serde(default)]
    pub voyage: String,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub port_of_lading: String,
    #[serde(default)]
    pub port_of_unlading: String,
    #[serde(default)]
    pub dates: Vec<EntryDate>,
    #[serde(default)]
    pub containers: Vec<CiLoadContainer>,
    #[serde(default)]
    pub bills_of_lading: Vec<CiLoadBillOfLading>,
    #[serde(default)]
    pub invoices: Vec<CiLoadInvoice>,
}

impl CiLoadEntry {
    pub fn new(file_number: impl Into<String>, customer: impl Into<String>) -> Self {
        Self {
            file_number: file_number.into(),
            customer: customer.into(),
            ..Self::default()
        }
    }

    /// Look up a typed entry date by code.
    pub fn date(&self, code: EntryDateCode) -> Option<NaiveDate> {
        self.dates
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.date)
    }
}

/// Entry-level date typed by code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryDate {
    pub code: EntryDateCode,
    pub date: NaiveDate,
}

/// Date codes carried at the entry header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDateCode {
    EstArrival,
    Arrival,
    Export,
    EdiReceived,
}

impl EntryDateCode {
    /// Numeric tracking code expected by the downstream filing engine.
    pub fn wire_no(&self) -> &'static str {
        match self {
            EntryDateCode::EstArrival => "1",
            EntryDateCode::Arrival => "2",
            EntryDateCode::Export => "3",
            EntryDateCode::EdiReceived => "4",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryDateCode::EstArrival => "est_arrival",
            EntryDateCode::Arrival => "arrival",
            EntryDateCode::Export => "export",
            EntryDateCode::EdiReceived => "edi_received",
        }
    }
}

impl fmt::Display for EntryDateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryDateCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "est_arrival" => Ok(EntryDateCode::EstArrival),
            "arrival" => Ok(EntryDateCode::Arrival),
            "export" => Ok(EntryDateCode::Export),
            "edi_received" => Ok(EntryDateCode::EdiReceived),
            _ => Err(format!("Unknown entry date code: {s}")),
        }
    }
}

/// One bill of lading on the entry.
///
/// The four bill levels are all optional; an ocean entry typically carries a
/// master and house bill, an in-bond move may carry sub bills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiLoadBillOfLading {
    #[serde(default)]
    pub master_bill: String,
    #[serde(default)]
    pub house_bill: String,
    #[serde(default)]
    pub sub_bill: String,
    #[serde(default)]
    pub sub_sub_bill: String,
    #[serde(default)]
    pub scac: String,
    #[serde(default)]
    pub pieces: Option<u32>,
    #[serde(default)]
    pub pieces_uom: String,
}

/// One container on the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiLoadContainer {
    pub container_number: String,
    #[serde(default)]
    pub seal_number: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub pieces: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

/// One commercial invoice on the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiLoadInvoice {
    pub invoice_number: String,
    /// Per-invoice override of the entry file number.
    #[serde(default)]
    pub file_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub charges: Option<f64>,
    #[serde(default)]
    pub net_weight: Option<f64>,
    #[serde(default)]
    pub net_weight_uom: String,
    #[serde(default)]
    pub lines: Vec<CiLoadInvoiceLine>,
}

impl CiLoadInvoice {
    pub fn new(invoice_number: impl Into<String>) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            ..Self::default()
        }
    }
}

/// One invoice line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiLoadInvoiceLine {
    /// Normalized numeric line number within the invoice.
    pub line_number: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub country_of_origin: String,
    #[serde(default)]
    pub country_of_export: String,
    #[serde(default)]
    pub pieces: Option<u32>,
    #[serde(default)]
    pub cartons: Option<u32>,
    #[serde(default)]
    pub gross_weight: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub foreign_value: Option<f64>,
    #[serde(default)]
    pub first_sale: Option<f64>,
    #[serde(default)]
    pub non_dutiable_amount: Option<f64>,
    #[serde(default)]
    pub add_to_make_amount: Option<f64>,
    #[serde(default)]
    pub other_amount: Option<f64>,
    #[serde(default)]
    pub miscellaneous_discount: Option<f64>,
    #[serde(default)]
    pub freight_amount: Option<f64>,
    #[serde(default)]
    pub related_parties: Option<bool>,
    /// Manufacturer identification code for the line.
    #[serde(default)]
    pub mid: String,
    /// MID used to synthesize the seller party when no explicit parties are given.
    #[serde(default)]
    pub seller_mid: String,
    /// Customer code used to synthesize the buyer party, optionally suffixed
    /// `-N` to select address N.
    #[serde(default)]
    pub buyer_customer_number: String,
    /// Explicit party overrides keyed by qualifier. When present these are
    /// used verbatim instead of buyer/seller synthesis.
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub tariff_lines: Vec<CiLoadInvoiceTariff>,
    /// Line this one consolidates into, when part of a parent/child group.
    #[serde(default)]
    pub parent_line_number: Option<String>,
    /// Bill-of-materials expansion group marker. XVV lines are never
    /// consolidated regardless of parent/child linkage.
    #[serde(default)]
    pub xvv: bool,
}

impl CiLoadInvoiceLine {
    pub fn new(line_number: impl Into<String>) -> Self {
        Self {
            line_number: line_number.into(),
            ..Self::default()
        }
    }
}

/// One tariff classification under an invoice line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiLoadInvoiceTariff {
    /// HTS number, digits only.
    pub hts: String,
    #[serde(default)]
    pub spi: String,
    #[serde(default)]
    pub spi2: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub foreign_value: Option<f64>,
    #[serde(default)]
    pub gross_weight: Option<f64>,
    #[serde(default)]
    pub quantity_1: Option<f64>,
    #[serde(default)]
    pub uom_1: String,
    #[serde(default)]
    pub quantity_2: Option<f64>,
    #[serde(default)]
    pub uom_2: String,
    #[serde(default)]
    pub quantity_3: Option<f64>,
    #[serde(default)]
    pub uom_3: String,
}

impl CiLoadInvoiceTariff {
    /// Create a tariff line, keeping only the digits of the supplied HTS.
    pub fn new(hts: &str) -> Self {
        Self {
            hts: normalize_hts(hts),
            ..Self::default()
        }
    }
}

/// Strip punctuation from an HTS number, keeping digits only.
pub fn normalize_hts(hts: &str) -> String {
    hts.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize a line-number string to its canonical numeric form.
///
/// Upstream feeds zero-pad inconsistently ("01" vs "1"); parent/child
/// matching and wire emission both use the normalized form. Returns `None`
/// when the input is not a plain unsigned number.
pub fn normalize_line_number(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let stripped = trimmed.trim_start_matches('0');
    if stripped.is_empty() {
        Some("0".to_string())
    } else {
        Some(stripped.to_string())
    }
}
