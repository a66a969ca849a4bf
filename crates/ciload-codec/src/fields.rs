//! Field-length contracts.
//!
//! Every string field on the wire carries a declared maximum length. Key
//! fields (part number, tariff number) are never truncated: exceeding the
//! limit is a fatal [`CiLoadError::DataOverflow`]. Every other field is
//! silently right-truncated to fit.

use ciload_model::{CiLoadError, Result};

use crate::scalar::sanitize_ascii;

/// Overflow handling for a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Overflow is fatal; the value identifies goods and must not be cut.
    Key,
    /// Overflow is corrected by right-truncation.
    Truncated,
}

/// Declared wire contract for one string field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub limit: usize,
    pub kind: FieldKind,
}

/// The field-length table, keyed by wire field name.
///
/// Bill numbers have no limit in their primary fields; only the `*Addl`
/// copies are capped at 12 characters.
const FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec { name: "partNo", limit: 40, kind: FieldKind::Key },
    FieldSpec { name: "tariffNo", limit: 10, kind: FieldKind::Key },
    FieldSpec { name: "masterBillAddl", limit: 12, kind: FieldKind::Truncated },
    FieldSpec { name: "houseBillAddl", limit: 12, kind: FieldKind::Truncated },
    FieldSpec { name: "subBillAddl", limit: 12, kind: FieldKind::Truncated },
    FieldSpec { name: "subSubBillAddl", limit: 12, kind: FieldKind::Truncated },
    FieldSpec { name: "descr", limit: 350, kind: FieldKind::Truncated },
    FieldSpec { name: "manufacturerId", limit: 15, kind: FieldKind::Truncated },
    FieldSpec { name: "sellerMid", limit: 15, kind: FieldKind::Truncated },
    FieldSpec { name: "custNo", limit: 10, kind: FieldKind::Truncated },
    FieldSpec { name: "commInvNo", limit: 22, kind: FieldKind::Truncated },
    FieldSpec { name: "countryOrigin", limit: 2, kind: FieldKind::Truncated },
    FieldSpec { name: "countryExport", limit: 2, kind: FieldKind::Truncated },
    FieldSpec { name: "scac", limit: 4, kind: FieldKind::Truncated },
    FieldSpec { name: "currency", limit: 3, kind: FieldKind::Truncated },
    FieldSpec { name: "spi1", limit: 2, kind: FieldKind::Truncated },
    FieldSpec { name: "spi2", limit: 2, kind: FieldKind::Truncated },
    FieldSpec { name: "vesselAirlineName", limit: 20, kind: FieldKind::Truncated },
    FieldSpec { name: "voyageFlightNo", limit: 10, kind: FieldKind::Truncated },
    FieldSpec { name: "carrier", limit: 4, kind: FieldKind::Truncated },
    FieldSpec { name: "portLading", limit: 5, kind: FieldKind::Truncated },
    FieldSpec { name: "portDist", limit: 4, kind: FieldKind::Truncated },
    FieldSpec { name: "containerNo", limit: 15, kind: FieldKind::Truncated },
    FieldSpec { name: "sealNo", limit: 15, kind: FieldKind::Truncated },
    FieldSpec { name: "name", limit: 100, kind: FieldKind::Truncated },
    FieldSpec { name: "address1", limit: 100, kind: FieldKind::Truncated },
    FieldSpec { name: "address2", limit: 100, kind: FieldKind::Truncated },
    FieldSpec { name: "address3", limit: 100, kind: FieldKind::Truncated },
    FieldSpec { name: "city", limit: 50, kind: FieldKind::Truncated },
    FieldSpec { name: "countrySubentity", limit: 9, kind: FieldKind::Truncated },
    FieldSpec { name: "zip", limit: 10, kind: FieldKind::Truncated },
    FieldSpec { name: "uom", limit: 6, kind: FieldKind::Truncated },
];

impl FieldSpec {
    /// Render a value under this field's contract.
    pub fn render(&self, value: &str) -> Result<String> {
        let clean = sanitize_ascii(value);
        if clean.len() <= self.limit {
            return Ok(clean);
        }
        match self.kind {
            FieldKind::Key => Err(CiLoadError::data_overflow(self.name, self.limit, clean)),
            FieldKind::Truncated => Ok(clean[..self.limit].to_string()),
        }
    }
}

/// Look up the declared contract for a wire field name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.name == name)
}

/// All declared field contracts, in table order.
pub fn field_specs() -> &'static [FieldSpec] {
    FIELD_SPECS
}

/// Render a string value for a wire field.
///
/// Fields without a declared limit are sanitized only; fields with one are
/// length-checked per their [`FieldKind`].
pub fn wire_string(name: &'static str, value: &str) -> Result<String> {
    match field_spec(name) {
        Some(spec) => spec.render(value),
        None => Ok(sanitize_ascii(value)),
    }
}
