//! Special-tariff cross-reference injection and ordering.

use chrono::NaiveDate;
use ciload_model::{CiLoadEntry, CiLoadInvoiceLine, CiLoadInvoiceTariff, normalize_hts};
use tracing::debug;

use crate::directories::SpecialTariffCatalog;

/// Inject the catalog's special tariff for a line, if any.
///
/// The line's primary HTS is its first tariff classification. A catalog hit
/// whose HTS is already present among the line's tariff lines (typically
/// keyed in manually upstream) injects nothing; re-resolution is idempotent.
/// The injected line carries the base classification's quantities and gross
/// weight with value and foreign value left blank, so the commercial value
/// stays attributed to the base line only.
pub fn inject_special_tariffs(
    line: &mut CiLoadInvoiceLine,
    catalog: &dyn SpecialTariffCatalog,
    import_country: &str,
    as_of: NaiveDate,
) {
    if let Some(injected) = synthesized_special_tariff(line, catalog, import_country, as_of) {
        line.tariff_lines.push(injected);
    }
    // The ordering contract holds with or without an injection: a manually
    // keyed 9903 line sorts ahead of the base classification too.
    sort_special_tariffs(&mut line.tariff_lines);
}

fn synthesized_special_tariff(
    line: &CiLoadInvoiceLine,
    catalog: &dyn SpecialTariffCatalog,
    import_country: &str,
    as_of: NaiveDate,
) -> Option<CiLoadInvoiceTariff> {
    let base = line.tariff_lines.first()?;
    let special = catalog.lookup(import_country, &base.hts, &line.country_of_origin, as_of)?;
    let special = normalize_hts(&special);
    if line.tariff_lines.iter().any(|tariff| tariff.hts == special) {
        debug!(
            line = %line.line_number,
            hts = %special,
            "special tariff already present, skipping injection"
        );
        return None;
    }
    debug!(line = %line.line_number, hts = %special, "injecting special tariff");
    Some(CiLoadInvoiceTariff {
        hts: special,
        gross_weight: base.gross_weight,
        quantity_1: base.quantity_1,
        uom_1: base.uom_1.clone(),
        quantity_2: base.quantity_2,
        uom_2: base.uom_2.clone(),
        quantity_3: base.quantity_3,
        uom_3: base.uom_3.clone(),
        ..CiLoadInvoiceTariff::default()
    })
}

/// Order tariff lines for emission: "9903"-prefixed classifications first,
/// then "9902"-prefixed, then everything else in original document order.
/// The sort is stable, so relative order within each band is preserved.
pub fn sort_special_tariffs(tariff_lines: &mut [CiLoadInvoiceTariff]) {
    tariff_lines.sort_by_key(|tariff| {
        if tariff.hts.starts_with("9903") {
            0u8
        } else if tariff.hts.starts_with("9902") {
            1
        } else {
            2
        }
    });
}

/// Resolve special tariffs across a whole entry.
///
/// The governing date for each invoice is its invoice date, falling back to
/// the entry's EDI-received date, then to the supplied default. With no date
/// at all the lookup is skipped; a dateless entry cannot match an
/// effective-dated catalog row.
pub fn resolve_entry_tariffs(
    entry: &mut CiLoadEntry,
    catalog: &dyn SpecialTariffCatalog,
    import_country: &str,
    default_date: Option<NaiveDate>,
) {
    let entry_date = entry
        .date(ciload_model::EntryDateCode::EdiReceived)
        .or(default_date);
    for invoice in &mut entry.invoices {
        let Some(as_of) = invoice.invoice_date.or(entry_date) else {
            debug!(
                invoice = %invoice.invoice_number,
                "no governing date, skipping special tariff resolution"
            );
            continue;
        };
        for line in &mut invoice.lines {
            inject_special_tariffs(line, catalog, import_country, as_of);
        }
    }
}
