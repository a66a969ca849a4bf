//! Shipment/invoice declaration emission.
//!
//! Sibling order within every node is fixed and significant; the downstream
//! schema is positional. Identifying keys (file number, customer, invoice
//! number, line number) repeat at each nesting level.

use std::io::Write;

use quick_xml::Writer;
use tracing::debug;

use ciload_model::{
    CiLoadBillOfLading, CiLoadContainer, CiLoadEntry, CiLoadInvoice, CiLoadInvoiceLine,
    CiLoadInvoiceTariff, Party, Result,
};
use ciload_resolve::{BuyerDirectory, ManufacturerDirectory, resolve_line_parties};

use crate::defaults::{NodeDefaults, NodeTag};
use crate::writer::{
    count_value, date_value, decimal_value, end, field, flag_value, money_value, quantity_value,
    start,
};

/// Identifying keys repeated at every level of one shipment.
struct ShipmentKeys<'a> {
    file_number: &'a str,
    customer: &'a str,
}

pub(crate) fn write_shipments<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    entries: &[CiLoadEntry],
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<()> {
    start(xml, "ediShipments")?;
    for entry in entries {
        write_shipment(xml, defaults, entry, buyers, manufacturers)?;
    }
    end(xml, "ediShipments")
}

fn write_shipment<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    entry: &CiLoadEntry,
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<()> {
    let keys = ShipmentKeys {
        file_number: &entry.file_number,
        customer: &entry.customer,
    };
    let node = defaults.fields(NodeTag::Shipment);
    let (total_pieces, total_weight) = shipment_rollup(entry);
    // With several master bills at the header, bill-level piece attribution
    // is ambiguous and omitted outright.
    let multiple_masters = entry
        .bills_of_lading
        .iter()
        .filter(|bill| !bill.master_bill.is_empty())
        .count()
        > 1;
    debug!(file = %entry.file_number, pieces = total_pieces, "writing shipment");

    start(xml, "ediShipment")?;
    field(xml, node, "fileNo", keys.file_number)?;
    field(xml, node, "custNo", keys.customer)?;
    field(xml, node, "vesselAirlineName", &entry.vessel)?;
    field(xml, node, "voyageFlightNo", &entry.voyage)?;
    field(xml, node, "carrier", &entry.carrier)?;
    field(xml, node, "portLading", &entry.port_of_lading)?;
    field(xml, node, "portDist", &entry.port_of_unlading)?;
    let piece_count = if total_pieces > 0 {
        total_pieces.to_string()
    } else {
        String::new()
    };
    field(xml, node, "pieceCount", &piece_count)?;
    field(
        xml,
        node,
        "weightGross",
        &decimal_value("weightGross", total_weight)?,
    )?;

    start(xml, "EdiShipmentDatesList")?;
    for entry_date in &entry.dates {
        start(xml, "EdiShipmentDates")?;
        field(xml, None, "fileNo", keys.file_number)?;
        field(xml, None, "custNo", keys.customer)?;
        field(xml, None, "tracingDateNo", entry_date.code.wire_no())?;
        field(xml, None, "dateValue", &date_value(Some(entry_date.date)))?;
        end(xml, "EdiShipmentDates")?;
    }
    end(xml, "EdiShipmentDatesList")?;

    start(xml, "EdiShipmentIdList")?;
    for (idx, bill) in entry.bills_of_lading.iter().enumerate() {
        write_bill(xml, defaults, &keys, idx + 1, bill, multiple_masters)?;
    }
    end(xml, "EdiShipmentIdList")?;

    start(xml, "EdiContainersList")?;
    for container in &entry.containers {
        write_container(xml, defaults, &keys, container)?;
    }
    end(xml, "EdiContainersList")?;

    start(xml, "EdiInvoiceHeaderList")?;
    for invoice in &entry.invoices {
        write_invoice(xml, defaults, &keys, invoice, buyers, manufacturers)?;
    }
    end(xml, "EdiInvoiceHeaderList")?;

    end(xml, "ediShipment")
}

/// Total declared pieces and gross weight across all invoice lines.
fn shipment_rollup(entry: &CiLoadEntry) -> (u64, Option<f64>) {
    let mut pieces: u64 = 0;
    let mut weight: Option<f64> = None;
    for invoice in &entry.invoices {
        for line in &invoice.lines {
            pieces += u64::from(line.pieces.unwrap_or(0));
            if let Some(gross) = line.gross_weight {
                weight = Some(weight.unwrap_or(0.0) + gross);
            }
        }
    }
    (pieces, weight)
}

fn write_bill<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    keys: &ShipmentKeys<'_>,
    seq: usize,
    bill: &CiLoadBillOfLading,
    multiple_masters: bool,
) -> Result<()> {
    let node = defaults.fields(NodeTag::BillOfLading);
    start(xml, "EdiShipmentId")?;
    field(xml, node, "fileNo", keys.file_number)?;
    field(xml, node, "custNo", keys.customer)?;
    field(xml, None, "seqNo", &seq.to_string())?;
    // Primary fields keep the full numbers; the Addl copies are capped at
    // 12 characters by the field table.
    field(xml, node, "masterBill", &bill.master_bill)?;
    field(xml, node, "houseBill", &bill.house_bill)?;
    field(xml, node, "subBill", &bill.sub_bill)?;
    field(xml, node, "subSubBill", &bill.sub_sub_bill)?;
    field(xml, node, "masterBillAddl", &bill.master_bill)?;
    field(xml, node, "houseBillAddl", &bill.house_bill)?;
    field(xml, node, "subBillAddl", &bill.sub_bill)?;
    field(xml, node, "subSubBillAddl", &bill.sub_sub_bill)?;
    field(xml, node, "scac", &bill.scac)?;
    if !multiple_masters {
        field(xml, node, "qty", &count_value(bill.pieces))?;
        field(xml, node, "uom", &bill.pieces_uom)?;
    }
    end(xml, "EdiShipmentId")
}

fn write_container<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    keys: &ShipmentKeys<'_>,
    container: &CiLoadContainer,
) -> Result<()> {
    let node = defaults.fields(NodeTag::Container);
    start(xml, "EdiContainers")?;
    field(xml, node, "fileNo", keys.file_number)?;
    field(xml, node, "custNo", keys.customer)?;
    field(xml, node, "containerNo", &container.container_number)?;
    field(xml, node, "sealNo", &container.seal_number)?;
    field(xml, node, "containerSize", &container.size)?;
    field(xml, node, "qty", &count_value(container.pieces))?;
    field(
        xml,
        node,
        "weight",
        &decimal_value("weight", container.weight_kg)?,
    )?;
    end(xml, "EdiContainers")
}

fn write_invoice<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    keys: &ShipmentKeys<'_>,
    invoice: &CiLoadInvoice,
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<()> {
    let node = defaults.fields(NodeTag::InvoiceHeader);
    // A per-invoice file number override applies to the invoice subtree.
    let file_number = invoice.file_number.as_deref().unwrap_or(keys.file_number);
    start(xml, "EdiInvoiceHeader")?;
    field(xml, node, "fileNo", file_number)?;
    field(xml, node, "custNo", keys.customer)?;
    field(xml, node, "commInvNo", &invoice.invoice_number)?;
    field(xml, node, "dateInvoice", &date_value(invoice.invoice_date))?;
    field(xml, node, "currency", &invoice.currency)?;
    field(
        xml,
        node,
        "exchangeRate",
        &decimal_value("exchangeRate", invoice.exchange_rate)?,
    )?;
    field(
        xml,
        node,
        "chargesAmt",
        &money_value("chargesAmt", invoice.charges)?,
    )?;
    field(
        xml,
        node,
        "netWeight",
        &decimal_value("netWeight", invoice.net_weight)?,
    )?;
    field(xml, node, "netWeightUom", &invoice.net_weight_uom)?;

    start(xml, "EdiInvoiceLinesList")?;
    for line in &invoice.lines {
        write_line(
            xml,
            defaults,
            file_number,
            keys.customer,
            &invoice.invoice_number,
            line,
            buyers,
            manufacturers,
        )?;
    }
    end(xml, "EdiInvoiceLinesList")?;
    end(xml, "EdiInvoiceHeader")
}

#[allow(clippy::too_many_arguments)]
fn write_line<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    file_number: &str,
    customer: &str,
    invoice_number: &str,
    line: &CiLoadInvoiceLine,
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<()> {
    let node = defaults.fields(NodeTag::InvoiceLine);
    let resolved = resolve_line_parties(line, buyers, manufacturers)?;
    start(xml, "EdiInvoiceLines")?;
    field(xml, node, "fileNo", file_number)?;
    field(xml, node, "custNo", customer)?;
    field(xml, node, "commInvNo", invoice_number)?;
    field(xml, node, "commInvLineNo", &line.line_number)?;
    field(xml, node, "partNo", &line.part_number)?;
    field(xml, node, "countryOrigin", &line.country_of_origin)?;
    field(xml, node, "countryExport", &line.country_of_export)?;
    field(xml, node, "descr", &line.description)?;
    field(xml, node, "pieceCount", &count_value(line.pieces))?;
    field(xml, node, "cartons", &count_value(line.cartons))?;
    field(
        xml,
        node,
        "weightGross",
        &decimal_value("weightGross", line.gross_weight)?,
    )?;
    field(
        xml,
        node,
        "unitPrice",
        &decimal_value("unitPrice", line.unit_price)?,
    )?;
    field(
        xml,
        node,
        "valueForeign",
        &money_value("valueForeign", line.foreign_value)?,
    )?;
    field(xml, node, "valueUs", &money_value("valueUs", line.value)?)?;
    field(
        xml,
        node,
        "firstSale",
        &money_value("firstSale", line.first_sale)?,
    )?;
    field(
        xml,
        node,
        "nonDutiableAmt",
        &money_value("nonDutiableAmt", line.non_dutiable_amount)?,
    )?;
    field(
        xml,
        node,
        "addToMakeAmt",
        &money_value("addToMakeAmt", line.add_to_make_amount)?,
    )?;
    field(
        xml,
        node,
        "otherAmt",
        &money_value("otherAmt", line.other_amount)?,
    )?;
    field(
        xml,
        node,
        "miscDiscount",
        &money_value("miscDiscount", line.miscellaneous_discount)?,
    )?;
    field(
        xml,
        node,
        "freightAmt",
        &money_value("freightAmt", line.freight_amount)?,
    )?;
    field(xml, node, "relatedParties", &flag_value(line.related_parties))?;
    field(xml, node, "manufacturerId", &resolved.mid)?;
    field(xml, node, "buyerCustNo", &line.buyer_customer_number)?;

    start(xml, "EdiInvoiceTariffClassList")?;
    for (idx, tariff) in line.tariff_lines.iter().enumerate() {
        write_tariff(
            xml,
            defaults,
            file_number,
            customer,
            invoice_number,
            &line.line_number,
            idx + 1,
            tariff,
        )?;
    }
    end(xml, "EdiInvoiceTariffClassList")?;

    start(xml, "EdiInvoicePartyList")?;
    for party in &resolved.parties {
        write_party(
            xml,
            defaults,
            file_number,
            customer,
            invoice_number,
            &line.line_number,
            party,
        )?;
    }
    end(xml, "EdiInvoicePartyList")?;
    end(xml, "EdiInvoiceLines")
}

#[allow(clippy::too_many_arguments)]
fn write_tariff<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    file_number: &str,
    customer: &str,
    invoice_number: &str,
    line_number: &str,
    seq: usize,
    tariff: &CiLoadInvoiceTariff,
) -> Result<()> {
    let node = defaults.fields(NodeTag::TariffClass);
    start(xml, "EdiInvoiceTariffClass")?;
    field(xml, node, "fileNo", file_number)?;
    field(xml, node, "custNo", customer)?;
    field(xml, node, "commInvNo", invoice_number)?;
    field(xml, node, "commInvLineNo", line_number)?;
    field(xml, None, "seqNo", &seq.to_string())?;
    field(xml, node, "tariffNo", &tariff.hts)?;
    field(xml, node, "spi1", &tariff.spi)?;
    field(xml, node, "spi2", &tariff.spi2)?;
    field(
        xml,
        node,
        "weightGross",
        &decimal_value("weightGross", tariff.gross_weight)?,
    )?;
    field(
        xml,
        node,
        "valueForeign",
        &money_value("valueForeign", tariff.foreign_value)?,
    )?;
    field(xml, node, "valueUs", &money_value("valueUs", tariff.value)?)?;
    field(xml, node, "qty1", &quantity_value("qty1", tariff.quantity_1)?)?;
    field(xml, node, "uom1", &tariff.uom_1)?;
    field(xml, node, "qty2", &quantity_value("qty2", tariff.quantity_2)?)?;
    field(xml, node, "uom2", &tariff.uom_2)?;
    field(xml, node, "qty3", &quantity_value("qty3", tariff.quantity_3)?)?;
    field(xml, node, "uom3", &tariff.uom_3)?;
    end(xml, "EdiInvoiceTariffClass")
}

fn write_party<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    file_number: &str,
    customer: &str,
    invoice_number: &str,
    line_number: &str,
    party: &Party,
) -> Result<()> {
    let node = defaults.fields(NodeTag::Party);
    let qualifier = party.qualifier.map(|q| q.as_str()).unwrap_or_default();
    start(xml, "EdiInvoiceParty")?;
    field(xml, node, "fileNo", file_number)?;
    field(xml, node, "custNo", customer)?;
    field(xml, node, "commInvNo", invoice_number)?;
    field(xml, node, "commInvLineNo", line_number)?;
    field(xml, node, "partiesQualifier", qualifier)?;
    field(xml, node, "partiesCustNo", &party.customer_number)?;
    field(xml, node, "name", &party.name)?;
    field(xml, node, "address1", &party.address_1)?;
    field(xml, node, "address2", &party.address_2)?;
    field(xml, node, "address3", &party.address_3)?;
    field(xml, node, "city", &party.city)?;
    field(xml, node, "countrySubentity", &party.subentity)?;
    field(xml, node, "country", &party.country)?;
    field(xml, node, "zip", &party.zip)?;
    field(xml, node, "partiesMid", &party.mid)?;
    end(xml, "EdiInvoiceParty")
}
