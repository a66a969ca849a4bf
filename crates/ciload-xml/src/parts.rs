//! Parts (product catalog) declaration emission.
//!
//! A parts declaration uploads the classification detail of each invoice
//! line as a `CatCiLine` record instead of a full shipment. The `CatCiLine`
//! node is the customary home of caller defaults (product line, special
//! program indicators shared by a whole catalog).

use std::io::Write;

use quick_xml::Writer;

use ciload_model::{CiLoadEntry, CiLoadInvoiceLine, Result};
use ciload_resolve::{BuyerDirectory, ManufacturerDirectory, resolve_line_parties};

use crate::defaults::{NodeDefaults, NodeTag};
use crate::writer::{end, field, start};

pub(crate) fn write_parts<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    entries: &[CiLoadEntry],
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<()> {
    start(xml, "parts")?;
    start(xml, "CatCiLineList")?;
    for entry in entries {
        for invoice in &entry.invoices {
            for line in &invoice.lines {
                write_part(xml, defaults, &entry.customer, line, buyers, manufacturers)?;
            }
        }
    }
    end(xml, "CatCiLineList")?;
    end(xml, "parts")
}

fn write_part<W: Write>(
    xml: &mut Writer<W>,
    defaults: &NodeDefaults,
    customer: &str,
    line: &CiLoadInvoiceLine,
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<()> {
    let node = defaults.fields(NodeTag::CatCiLine);
    let resolved = resolve_line_parties(line, buyers, manufacturers)?;
    start(xml, "CatCiLine")?;
    field(xml, node, "custNo", customer)?;
    field(xml, node, "partNo", &line.part_number)?;
    field(xml, node, "descr", &line.description)?;
    field(xml, node, "countryOrigin", &line.country_of_origin)?;
    field(xml, node, "manufacturerId", &resolved.mid)?;
    field(xml, node, "productLine", "")?;

    start(xml, "CatTariffClassList")?;
    for (idx, tariff) in line.tariff_lines.iter().enumerate() {
        let tariff_node = defaults.fields(NodeTag::TariffClass);
        start(xml, "CatTariffClass")?;
        field(xml, tariff_node, "custNo", customer)?;
        field(xml, tariff_node, "partNo", &line.part_number)?;
        field(xml, None, "seqNo", &(idx + 1).to_string())?;
        field(xml, tariff_node, "tariffNo", &tariff.hts)?;
        field(xml, tariff_node, "spi1", &tariff.spi)?;
        field(xml, tariff_node, "spi2", &tariff.spi2)?;
        end(xml, "CatTariffClass")?;
    }
    end(xml, "CatTariffClassList")?;
    end(xml, "CatCiLine")
}
