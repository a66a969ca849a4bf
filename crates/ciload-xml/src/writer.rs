//! Low-level emission helpers.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use ciload_codec::{wire_date, wire_decimal, wire_money, wire_quantity, wire_string};
use ciload_model::Result;

use crate::defaults::FieldMap;

/// Write `<name>text</name>`.
pub(crate) fn write_text_element<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub(crate) fn start<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

pub(crate) fn end<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write one field of a node, merging defaults and applying the codec.
///
/// An empty model value falls back to the node's default for that field;
/// a field empty after the merge is omitted entirely. The merged value is
/// rendered under the field-length table, so key-field overflow surfaces
/// here.
pub(crate) fn field<W: Write>(
    xml: &mut Writer<W>,
    defaults: Option<&FieldMap>,
    name: &'static str,
    value: &str,
) -> Result<()> {
    let merged = if value.is_empty() {
        defaults
            .and_then(|fields| fields.get(name))
            .map_or("", String::as_str)
    } else {
        value
    };
    if merged.is_empty() {
        return Ok(());
    }
    let rendered = wire_string(name, merged)?;
    write_text_element(xml, name, &rendered)
}

/// Render an optional date for [`field`].
pub(crate) fn date_value(value: Option<chrono::NaiveDate>) -> String {
    value.map(wire_date).unwrap_or_default()
}

/// Render an optional monetary amount for [`field`].
pub(crate) fn money_value(name: &'static str, value: Option<f64>) -> Result<String> {
    value.map(|amount| wire_money(name, amount)).transpose().map(Option::unwrap_or_default)
}

/// Render an optional commercial quantity for [`field`].
pub(crate) fn quantity_value(name: &'static str, value: Option<f64>) -> Result<String> {
    value.map(|qty| wire_quantity(name, qty)).transpose().map(Option::unwrap_or_default)
}

/// Render an optional decimal for [`field`].
pub(crate) fn decimal_value(name: &'static str, value: Option<f64>) -> Result<String> {
    value.map(|dec| wire_decimal(name, dec)).transpose().map(Option::unwrap_or_default)
}

/// Render an optional count for [`field`].
pub(crate) fn count_value(value: Option<u32>) -> String {
    value.map(|count| count.to_string()).unwrap_or_default()
}

/// Render an optional yes/no flag for [`field`].
pub(crate) fn flag_value(value: Option<bool>) -> String {
    match value {
        Some(true) => "Y".to_string(),
        Some(false) => "N".to_string(),
        None => String::new(),
    }
}
