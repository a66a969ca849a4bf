//! End-to-end declaration compilation tests.
//!
//! Sibling order is significant downstream, so assertions walk the document
//! structurally by element path rather than comparing raw bytes.

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;

use ciload_model::{
    CiLoadBillOfLading, CiLoadEntry, CiLoadError, CiLoadInvoice, CiLoadInvoiceLine,
    CiLoadInvoiceTariff, EntryDate, EntryDateCode,
};
use ciload_resolve::{
    CustomerAddress, InMemoryBuyerDirectory, InMemoryManufacturerDirectory,
    InMemorySpecialTariffCatalog, ManufacturerRecord, SpecialTariffCrossReference,
};
use ciload_xml::{DeclarationCompiler, DocumentKind, NodeDefaults, NodeTag};

/// Collect the text of every element matching a slash-separated path.
fn texts_at(xml: &str, path: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<String> = Vec::new();
    let mut found = Vec::new();
    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Start(start) => {
                stack.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let value = text.decode().expect("decode").trim().to_string();
                if !value.is_empty() && stack.join("/") == path {
                    found.push(value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    found
}

/// Collect child element names, in order, under every node matching a path.
fn names_under(xml: &str, path: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<String> = Vec::new();
    let mut found = Vec::new();
    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if stack.join("/") == path {
                    found.push(name.clone());
                }
                stack.push(name);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    found
}

const LINE_PATH: &str = "requests/request/kcData/ediShipments/ediShipment/EdiInvoiceHeaderList/EdiInvoiceHeader/EdiInvoiceLinesList/EdiInvoiceLines";

fn tariffs() -> InMemorySpecialTariffCatalog {
    InMemorySpecialTariffCatalog {
        entries: vec![SpecialTariffCrossReference {
            import_country: "US".to_string(),
            hts: "6110202079".to_string(),
            origin_country: "CN".to_string(),
            special_hts: "99038815".to_string(),
            effective_from: None,
            effective_to: None,
        }],
    }
}

fn buyers() -> InMemoryBuyerDirectory {
    InMemoryBuyerDirectory {
        addresses: vec![
            CustomerAddress {
                customer_number: "BUY".to_string(),
                address_number: "1".to_string(),
                name: "Buyer Main".to_string(),
                ..CustomerAddress::default()
            },
            CustomerAddress {
                customer_number: "BUY".to_string(),
                address_number: "2".to_string(),
                name: "Buyer Warehouse".to_string(),
                ..CustomerAddress::default()
            },
        ],
    }
}

fn manufacturers() -> InMemoryManufacturerDirectory {
    InMemoryManufacturerDirectory {
        records: vec![ManufacturerRecord {
            mid: "CNSHEFACT123SHE".to_string(),
            name: "Shenzhen Factory".to_string(),
            country: "CN".to_string(),
            active: true,
            ..ManufacturerRecord::default()
        }],
    }
}

fn entry() -> CiLoadEntry {
    let mut entry = CiLoadEntry::new("316000", "TESTCUST");
    entry.dates.push(EntryDate {
        code: EntryDateCode::Export,
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    });
    entry.bills_of_lading.push(CiLoadBillOfLading {
        master_bill: "MAEU12345678".to_string(),
        house_bill: "HBOL999".to_string(),
        scac: "MAEU".to_string(),
        pieces: Some(100),
        pieces_uom: "CTN".to_string(),
        ..CiLoadBillOfLading::default()
    });

    let mut invoice = CiLoadInvoice::new("INV-001");
    invoice.invoice_date = NaiveDate::from_ymd_opt(2024, 4, 20);
    invoice.currency = "USD".to_string();

    let mut line = CiLoadInvoiceLine::new("1");
    line.part_number = "PART-A".to_string();
    line.country_of_origin = "CN".to_string();
    line.pieces = Some(100);
    line.gross_weight = Some(140.0);
    line.mid = "CNSHEFACT123SHE".to_string();
    line.buyer_customer_number = "BUY-2".to_string();
    let mut tariff = CiLoadInvoiceTariff::new("6110.20.2079");
    tariff.value = Some(1000.0);
    tariff.quantity_1 = Some(25.0);
    tariff.uom_1 = "DOZ".to_string();
    line.tariff_lines.push(tariff);
    invoice.lines.push(line);
    entry.invoices.push(invoice);
    entry
}

fn compile_one(entry: CiLoadEntry) -> Result<String, CiLoadError> {
    let tariffs = tariffs();
    let buyers = buyers();
    let manufacturers = manufacturers();
    let compiler = DeclarationCompiler::new(&tariffs, &buyers, &manufacturers);
    let bytes = compiler.compile(&[entry], DocumentKind::Shipment)?;
    Ok(String::from_utf8(bytes).expect("utf-8 output"))
}

#[test]
fn test_envelope_and_header_keys() {
    let xml = compile_one(entry()).unwrap();
    assert_eq!(
        texts_at(&xml, "requests/request/kcData/ediShipments/ediShipment/fileNo"),
        ["316000"]
    );
    assert_eq!(texts_at(&xml, &format!("{LINE_PATH}/custNo")), ["TESTCUST"]);
    assert_eq!(texts_at(&xml, &format!("{LINE_PATH}/commInvNo")), ["INV-001"]);
}

#[test]
fn test_line_siblings_in_documented_order() {
    let xml = compile_one(entry()).unwrap();
    let names = names_under(&xml, LINE_PATH);
    let part = names.iter().position(|n| n == "partNo").unwrap();
    let origin = names.iter().position(|n| n == "countryOrigin").unwrap();
    let mid = names.iter().position(|n| n == "manufacturerId").unwrap();
    let tariffs = names.iter().position(|n| n == "EdiInvoiceTariffClassList").unwrap();
    let parties = names.iter().position(|n| n == "EdiInvoicePartyList").unwrap();
    assert!(part < origin);
    assert!(origin < mid);
    assert!(mid < tariffs);
    assert!(tariffs < parties);
}

#[test]
fn test_special_tariff_injected_sorted_and_blank() {
    let xml = compile_one(entry()).unwrap();
    let tariff_path = format!("{LINE_PATH}/EdiInvoiceTariffClassList/EdiInvoiceTariffClass");
    // 9903 line injected and sorted first
    assert_eq!(
        texts_at(&xml, &format!("{tariff_path}/tariffNo")),
        ["99038815", "6110202079"]
    );
    // Commercial value stays on the base classification only
    assert_eq!(texts_at(&xml, &format!("{tariff_path}/valueUs")), ["100000"]);
    // The injected line carries the base quantities
    assert_eq!(
        texts_at(&xml, &format!("{tariff_path}/qty1")),
        ["25000", "25000"]
    );
}

#[test]
fn test_manual_special_tariff_not_duplicated() {
    let mut entry = entry();
    entry.invoices[0].lines[0]
        .tariff_lines
        .push(CiLoadInvoiceTariff::new("9903.88.15"));
    let xml = compile_one(entry).unwrap();
    let tariff_path = format!("{LINE_PATH}/EdiInvoiceTariffClassList/EdiInvoiceTariffClass");
    // Same count as keyed: nothing injected on top of the manual line
    assert_eq!(
        texts_at(&xml, &format!("{tariff_path}/tariffNo")),
        ["99038815", "6110202079"]
    );
}

#[test]
fn test_consolidated_child_disappears() {
    let mut entry = entry();
    entry.invoices[0].lines[0].freight_amount = Some(10.0);
    let mut child = CiLoadInvoiceLine::new("2");
    child.parent_line_number = Some("1".to_string());
    child.freight_amount = Some(5.5);
    child.country_of_origin = "CN".to_string();
    child
        .tariff_lines
        .push(CiLoadInvoiceTariff::new("5407.61.0000"));
    entry.invoices[0].lines.push(child);

    let xml = compile_one(entry).unwrap();

    assert_eq!(texts_at(&xml, &format!("{LINE_PATH}/commInvLineNo")), ["1"]);
    // Freight sums with implied two decimals
    assert_eq!(texts_at(&xml, &format!("{LINE_PATH}/freightAmt")), ["1550"]);
    let tariff_path = format!("{LINE_PATH}/EdiInvoiceTariffClassList/EdiInvoiceTariffClass");
    assert_eq!(
        texts_at(&xml, &format!("{tariff_path}/tariffNo")),
        ["99038815", "6110202079", "5407610000"]
    );
}

#[test]
fn test_part_number_overflow_is_fatal() {
    let mut entry = entry();
    entry.invoices[0].lines[0].part_number = "P".repeat(41);
    let err = compile_one(entry).unwrap_err();
    match err {
        CiLoadError::DataOverflow { field, limit, value } => {
            assert_eq!(field, "partNo");
            assert_eq!(limit, 40);
            assert_eq!(value, "P".repeat(41));
        }
        other => panic!("expected DataOverflow, got {other}"),
    }
}

#[test]
fn test_part_number_at_limit_compiles() {
    let mut entry = entry();
    entry.invoices[0].lines[0].part_number = "P".repeat(40);
    assert!(compile_one(entry).is_ok());
}

#[test]
fn test_long_master_bill_truncated_only_in_addl() {
    let mut entry = entry();
    entry.bills_of_lading[0].master_bill = "12345678901234567890".to_string();
    let xml = compile_one(entry).unwrap();
    let bill_path = "requests/request/kcData/ediShipments/ediShipment/EdiShipmentIdList/EdiShipmentId";
    assert_eq!(
        texts_at(&xml, &format!("{bill_path}/masterBill")),
        ["12345678901234567890"]
    );
    assert_eq!(
        texts_at(&xml, &format!("{bill_path}/masterBillAddl")),
        ["123456789012"]
    );
}

#[test]
fn test_multiple_master_bills_omit_bill_pieces() {
    let mut entry = entry();
    entry.bills_of_lading.push(CiLoadBillOfLading {
        master_bill: "MSCU87654321".to_string(),
        pieces: Some(50),
        pieces_uom: "CTN".to_string(),
        ..CiLoadBillOfLading::default()
    });
    let xml = compile_one(entry).unwrap();
    let bill_path = "requests/request/kcData/ediShipments/ediShipment/EdiShipmentIdList/EdiShipmentId";
    assert_eq!(texts_at(&xml, &format!("{bill_path}/qty")), Vec::<String>::new());
    // Shipment-level roll-up is unaffected
    assert_eq!(
        texts_at(&xml, "requests/request/kcData/ediShipments/ediShipment/pieceCount"),
        ["100"]
    );
}

#[test]
fn test_single_master_bill_keeps_pieces() {
    let xml = compile_one(entry()).unwrap();
    let bill_path = "requests/request/kcData/ediShipments/ediShipment/EdiShipmentIdList/EdiShipmentId";
    assert_eq!(texts_at(&xml, &format!("{bill_path}/qty")), ["100"]);
}

#[test]
fn test_buyer_address_two_resolved_into_party_list() {
    let xml = compile_one(entry()).unwrap();
    let party_path = format!("{LINE_PATH}/EdiInvoicePartyList/EdiInvoiceParty");
    assert_eq!(
        texts_at(&xml, &format!("{party_path}/partiesQualifier")),
        ["BY"]
    );
    assert_eq!(
        texts_at(&xml, &format!("{party_path}/name")),
        ["Buyer Warehouse"]
    );
}

#[test]
fn test_missing_buyer_address_aborts() {
    let mut entry = entry();
    entry.invoices[0].lines[0].buyer_customer_number = "BUY-3".to_string();
    let err = compile_one(entry).unwrap_err();
    match err {
        CiLoadError::MissingBuyerAddress { customer, address } => {
            assert_eq!(customer, "BUY");
            assert_eq!(address, "3");
        }
        other => panic!("expected MissingBuyerAddress, got {other}"),
    }
}

#[test]
fn test_unknown_mid_aborts() {
    let mut entry = entry();
    entry.invoices[0].lines[0].mid = "XXNOWHERE000".to_string();
    let err = compile_one(entry).unwrap_err();
    assert!(matches!(err, CiLoadError::UnknownManufacturer { .. }));
}

#[test]
fn test_defaults_fill_only_unset_fields() {
    let tariffs = tariffs();
    let buyers = buyers();
    let manufacturers = manufacturers();
    let mut defaults = NodeDefaults::default();
    defaults.set(NodeTag::Shipment, "portDist", "1401");
    defaults.set(NodeTag::Shipment, "carrier", "ZZZZ");
    let compiler =
        DeclarationCompiler::new(&tariffs, &buyers, &manufacturers).with_defaults(defaults);

    let mut entry = entry();
    entry.carrier = "MAEU".to_string(); // explicitly set, default must not win
    let xml = String::from_utf8(
        compiler
            .compile(&[entry], DocumentKind::Shipment)
            .unwrap(),
    )
    .unwrap();

    let shipment_path = "requests/request/kcData/ediShipments/ediShipment";
    assert_eq!(texts_at(&xml, &format!("{shipment_path}/portDist")), ["1401"]);
    assert_eq!(texts_at(&xml, &format!("{shipment_path}/carrier")), ["MAEU"]);
}

#[test]
fn test_piece_count_default_fills_when_no_lines_carry_pieces() {
    let tariffs = tariffs();
    let buyers = buyers();
    let manufacturers = manufacturers();
    let mut defaults = NodeDefaults::default();
    defaults.set(NodeTag::Shipment, "pieceCount", "1");
    let compiler =
        DeclarationCompiler::new(&tariffs, &buyers, &manufacturers).with_defaults(defaults);

    let mut entry = entry();
    entry.invoices[0].lines[0].pieces = None;
    let xml = String::from_utf8(
        compiler
            .compile(&[entry], DocumentKind::Shipment)
            .unwrap(),
    )
    .unwrap();

    assert_eq!(
        texts_at(&xml, "requests/request/kcData/ediShipments/ediShipment/pieceCount"),
        ["1"]
    );
}

#[test]
fn test_non_ascii_description_sanitized() {
    let mut entry = entry();
    entry.invoices[0].lines[0].description = "Wollmütze".to_string();
    let xml = compile_one(entry).unwrap();
    assert_eq!(texts_at(&xml, &format!("{LINE_PATH}/descr")), ["Wollm?tze"]);
}

#[test]
fn test_batch_emits_one_shipment_per_entry() {
    let tariffs = tariffs();
    let buyers = buyers();
    let manufacturers = manufacturers();
    let compiler = DeclarationCompiler::new(&tariffs, &buyers, &manufacturers);
    let mut second = entry();
    second.file_number = "316001".to_string();
    let bytes = compiler
        .compile(&[entry(), second], DocumentKind::Shipment)
        .unwrap();
    let xml = String::from_utf8(bytes).unwrap();
    assert_eq!(
        texts_at(&xml, "requests/request/kcData/ediShipments/ediShipment/fileNo"),
        ["316000", "316001"]
    );
}

#[test]
fn test_parts_declaration_honors_catciline_defaults() {
    let tariffs = tariffs();
    let buyers = buyers();
    let manufacturers = manufacturers();
    let mut defaults = NodeDefaults::default();
    defaults.set(NodeTag::CatCiLine, "productLine", "GENERIC");
    let compiler =
        DeclarationCompiler::new(&tariffs, &buyers, &manufacturers).with_defaults(defaults);

    let xml = String::from_utf8(
        compiler.compile(&[entry()], DocumentKind::Parts).unwrap(),
    )
    .unwrap();

    let part_path = "requests/request/kcData/parts/CatCiLineList/CatCiLine";
    assert_eq!(texts_at(&xml, &format!("{part_path}/partNo")), ["PART-A"]);
    assert_eq!(
        texts_at(&xml, &format!("{part_path}/productLine")),
        ["GENERIC"]
    );
    assert_eq!(
        texts_at(
            &xml,
            &format!("{part_path}/CatTariffClassList/CatTariffClass/tariffNo")
        ),
        ["99038815", "6110202079"]
    );
}

#[test]
fn test_dates_emit_fixed_eight_digits() {
    let xml = compile_one(entry()).unwrap();
    let date_path =
        "requests/request/kcData/ediShipments/ediShipment/EdiShipmentDatesList/EdiShipmentDates";
    assert_eq!(
        texts_at(&xml, &format!("{date_path}/dateValue")),
        ["20240501"]
    );
    assert_eq!(
        texts_at(
            &xml,
            "requests/request/kcData/ediShipments/ediShipment/EdiInvoiceHeaderList/EdiInvoiceHeader/dateInvoice"
        ),
        ["20240420"]
    );
}
