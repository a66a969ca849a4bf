//! Tests for buyer/seller/MID resolution.

use ciload_model::{CiLoadError, CiLoadInvoiceLine, Party, PartyQualifier};
use ciload_resolve::{
    CustomerAddress, InMemoryBuyerDirectory, InMemoryManufacturerDirectory, ManufacturerRecord,
    resolve_line_mid, resolve_line_parties,
};

fn buyers() -> InMemoryBuyerDirectory {
    InMemoryBuyerDirectory {
        addresses: vec![
            CustomerAddress {
                customer_number: "BUY".to_string(),
                address_number: "1".to_string(),
                name: "Buyer Main".to_string(),
                address_1: "1 Main St".to_string(),
                city: "New York".to_string(),
                subentity: "NY".to_string(),
                country: "US".to_string(),
                zip: "10001".to_string(),
                ..CustomerAddress::default()
            },
            CustomerAddress {
                customer_number: "BUY".to_string(),
                address_number: "2".to_string(),
                name: "Buyer Warehouse".to_string(),
                address_1: "2 Dock Rd".to_string(),
                city: "Newark".to_string(),
                subentity: "NJ".to_string(),
                country: "US".to_string(),
                zip: "07102".to_string(),
                ..CustomerAddress::default()
            },
        ],
    }
}

fn manufacturers() -> InMemoryManufacturerDirectory {
    InMemoryManufacturerDirectory {
        records: vec![
            ManufacturerRecord {
                mid: "CNSHEFACT123SHE".to_string(),
                name: "Shenzhen Factory".to_string(),
                address_1: "88 Export Ave".to_string(),
                city: "Shenzhen".to_string(),
                country: "CN".to_string(),
                active: true,
                ..ManufacturerRecord::default()
            },
            ManufacturerRecord {
                mid: "CNOLDFACT999GUA".to_string(),
                name: "Closed Factory".to_string(),
                active: false,
                ..ManufacturerRecord::default()
            },
        ],
    }
}

#[test]
fn test_buyer_address_suffix_selects_slot() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.buyer_customer_number = "BUY-2".to_string();

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();

    assert_eq!(resolved.parties.len(), 1);
    let buyer = &resolved.parties[0];
    assert_eq!(buyer.qualifier, Some(PartyQualifier::Buyer));
    assert_eq!(buyer.name, "Buyer Warehouse");
    assert_eq!(buyer.customer_number, "BUY");
}

#[test]
fn test_buyer_defaults_to_address_one() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.buyer_customer_number = "BUY".to_string();

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();

    assert_eq!(resolved.parties[0].name, "Buyer Main");
}

#[test]
fn test_missing_buyer_address_names_customer_and_slot() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.buyer_customer_number = "BUY-3".to_string();

    let err = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap_err();

    match err {
        CiLoadError::MissingBuyerAddress { customer, address } => {
            assert_eq!(customer, "BUY");
            assert_eq!(address, "3");
        }
        other => panic!("expected MissingBuyerAddress, got {other}"),
    }
}

#[test]
fn test_seller_synthesized_from_mid() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.seller_mid = "CNSHEFACT123SHE".to_string();

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();

    let seller = &resolved.parties[0];
    assert_eq!(seller.qualifier, Some(PartyQualifier::Seller));
    assert_eq!(seller.name, "Shenzhen Factory");
    assert_eq!(seller.mid, "CNSHEFACT123SHE");
}

#[test]
fn test_unknown_seller_mid_fails() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.seller_mid = "XXNOWHERE000".to_string();

    let err = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap_err();
    assert!(matches!(err, CiLoadError::UnknownManufacturer { .. }));
}

#[test]
fn test_inactive_mid_fails_distinctly() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.mid = "CNOLDFACT999GUA".to_string();

    let err = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap_err();
    assert!(matches!(err, CiLoadError::InactiveManufacturer { .. }));
}

#[test]
fn test_active_mid_passes_verification() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.mid = "CNSHEFACT123SHE".to_string();

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();
    assert_eq!(resolved.mid, "CNSHEFACT123SHE");
}

#[test]
fn test_explicit_parties_used_verbatim() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.buyer_customer_number = "BUY-3".to_string(); // would fail if synthesized
    let mut party = Party::new(PartyQualifier::PayTo);
    party.name = "Payments Inc".to_string();
    line.parties.push(party);

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();

    assert_eq!(resolved.parties.len(), 1);
    assert_eq!(resolved.parties[0].name, "Payments Inc");
}

#[test]
fn test_codeless_mf_party_keeps_line_mid() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.mid = "CNSHEFACT123SHE".to_string();
    let mut mf = Party::new(PartyQualifier::Manufacturer);
    mf.name = "Name Only Mfg".to_string();
    line.parties.push(mf);

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();

    assert_eq!(resolved.mid, "CNSHEFACT123SHE");
}

#[test]
fn test_blank_mid_stays_blank() {
    let line = CiLoadInvoiceLine::new("1");
    assert_eq!(resolve_line_mid(&line, &manufacturers()).unwrap(), "");
}

#[test]
fn test_mf_party_overrides_mid_without_lookup() {
    let mut line = CiLoadInvoiceLine::new("1");
    line.mid = "XXNOWHERE000".to_string(); // would fail verification
    let mut mf = Party::new(PartyQualifier::Manufacturer);
    mf.name = "Override Mfg".to_string();
    mf.mid = "VNOVERRIDE111HAN".to_string();
    line.parties.push(mf);

    let resolved = resolve_line_parties(&line, &buyers(), &manufacturers()).unwrap();

    assert_eq!(resolved.mid, "VNOVERRIDE111HAN");
    assert_eq!(
        resolved.parties[0].qualifier,
        Some(PartyQualifier::Manufacturer)
    );
}
