//! Buyer/seller/manufacturer resolution for invoice lines.

use ciload_model::{CiLoadError, CiLoadInvoiceLine, Party, PartyQualifier, Result};
use tracing::debug;

use crate::directories::{BuyerDirectory, CustomerAddress, ManufacturerDirectory};

/// Parties and effective MID for one invoice line after resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLineParties {
    pub parties: Vec<Party>,
    /// The manufacturer id to emit on the line itself.
    pub mid: String,
}

/// Resolve the party list and effective MID for an invoice line.
///
/// An explicit `parties` list is used verbatim, keyed by qualifier; an MF
/// party in it overrides the line's `mid` outright and no lookup is made.
/// Without explicit parties, the buyer is synthesized from
/// `buyer_customer_number` and the seller from `seller_mid`, and the line's
/// own `mid` must name an active manufacturer record.
pub fn resolve_line_parties(
    line: &CiLoadInvoiceLine,
    buyers: &dyn BuyerDirectory,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<ResolvedLineParties> {
    if !line.parties.is_empty() {
        let parties = line.parties.clone();
        let mid = resolve_line_mid(line, manufacturers)?;
        return Ok(ResolvedLineParties { parties, mid });
    }

    let mut parties = Vec::new();
    if !line.buyer_customer_number.is_empty() {
        let (customer, address) = split_customer_address(&line.buyer_customer_number);
        let record = buyers
            .resolve_customer_address(&customer, &address)
            .ok_or_else(|| CiLoadError::missing_buyer_address(&customer, &address))?;
        parties.push(buyer_party(&record));
    }
    if !line.seller_mid.is_empty() {
        let record = lookup_active(&line.seller_mid, manufacturers)?;
        let mut party = Party::new(PartyQualifier::Seller);
        party.name = record.name;
        party.address_1 = record.address_1;
        party.address_2 = record.address_2;
        party.city = record.city;
        party.subentity = record.subentity;
        party.country = record.country;
        party.zip = record.zip;
        party.mid = record.mid;
        parties.push(party);
    }
    let mid = verified_mid(line, manufacturers)?;
    Ok(ResolvedLineParties { parties, mid })
}

/// The effective manufacturer id for a line: an explicit MF party's code
/// when present, else the line's own MID verified active.
pub fn resolve_line_mid(
    line: &CiLoadInvoiceLine,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<String> {
    // A name-only MF party carries no code and must not blank the line's MID.
    let mf_code = line
        .parties
        .iter()
        .find(|party| party.qualifier == Some(PartyQualifier::Manufacturer))
        .map(|party| party.mid.clone())
        .filter(|mid| !mid.is_empty());
    match mf_code {
        Some(code) => {
            debug!(line = %line.line_number, mid = %code, "MF party overrides line MID");
            Ok(code)
        }
        None => verified_mid(line, manufacturers),
    }
}

/// Split a buyer customer number into its code and address-slot parts.
///
/// A trailing `-N` with a numeric N selects address N; everything else is
/// the bare code with the primary address "1".
pub fn split_customer_address(raw: &str) -> (String, String) {
    if let Some((code, suffix)) = raw.rsplit_once('-') {
        if !code.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return (code.to_string(), suffix.to_string());
        }
    }
    (raw.to_string(), "1".to_string())
}

fn buyer_party(record: &CustomerAddress) -> Party {
    let mut party = Party::new(PartyQualifier::Buyer);
    party.name = record.name.clone();
    party.address_1 = record.address_1.clone();
    party.address_2 = record.address_2.clone();
    party.city = record.city.clone();
    party.subentity = record.subentity.clone();
    party.country = record.country.clone();
    party.zip = record.zip.clone();
    party.customer_number = record.customer_number.clone();
    party
}

/// Verify the line's own MID against the directory. A blank MID stays blank.
fn verified_mid(
    line: &CiLoadInvoiceLine,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<String> {
    if line.mid.is_empty() {
        return Ok(String::new());
    }
    let record = lookup_active(&line.mid, manufacturers)?;
    Ok(record.mid)
}

fn lookup_active(
    mid: &str,
    manufacturers: &dyn ManufacturerDirectory,
) -> Result<crate::directories::ManufacturerRecord> {
    let record = manufacturers
        .resolve_manufacturer(mid)
        .ok_or_else(|| CiLoadError::unknown_manufacturer(mid))?;
    if !record.active {
        return Err(CiLoadError::inactive_manufacturer(mid));
    }
    Ok(record)
}
