//! Invoice-line party model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Party qualifier codes used on invoice lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartyQualifier {
    /// Buyer of the goods.
    #[serde(rename = "BY")]
    Buyer,
    /// Seller of the goods.
    #[serde(rename = "SE")]
    Seller,
    /// Manufacturer. Also carries the MID override when supplied explicitly.
    #[serde(rename = "MF")]
    Manufacturer,
    /// Pay-to party.
    #[serde(rename = "PY")]
    PayTo,
    /// Ship-to party.
    #[serde(rename = "ST")]
    ShipTo,
}

impl PartyQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyQualifier::Buyer => "BY",
            PartyQualifier::Seller => "SE",
            PartyQualifier::Manufacturer => "MF",
            PartyQualifier::PayTo => "PY",
            PartyQualifier::ShipTo => "ST",
        }
    }
}

impl fmt::Display for PartyQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartyQualifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BY" => Ok(PartyQualifier::Buyer),
            "SE" => Ok(PartyQualifier::Seller),
            "MF" => Ok(PartyQualifier::Manufacturer),
            "PY" => Ok(PartyQualifier::PayTo),
            "ST" => Ok(PartyQualifier::ShipTo),
            _ => Err(format!("Unknown party qualifier: {s}")),
        }
    }
}

/// A party attached to an invoice line, either supplied explicitly by the
/// translator or synthesized from the buyer/manufacturer directories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub qualifier: Option<PartyQualifier>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub address_3: String,
    #[serde(default)]
    pub city: String,
    /// State/province subdivision.
    #[serde(default)]
    pub subentity: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub customer_number: String,
    #[serde(default)]
    pub mid: String,
}

impl Party {
    pub fn new(qualifier: PartyQualifier) -> Self {
        Self {
            qualifier: Some(qualifier),
            ..Self::default()
        }
    }
}
