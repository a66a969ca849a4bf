//! Caller-supplied default values per node type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Node types of the declaration document that accept default values.
///
/// Serialized under the wire node names, so a defaults file reads
/// `{"CatCiLine": {"productLine": "GENERIC"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeTag {
    #[serde(rename = "EdiShipment")]
    Shipment,
    #[serde(rename = "EdiShipmentId")]
    BillOfLading,
    #[serde(rename = "EdiContainers")]
    Container,
    #[serde(rename = "EdiInvoiceHeader")]
    InvoiceHeader,
    #[serde(rename = "EdiInvoiceLines")]
    InvoiceLine,
    #[serde(rename = "EdiInvoiceTariffClass")]
    TariffClass,
    #[serde(rename = "EdiInvoiceParty")]
    Party,
    #[serde(rename = "CatCiLine")]
    CatCiLine,
}

impl NodeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeTag::Shipment => "EdiShipment",
            NodeTag::BillOfLading => "EdiShipmentId",
            NodeTag::Container => "EdiContainers",
            NodeTag::InvoiceHeader => "EdiInvoiceHeader",
            NodeTag::InvoiceLine => "EdiInvoiceLines",
            NodeTag::TariffClass => "EdiInvoiceTariffClass",
            NodeTag::Party => "EdiInvoiceParty",
            NodeTag::CatCiLine => "CatCiLine",
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field defaults for one node type.
pub type FieldMap = BTreeMap<String, String>;

/// Default-value table keyed by node type.
///
/// Defaults fill only fields the model left unset; an explicitly-set field
/// is never overridden. Merging happens at emission time, field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeDefaults(pub BTreeMap<NodeTag, FieldMap>);

impl NodeDefaults {
    /// The default fields declared for a node type, if any.
    pub fn fields(&self, tag: NodeTag) -> Option<&FieldMap> {
        self.0.get(&tag)
    }

    /// Register one default value.
    pub fn set(
        &mut self,
        tag: NodeTag,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.0.entry(tag).or_default().insert(field.into(), value.into());
        self
    }
}
