//! The declaration compiler.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, Event};
use tracing::info;

use ciload_model::{CiLoadEntry, Result};
use ciload_resolve::{
    BuyerDirectory, ManufacturerDirectory, SpecialTariffCatalog, resolve_entry_tariffs,
};
use ciload_transform::consolidate_entry;

use crate::defaults::NodeDefaults;
use crate::writer::{end, start};
use crate::{parts, shipment};

/// Which declaration document to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Full shipment/invoice declaration.
    Shipment,
    /// Parts (product catalog) declaration.
    Parts,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Shipment => "shipment",
            DocumentKind::Parts => "parts",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shipment" => Ok(DocumentKind::Shipment),
            "parts" => Ok(DocumentKind::Parts),
            _ => Err(format!("Unknown document kind: {s}")),
        }
    }
}

/// Compiles canonical entries into declaration XML.
///
/// The compiler owns no reference data of its own; the catalog and
/// directories are injected at construction and the only per-instance state
/// is the defaults table, so one compiler can serve many independent
/// invocations. Compilation is all-or-nothing: any fatal resolution or
/// validation error aborts with no partial document.
pub struct DeclarationCompiler<'a> {
    tariffs: &'a dyn SpecialTariffCatalog,
    buyers: &'a dyn BuyerDirectory,
    manufacturers: &'a dyn ManufacturerDirectory,
    defaults: NodeDefaults,
    import_country: String,
    effective_date: Option<NaiveDate>,
}

impl<'a> DeclarationCompiler<'a> {
    pub fn new(
        tariffs: &'a dyn SpecialTariffCatalog,
        buyers: &'a dyn BuyerDirectory,
        manufacturers: &'a dyn ManufacturerDirectory,
    ) -> Self {
        Self {
            tariffs,
            buyers,
            manufacturers,
            defaults: NodeDefaults::default(),
            import_country: "US".to_string(),
            effective_date: None,
        }
    }

    /// Set the default-value table.
    #[must_use]
    pub fn with_defaults(mut self, defaults: NodeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the import country for special-tariff lookups.
    #[must_use]
    pub fn with_import_country(mut self, country: impl Into<String>) -> Self {
        self.import_country = country.into();
        self
    }

    /// Set the fallback governing date for entries carrying no usable date.
    #[must_use]
    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    /// Compile a batch of entries into one declaration document.
    pub fn compile(&self, entries: &[CiLoadEntry], kind: DocumentKind) -> Result<Vec<u8>> {
        let prepared = entries
            .iter()
            .cloned()
            .map(|entry| self.prepare(entry))
            .collect::<Result<Vec<CiLoadEntry>>>()?;
        info!(entries = prepared.len(), kind = %kind, "compiling declaration");

        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        start(&mut xml, "requests")?;
        start(&mut xml, "request")?;
        start(&mut xml, "kcData")?;
        match kind {
            DocumentKind::Shipment => shipment::write_shipments(
                &mut xml,
                &self.defaults,
                &prepared,
                self.buyers,
                self.manufacturers,
            )?,
            DocumentKind::Parts => parts::write_parts(
                &mut xml,
                &self.defaults,
                &prepared,
                self.buyers,
                self.manufacturers,
            )?,
        }
        end(&mut xml, "kcData")?;
        end(&mut xml, "request")?;
        end(&mut xml, "requests")?;
        Ok(xml.into_inner())
    }

    /// Consolidate lines and inject special tariffs ahead of emission.
    fn prepare(&self, entry: CiLoadEntry) -> Result<CiLoadEntry> {
        let mut entry = consolidate_entry(entry)?;
        resolve_entry_tariffs(
            &mut entry,
            self.tariffs,
            &self.import_country,
            self.effective_date,
        );
        Ok(entry)
    }
}
