use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use ciload_codec::{FieldKind, field_specs};
use ciload_model::CiLoadEntry;
use ciload_resolve::{
    InMemoryBuyerDirectory, InMemoryManufacturerDirectory, InMemorySpecialTariffCatalog,
};
use ciload_xml::{DeclarationCompiler, DocumentKind, NodeDefaults};

use crate::cli::{CompileArgs, DocumentKindArg};

pub fn run_compile(args: &CompileArgs) -> Result<()> {
    let entries: Vec<CiLoadEntry> = load_json(&args.entries)?;
    let tariffs: InMemorySpecialTariffCatalog = load_json_or_default(args.tariffs.as_deref())?;
    let buyers: InMemoryBuyerDirectory = load_json_or_default(args.buyers.as_deref())?;
    let manufacturers: InMemoryManufacturerDirectory =
        load_json_or_default(args.manufacturers.as_deref())?;
    let defaults: NodeDefaults = load_json_or_default(args.defaults.as_deref())?;
    debug!(
        entries = entries.len(),
        tariffs = tariffs.entries.len(),
        buyers = buyers.addresses.len(),
        manufacturers = manufacturers.records.len(),
        "loaded compile inputs"
    );

    let kind = match args.kind {
        DocumentKindArg::Shipment => DocumentKind::Shipment,
        DocumentKindArg::Parts => DocumentKind::Parts,
    };
    let compiler = DeclarationCompiler::new(&tariffs, &buyers, &manufacturers)
        .with_defaults(defaults)
        .with_import_country(args.import_country.clone())
        .with_effective_date(Utc::now().date_naive());
    let document = compiler
        .compile(&entries, kind)
        .context("compile declaration")?;

    match &args.output {
        Some(path) => {
            deliver(path, &document)?;
            info!(
                output = %path.display(),
                bytes = document.len(),
                "declaration written"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&document)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn run_fields() {
    println!("{:<20} {:>6}  {}", "Field", "Limit", "Overflow");
    for spec in field_specs() {
        let overflow = match spec.kind {
            FieldKind::Key => "fatal",
            FieldKind::Truncated => "truncate",
        };
        println!("{:<20} {:>6}  {}", spec.name, spec.limit, overflow);
    }
}

/// Write the document to a sibling temp file and rename it into place, so a
/// failed run never leaves a partial document at the target path.
fn deliver(path: &Path, document: &[u8]) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = Path::new(&temp);
    fs::write(temp, document)
        .with_context(|| format!("write temporary file {}", temp.display()))?;
    fs::rename(temp, path).with_context(|| format!("rename into place {}", path.display()))?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn load_json_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => load_json(path),
        None => Ok(T::default()),
    }
}
