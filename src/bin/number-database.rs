use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Writer};
use fused_numbering::*;
use std::fs::File;
use tracing::*;

/// Number one database row, returning its locant list and a status column.
fn number_row(smiles: &str) -> (String, String) {
    let mut frag = match parse_smiles(smiles) {
        Ok(frag) => frag,
        Err(e) => return (String::new(), format!("invalid smiles: {}", e)),
    };
    match number_fused_ring(&mut frag) {
        Ok(()) => {
            let locants: Vec<String> = frag.locants().into_iter().flatten().collect();
            let status = if locants.is_empty() { "skipped" } else { "ok" };
            (locants.join(","), status.to_string())
        }
        Err(e @ NumberingError::UnsupportedStructure(_)) => (String::new(), format!("unsupported: {}", e)),
        Err(e) => {
            error!("{}: {}", smiles, e);
            (String::new(), format!("internal: {}", e))
        }
    }
}

fn main() -> Result<()> {
    init_logging("info");
    let mut args = std::env::args().skip(1);
    let usage = "usage: number-database INPUT.csv OUTPUT.csv";
    let input = args.next().context(usage)?;
    let output = args.next().context(usage)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(File::open(&input).with_context(|| format!("opening {}", input))?);
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("{} has no `{}` column", input, name))
    };
    let (name_column, smiles_column) = (column("name")?, column("smiles")?);

    let mut writer = Writer::from_writer(File::create(&output).with_context(|| format!("creating {}", output))?);
    writer.write_record(["name", "smiles", "locants", "status"])?;

    let mut rows = 0;
    for record in reader.records() {
        let record: StringRecord = record?;
        let name = record.get(name_column).unwrap_or("");
        let smiles = record.get(smiles_column).unwrap_or("").trim();
        if smiles.is_empty() {
            warn!("Skipping record with empty SMILES: {:?}", record);
            continue;
        }
        let (locants, status) = number_row(smiles);
        writer.write_record([name, smiles, locants.as_str(), status.as_str()])?;
        rows += 1;
    }
    writer.flush()?;
    info!("Numbered {} rows from {} into {}", rows, input, output);
    Ok(())
}
