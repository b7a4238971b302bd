//! CLI commands for single string files

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::formats::{ParsedStrings, count_str_records, parse_csf, parse_str, write_csf, write_str};
use crate::table::{StringRecord, StringTable};

fn is_csf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csf"))
}

/// Parse a string file, picking the format from its extension
pub fn load(path: &Path) -> anyhow::Result<ParsedStrings> {
    let parsed = if is_csf(path) {
        parse_csf(BufReader::new(File::open(path)?))?
    } else {
        let count = count_str_records(BufReader::new(File::open(path)?))?;
        parse_str(BufReader::new(File::open(path)?), count)?
    };
    Ok(parsed)
}

/// Print every record
pub fn dump(path: &Path, sorted: bool, limit: Option<usize>) -> anyhow::Result<()> {
    let table = StringTable::from_parsed(load(path)?);
    let limit = limit.unwrap_or(usize::MAX);

    let records: Box<dyn Iterator<Item = &StringRecord> + '_> = if sorted {
        Box::new(table.iter_sorted())
    } else {
        Box::new(table.records().iter())
    };

    for record in records.take(limit) {
        print_record(record);
    }

    Ok(())
}

/// Look up a single label
pub fn get(path: &Path, label: &str) -> anyhow::Result<()> {
    let table = StringTable::from_parsed(load(path)?);

    if let Some(record) = table.get(label) {
        print_record(record);
    } else {
        anyhow::bail!("Label not found: {}", label);
    }

    Ok(())
}

/// List labels with a prefix
pub fn prefix(path: &Path, prefix: &str) -> anyhow::Result<()> {
    let table = StringTable::from_parsed(load(path)?);

    for label in table.labels_with_prefix(prefix) {
        println!("{label}");
    }

    Ok(())
}

/// Convert .str <-> .csf
pub fn convert(source: &Path, destination: &Path, language_id: u32) -> anyhow::Result<()> {
    let parsed = load(source)?;
    let writer = BufWriter::new(File::create(destination)?);

    if is_csf(destination) {
        let language_id = if language_id == 0 { parsed.language_id } else { language_id };
        write_csf(writer, &parsed.records, language_id)?;
    } else {
        write_str(writer, &parsed.records)?;
    }

    println!(
        "Converted {} records: {} -> {}",
        parsed.records.len(),
        source.display(),
        destination.display()
    );

    Ok(())
}

/// Show statistics for one or more files
pub fn stats(paths: &[std::path::PathBuf]) -> anyhow::Result<()> {
    let mut total_records = 0;

    for path in paths {
        let parsed = load(path)?;
        let records = &parsed.records;
        let chars: usize = records.iter().map(|r| r.text.chars().count()).sum();
        let with_speech = records.iter().filter(|r| !r.speech.is_empty()).count();
        let empty = records.iter().filter(|r| r.text.is_empty()).count();

        println!("{}:", path.display());
        println!("  Records: {}", records.len());
        println!("  Total characters: {chars}");
        println!("  Longest label: {} bytes", parsed.max_label_len);
        println!("  With speech cue: {with_speech}");
        if empty > 0 {
            println!("  Empty strings: {empty}");
        }
        if is_csf(path) {
            println!("  Language id: {}", parsed.language_id);
        }
        println!();

        total_records += records.len();
    }

    if paths.len() > 1 {
        println!("Total across {} files: {} records", paths.len(), total_records);
    }

    Ok(())
}

fn print_record(record: &StringRecord) {
    let text = record.text.replace('\n', "\\n");
    if record.speech.is_empty() {
        println!("{}\t{}", record.label, text);
    } else {
        println!("{}\t{}\t[{}]", record.label, text, record.speech);
    }
}
