use humansize::{file_size_opts as options, FileSize};
use lzbox_format::{BoxView, DecodeError};
use serde::Serialize;

use crate::cli::ListArgs;
use crate::error::{Error, Result};

#[derive(Debug, Serialize, PartialEq)]
struct Row<'a> {
    name: &'a str,
    compressed_size: u64,
    size: u64,
}

fn collect_rows<'a>(view: &BoxView<'a>) -> std::result::Result<Vec<Row<'a>>, DecodeError> {
    let decoded = view.decompress()?;

    Ok(view
        .iter()
        .zip(decoded.iter())
        .map(|(raw, entry)| Row {
            name: raw.name,
            compressed_size: raw.compressed_len() as u64,
            size: entry.data.len() as u64,
        })
        .collect())
}

#[inline(always)]
fn format_size(bytes: u64) -> String {
    bytes.file_size(options::BINARY).unwrap_or_else(|e| e)
}

#[inline(always)]
fn format_ratio(row: &Row<'_>) -> String {
    if row.size == 0 {
        "-".into()
    } else {
        format!("{:.0}%", row.compressed_size as f64 * 100.0 / row.size as f64)
    }
}

pub fn run(args: ListArgs) -> Result<()> {
    let data = std::fs::read(&args.path).map_err(|source| Error::OpenArchive {
        path: args.path.clone(),
        source,
    })?;

    let (rows, trailing) = BoxView::parse(&data)
        .and_then(|view| Ok((collect_rows(&view)?, view.trailing_bytes())))
        .map_err(|source| Error::DecodeArchive {
            path: args.path.clone(),
            source,
        })?;

    if trailing > 0 {
        tracing::warn!(bytes = trailing, "archive has trailing bytes after last entry");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:>12}  {:>12}  {:>6}  Name", "Compressed", "Size", "Ratio");
    println!("{}", "-".repeat(60));

    let mut total_compressed = 0u64;
    let mut total_size = 0u64;

    for row in rows.iter() {
        println!(
            "{:>12}  {:>12}  {:>6}  {}",
            format_size(row.compressed_size),
            format_size(row.size),
            format_ratio(row),
            row.name.escape_debug(),
        );
        total_compressed += row.compressed_size;
        total_size += row.size;
    }

    println!("{}", "-".repeat(60));
    println!(
        "{:>12}  {:>12}  {:>6}  {} entries",
        format_size(total_compressed),
        format_size(total_size),
        "",
        rows.len(),
    );

    Ok(())
}
