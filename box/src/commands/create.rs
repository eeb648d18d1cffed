use std::path::{Path, PathBuf};

use lzbox_format::path::{name_from_path, SanitizeError};
use lzbox_format::BoxWriter;
use walkdir::WalkDir;

use crate::cli::CreateArgs;
use crate::error::{Error, Result};

/// `<stem of first file>.box`, in the current directory.
pub(crate) fn default_archive_name(first: &Path) -> Result<PathBuf> {
    let stem = first.file_stem().ok_or_else(|| Error::NoArchiveName {
        path: first.to_path_buf(),
    })?;

    let mut name = stem.to_os_string();
    name.push(".box");
    Ok(PathBuf::from(name))
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|source| Error::CanonicalizePath {
        path: path.to_path_buf(),
        source,
    })
}

/// Canonical form of the archive path. The archive may not exist yet, in
/// which case its parent directory is resolved instead.
fn canonical_output(output: &Path) -> Result<PathBuf> {
    if output.exists() {
        return canonicalize(output);
    }

    let file_name = output.file_name().ok_or_else(|| Error::NoArchiveName {
        path: output.to_path_buf(),
    })?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(canonicalize(parent)?.join(file_name))
}

fn entry_name(path: &Path, relative: &Path) -> Result<String> {
    name_from_path(relative).map_err(|source| Error::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the selected paths into `(entry name, file path)` pairs, keeping
/// the order they were given in.
///
/// `archive` is the canonical output path. Naming it directly is an error;
/// meeting it during a recursive walk skips it.
fn collect_inputs(
    files: &[PathBuf],
    recursive: bool,
    archive: &Path,
) -> Result<Vec<(String, PathBuf)>> {
    let mut out = vec![];

    for path in files {
        let meta = std::fs::metadata(path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;

        if !meta.is_dir() {
            if canonicalize(path)? == archive {
                return Err(Error::ArchiveIntoSelf { path: path.clone() });
            }

            let file_name = path.file_name().ok_or_else(|| Error::InvalidPath {
                path: path.clone(),
                source: SanitizeError::Empty,
            })?;
            out.push((entry_name(path, Path::new(file_name))?, path.clone()));
            continue;
        }

        if !recursive {
            return Err(Error::IsDirectory { path: path.clone() });
        }

        // Entries keep the walked directory's own name as their first component.
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|source| Error::ProcessDirEntry { source })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file_path = entry.path();
            if canonicalize(file_path)? == archive {
                tracing::debug!(path = %file_path.display(), "skipping the archive being written");
                continue;
            }

            let relative = file_path.strip_prefix(base).unwrap_or(file_path);
            out.push((entry_name(file_path, relative)?, file_path.to_path_buf()));
        }
    }

    Ok(out)
}

pub fn run(args: CreateArgs, verbose: bool) -> Result<()> {
    let first = args.files.first().ok_or(Error::NoFilesSpecified)?;
    let output = match args.output {
        Some(output) => output,
        None => default_archive_name(first)?,
    };

    if args.files.contains(&output) {
        return Err(Error::ArchiveIntoSelf { path: output });
    }

    if output.exists() && !args.force {
        return Err(Error::ArchiveExists { path: output });
    }

    let archive = canonical_output(&output)?;
    let inputs = collect_inputs(&args.files, args.recursive, &archive)?;

    let mut writer = BoxWriter::new();

    for (name, path) in inputs {
        let data = std::fs::read(&path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;

        writer
            .insert(&name, &data)
            .map_err(|source| Error::AddFile {
                path: path.clone(),
                source,
            })?;

        if verbose {
            println!("{}", name);
        }
    }

    let entries = writer.len();
    let bytes = writer.finish();

    std::fs::write(&output, &bytes).map_err(|source| Error::WriteArchive {
        path: output.clone(),
        source,
    })?;

    tracing::info!(
        path = %output.display(),
        entries,
        bytes = bytes.len(),
        "created archive"
    );

    Ok(())
}
