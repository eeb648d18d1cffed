use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use lzbox_format::{decode_reader, path::sanitize, Entry};

use crate::cli::ExtractArgs;
use crate::error::{Error, Result};

/// Two entries collide when they sanitize to the same file, or when one
/// entry's file would have to be a directory for another.
fn check_collisions(entries: &[Entry], relatives: &[PathBuf], output_path: &Path) -> Result<()> {
    let mut files: HashMap<&Path, &str> = HashMap::with_capacity(relatives.len());

    for (entry, relative) in entries.iter().zip(relatives) {
        if let Some(first) = files.insert(relative, &entry.name) {
            return Err(Error::NameCollision {
                path: output_path.join(relative),
                first: first.to_string(),
                second: entry.name.clone(),
            });
        }
    }

    for (entry, relative) in entries.iter().zip(relatives) {
        for ancestor in relative.ancestors().skip(1) {
            if let Some(first) = files.get(ancestor) {
                return Err(Error::NameCollision {
                    path: output_path.join(ancestor),
                    first: first.to_string(),
                    second: entry.name.clone(),
                });
            }
        }
    }

    Ok(())
}

pub fn run(args: ExtractArgs, verbose: bool) -> Result<()> {
    let file = File::open(&args.path).map_err(|source| Error::OpenArchive {
        path: args.path.clone(),
        source,
    })?;

    let entries = decode_reader(BufReader::new(file)).map_err(|source| Error::DecodeArchive {
        path: args.path.clone(),
        source,
    })?;

    let output_path = match args.output {
        Some(path) => path,
        None => PathBuf::from("."),
    };

    // Every name is checked before anything touches the disk.
    let relatives = entries
        .iter()
        .map(|entry| {
            sanitize(&entry.name).map_err(|source| Error::UnsafeName {
                name: entry.name.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    check_collisions(&entries, &relatives, &output_path)?;

    let targets = relatives
        .iter()
        .map(|relative| output_path.join(relative))
        .collect::<Vec<_>>();

    std::fs::create_dir_all(&output_path).map_err(|source| Error::CreateDirectory {
        path: output_path.clone(),
        source,
    })?;

    for (entry, target) in entries.iter().zip(targets.iter()) {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(target, &entry.data).map_err(|source| Error::WriteFile {
            path: target.clone(),
            source,
        })?;

        if verbose {
            println!("{}", target.display());
        }
        tracing::debug!(name = %entry.name, path = %target.display(), bytes = entry.data.len(), "extracted entry");
    }

    tracing::info!(
        path = %output_path.display(),
        entries = entries.len(),
        "extracted archive"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lzbox_format::encode;

    fn write_box(dir: &std::path::Path, entries: &[Entry]) -> PathBuf {
        let path = dir.join("test.box");
        std::fs::write(&path, encode(entries).unwrap()).unwrap();
        path
    }

    #[test]
    fn extracts_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_box(
            dir.path(),
            &[
                Entry::new("a.txt", b"hello".to_vec()),
                Entry::new("nested/b.txt", b"world".to_vec()),
            ],
        );
        let out = dir.path().join("out");

        run(
            ExtractArgs {
                output: Some(out.clone()),
                path: archive,
            },
            false,
        )
        .unwrap();

        assert_eq!(std::fs::read(out.join("a.txt")).unwrap(), b"hello");
        assert_eq!(
            std::fs::read(out.join("nested").join("b.txt")).unwrap(),
            b"world"
        );
    }

    #[test]
    fn traversal_stays_inside_output() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_box(dir.path(), &[Entry::new("../../escape.txt", b"x".to_vec())]);
        let out = dir.path().join("out");

        run(
            ExtractArgs {
                output: Some(out.clone()),
                path: archive,
            },
            false,
        )
        .unwrap();

        assert!(out.join("escape.txt").is_file());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[test]
    fn unsafe_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_box(
            dir.path(),
            &[
                Entry::new("fine.txt", b"ok".to_vec()),
                Entry::new("bad\u{7}name", b"no".to_vec()),
            ],
        );
        let out = dir.path().join("out");

        let err = run(
            ExtractArgs {
                output: Some(out.clone()),
                path: archive,
            },
            false,
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnsafeName { .. }));
        assert!(!out.exists());
    }

    fn assert_collides(names: &[&str]) {
        let dir = tempfile::tempdir().unwrap();
        let entries = names
            .iter()
            .map(|name| Entry::new(*name, b"data".to_vec()))
            .collect::<Vec<_>>();
        let archive = write_box(dir.path(), &entries);
        let out = dir.path().join("out");

        let err = run(
            ExtractArgs {
                output: Some(out.clone()),
                path: archive,
            },
            false,
        )
        .unwrap_err();

        assert!(
            matches!(err, Error::NameCollision { .. }),
            "{:?} gave {:?}",
            names,
            err
        );
        assert!(!out.exists(), "{:?} wrote into the output", names);
    }

    #[test]
    fn duplicate_names_write_nothing() {
        assert_collides(&["x", "x"]);
        assert_collides(&["d/../x", "x"]);
        assert_collides(&["/x", "x"]);
    }

    #[test]
    fn file_used_as_directory_writes_nothing() {
        assert_collides(&["a", "a/b"]);
        assert_collides(&["a/b/c", "a"]);
        assert_collides(&["a/b", "a/b/c/d"]);
    }

    #[test]
    fn shared_directories_are_not_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_box(
            dir.path(),
            &[
                Entry::new("a/b", b"1".to_vec()),
                Entry::new("a/c", b"2".to_vec()),
                Entry::new("ab", b"3".to_vec()),
            ],
        );
        let out = dir.path().join("out");

        run(
            ExtractArgs {
                output: Some(out.clone()),
                path: archive,
            },
            false,
        )
        .unwrap();

        assert_eq!(std::fs::read(out.join("a").join("b")).unwrap(), b"1");
        assert_eq!(std::fs::read(out.join("a").join("c")).unwrap(), b"2");
        assert_eq!(std::fs::read(out.join("ab")).unwrap(), b"3");
    }

    #[test]
    fn truncated_archive_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.box");
        let data = encode(&[Entry::new("a.txt", b"hello".to_vec())]).unwrap();
        std::fs::write(&path, &data[..data.len() - 3]).unwrap();

        let err = run(
            ExtractArgs {
                output: Some(dir.path().join("out")),
                path,
            },
            false,
        )
        .unwrap_err();

        match err {
            Error::DecodeArchive {
                source: lzbox_format::DecodeError::Truncated { .. },
                ..
            } => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
