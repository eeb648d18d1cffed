use std::path::PathBuf;

use lzbox_format::path::SanitizeError;
use lzbox_format::{DecodeError, EncodeError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No files specified to add to archive")]
    NoFilesSpecified,

    #[error("Archive already exists: `{}` (use -f/--force to overwrite)", .path.display())]
    ArchiveExists { path: PathBuf },

    #[error("Cowardly refusing to add archive `{}` to itself", .path.display())]
    ArchiveIntoSelf { path: PathBuf },

    #[error("Cannot derive an archive name from `{}`", .path.display())]
    NoArchiveName { path: PathBuf },

    #[error("`{}` is a directory (use -r/--recursive to add it)", .path.display())]
    IsDirectory { path: PathBuf },

    #[error("Cannot handle path `{}`", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: SanitizeError,
    },

    #[error("Cannot canonicalize path `{}`", .path.display())]
    CanonicalizePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Two entries would be extracted to `{}`: `{}` and `{}`", .path.display(), .first.escape_debug(), .second.escape_debug())]
    NameCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Cannot process directory entry")]
    ProcessDirEntry {
        #[source]
        source: walkdir::Error,
    },

    #[error("Cannot read file `{}`", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot add file to archive `{}`", .path.display())]
    AddFile {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },

    #[error("Cannot write archive `{}`", .path.display())]
    WriteArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode archive `{}`; is this a valid .box file?", .path.display())]
    DecodeArchive {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Refusing to extract entry `{}`", .name.escape_debug())]
    UnsafeName {
        name: String,
        #[source]
        source: SanitizeError,
    },

    #[error("Cannot create directory `{}`", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write file `{}`", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize listing")]
    Json(#[from] serde_json::Error),
}
