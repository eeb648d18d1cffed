//! Mapping between entry names and filesystem paths.
//!
//! The codec stores names verbatim. Anything that turns a name back into a
//! file on disk must go through [sanitize] first.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

mod error;

pub use self::error::SanitizeError;

/// Separator used between components of names built by [name_from_path].
pub const NAME_SEP: &str = "/";

/// Backslashes, control characters and every separator other than a plain
/// space are never allowed inside a component.
fn is_forbidden(c: char) -> bool {
    use unic_ucd::GeneralCategory;

    let category = GeneralCategory::of(c);
    c == '\\' || category == GeneralCategory::Control || (category.is_separator() && c != ' ')
}

/// Check a single component and bring it to NFC with surrounding whitespace removed.
fn clean_component(raw: &OsStr) -> Result<String, SanitizeError> {
    use unic_normal::StrNormalForm;

    let component = raw.to_str().ok_or_else(|| SanitizeError::NotUnicode {
        component: raw.to_string_lossy().into_owned(),
    })?;

    let trimmed = component.trim();
    if trimmed.is_empty() {
        return Err(SanitizeError::Blank {
            component: component.to_string(),
        });
    }

    if let Some(ch) = trimmed.chars().find(|&c| is_forbidden(c)) {
        return Err(SanitizeError::ForbiddenChar {
            component: component.to_string(),
            ch,
        });
    }

    Ok(trimmed.nfc().collect())
}

/// Resolve `path` lexically into clean components. `..` removes the last
/// component produced so far and can never climb above the starting point.
fn clean_components(path: &Path) -> Result<Vec<String>, SanitizeError> {
    let mut out: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(raw) => out.push(clean_component(raw)?),
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if out.is_empty() {
        Err(SanitizeError::Empty)
    } else {
        Ok(out)
    }
}

/// Turn an untrusted entry name into a relative path that stays inside
/// whatever directory it is joined onto.
///
/// Root, prefix and `.` components are dropped and `..` only ever pops a
/// component produced by the name itself. Components containing control
/// characters, backslashes or non-space separators are rejected, and the
/// error names the offending component.
pub fn sanitize(name: &str) -> Result<PathBuf, SanitizeError> {
    Ok(clean_components(Path::new(name))?.iter().collect())
}

/// Build an entry name from a relative filesystem path, joining its
/// components with [NAME_SEP].
pub fn name_from_path<P: AsRef<Path>>(path: P) -> Result<String, SanitizeError> {
    Ok(clean_components(path.as_ref())?.join(NAME_SEP))
}
