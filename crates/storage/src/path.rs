//! File name validation.
//!
//! Directories are flat: every name handed to a [`Directory`](crate::Directory)
//! must resolve to exactly one plain component, so nothing can escape the
//! directory root or reach into a subdirectory.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a file name for use inside a flat directory.
///
/// Leading `./` and trailing slashes are tolerated and stripped. Anything that
/// would produce more or less than one normal component is rejected, as are
/// null bytes.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use slidearc_storage::validate_name;
/// assert_eq!(validate_name("260206_SM_01.png").unwrap(), Path::new("260206_SM_01.png"));
/// assert_eq!(validate_name("./list.json").unwrap(), Path::new("list.json"));
/// assert!(validate_name("archive/260206_SM_01.webp").is_err());
/// assert!(validate_name("../etc/passwd").is_err());
/// assert!(validate_name("a\0b").is_err());
/// ```
pub fn validate(name: impl AsRef<Path>) -> Result<PathBuf> {
    let name = name.as_ref();
    let mut components = Vec::new();
    for component in name.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(name.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir => {},
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                exn::bail!(ErrorKind::InvalidPath(name.to_path_buf()))
            },
        }
    }
    match components.as_slice() {
        [single] => Ok(PathBuf::from(single)),
        _ => exn::bail!(ErrorKind::InvalidPath(name.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("260206_SM_01.png", "260206_SM_01.png")]
    #[case("./260206_SM_01.webp", "260206_SM_01.webp")]
    #[case("list.json/", "list.json")]
    #[case("한글_라벨_01.png", "한글_라벨_01.png")]
    fn test_valid_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(validate(name).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../file.png")]
    #[case("/abs/file.png")]
    #[case("archive/file.png")]
    #[case("a/../b.png")]
    #[case("a\0b")]
    fn test_invalid_names(#[case] name: &str) {
        assert!(matches!(&*validate(name).unwrap_err(), ErrorKind::InvalidPath(_)));
    }
}
