//! Output target checks shared by export and backup
//!
//! Writing an export or backup below the database root would create
//! containers or drop non-document files into one, so such targets are
//! rejected before anything touches the disk.

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::errors::{TransferError, TransferResult};

/// Fails with `InvalidTarget` if `target` would land inside `root`
pub(crate) fn ensure_outside_root(
    root: &Path,
    target: &Path,
    reason: &'static str,
) -> TransferResult<()> {
    if is_inside(root, target)? {
        return Err(TransferError::InvalidTarget {
            path: target.to_path_buf(),
            reason,
        });
    }
    Ok(())
}

/// True if `target`, which need not exist, resolves to `root` or below it
pub(crate) fn is_inside(root: &Path, target: &Path) -> TransferResult<bool> {
    let canonical_root = fs::canonicalize(root)
        .map_err(|e| TransferError::io(format!("Failed to resolve {}", root.display()), e))?;
    Ok(resolve(target)?.starts_with(&canonical_root))
}

/// Canonicalizes the longest existing prefix of `path` and appends the
/// rest lexically. Nothing is created.
fn resolve(path: &Path) -> TransferResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| TransferError::io("Failed to read the working directory", e))?
            .join(path)
    };

    let components: Vec<Component<'_>> = absolute.components().collect();
    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        match fs::canonicalize(&prefix) {
            Ok(mut resolved) => {
                for component in &components[split..] {
                    match component {
                        Component::ParentDir => {
                            resolved.pop();
                        }
                        Component::CurDir => {}
                        other => resolved.push(other.as_os_str()),
                    }
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(TransferError::io(
                    format!("Failed to resolve {}", prefix.display()),
                    e,
                ))
            }
        }
    }

    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_paths_below_root_are_inside() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("db");
        fs::create_dir_all(root.join("users")).unwrap();

        assert!(is_inside(&root, &root).unwrap());
        assert!(is_inside(&root, &root.join("users")).unwrap());
        assert!(is_inside(&root, &root.join("stray/deeper/b.tar")).unwrap());
        assert!(is_inside(&root, &temp.path().join("x/../db/new")).unwrap());
    }

    #[test]
    fn test_siblings_are_outside() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("db");
        fs::create_dir_all(&root).unwrap();

        assert!(!is_inside(&root, &temp.path().join("db_backup")).unwrap());
        assert!(!is_inside(&root, &temp.path().join("out/users.json")).unwrap());
        assert!(!is_inside(&root, &root.join("../elsewhere")).unwrap());
    }

    #[test]
    fn test_resolve_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("db");
        fs::create_dir_all(&root).unwrap();

        let err = ensure_outside_root(&root, &root.join("stray/b.tar"), "inside").unwrap_err();
        assert!(err.is_validation());
        assert!(!root.join("stray").exists());
    }
}
