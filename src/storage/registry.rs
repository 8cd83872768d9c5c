//! Container registry
//!
//! One subdirectory of the database root per container. The registry is
//! the single place that decides whether a container exists, so every
//! operation that targets a container fails with the same
//! `ContainerNotFound` instead of a lower-level I/O error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::naming::{is_valid_name, validate_container_name};
use crate::observability::{log_event_with_fields, Event};

/// Enumerates, creates and drops containers under a database root
#[derive(Debug, Clone)]
pub struct ContainerRegistry {
    root: PathBuf,
}

impl ContainerRegistry {
    /// Opens the registry at `root`, creating the directory if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the root exists but is not a directory
    /// or cannot be created.
    pub fn open(root: &Path) -> StorageResult<Self> {
        if root.exists() {
            if !root.is_dir() {
                return Err(StorageError::io(
                    format!("Database root {} is not a directory", root.display()),
                    io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
                ));
            }
        } else {
            fs::create_dir_all(root).map_err(|e| {
                StorageError::io(
                    format!("Failed to create database root {}", root.display()),
                    e,
                )
            })?;
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the database root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates an empty container
    pub fn create(&self, name: &str) -> StorageResult<()> {
        validate_container_name(name)?;
        let path = self.root.join(name);

        if path.exists() {
            return Err(StorageError::ContainerAlreadyExists(name.to_string()));
        }

        fs::create_dir(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                StorageError::ContainerAlreadyExists(name.to_string())
            } else {
                StorageError::io(format!("Failed to create container '{}'", name), e)
            }
        })?;

        log_event_with_fields(Event::ContainerCreated, &[("container", name)]);
        Ok(())
    }

    /// Removes a container and every document in it. Irreversible.
    pub fn drop(&self, name: &str) -> StorageResult<()> {
        let path = self.require(name)?;

        fs::remove_dir_all(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::ContainerNotFound(name.to_string())
            } else {
                StorageError::io(format!("Failed to drop container '{}'", name), e)
            }
        })?;

        log_event_with_fields(Event::ContainerDropped, &[("container", name)]);
        Ok(())
    }

    /// Lists existing containers in name order
    pub fn list(&self) -> StorageResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            StorageError::io(
                format!("Failed to list database root {}", self.root.display()),
                e,
            )
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io("Failed to read directory entry", e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_valid_name(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Returns true if the container exists. Invalid names never exist.
    pub fn exists(&self, name: &str) -> bool {
        is_valid_name(name) && self.root.join(name).is_dir()
    }

    /// Resolves a container to its directory, failing with
    /// `ContainerNotFound` when it does not exist.
    pub fn require(&self, name: &str) -> StorageResult<PathBuf> {
        validate_container_name(name)?;
        let path = self.root.join(name);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(StorageError::ContainerNotFound(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> (TempDir, ContainerRegistry) {
        let temp = TempDir::new().unwrap();
        let registry = ContainerRegistry::open(temp.path()).unwrap();
        (temp, registry)
    }

    #[test]
    fn test_open_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("db");
        let registry = ContainerRegistry::open(&root).unwrap();
        assert!(registry.root().is_dir());
    }

    #[test]
    fn test_open_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not_a_dir");
        fs::write(&file, b"x").unwrap();
        assert!(ContainerRegistry::open(&file).is_err());
    }

    #[test]
    fn test_create_list_exists() {
        let (_temp, registry) = registry();
        registry.create("users").unwrap();
        registry.create("products").unwrap();

        assert!(registry.exists("users"));
        assert!(!registry.exists("orders"));
        assert_eq!(registry.list().unwrap(), vec!["products", "users"]);
    }

    #[test]
    fn test_create_duplicate_fails() {
        let (_temp, registry) = registry();
        registry.create("users").unwrap();
        let err = registry.create("users").unwrap_err();
        assert!(matches!(err, StorageError::ContainerAlreadyExists(_)));
    }

    #[test]
    fn test_drop_missing_fails() {
        let (_temp, registry) = registry();
        let err = registry.drop("ghost").unwrap_err();
        assert!(matches!(err, StorageError::ContainerNotFound(_)));
    }

    #[test]
    fn test_drop_removes_contents() {
        let (_temp, registry) = registry();
        registry.create("users").unwrap();
        fs::write(registry.root().join("users").join("u1.json"), b"{}").unwrap();

        registry.drop("users").unwrap();
        assert!(!registry.exists("users"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let (_temp, registry) = registry();
        assert!(registry.create("../escape").unwrap_err().is_validation());
        assert!(!registry.exists("../escape"));
    }

    #[test]
    fn test_list_ignores_files_and_hidden_dirs() {
        let (_temp, registry) = registry();
        registry.create("users").unwrap();
        fs::write(registry.root().join("notes.txt"), b"x").unwrap();
        fs::create_dir(registry.root().join(".git")).unwrap();
        assert_eq!(registry.list().unwrap(), vec!["users"]);
    }
}
