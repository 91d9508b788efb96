//! Content tree access and tolerant path resolution.
//!
//! Resolution walks the tree one segment at a time. Each step performs a
//! single directory listing and compares the logical segment against the real
//! child names, so cost grows with path depth rather than tree size.
//!
//! # Matching order
//!
//! For every segment the first hit wins:
//!
//! 1. exact folder name
//! 2. exact document base name
//! 3. normalized folder name
//! 4. normalized document base name
//!
//! Normalization replaces the word separator (`_` by default) with a space on
//! both sides, so `Main_Dishes` finds `Main Dishes` and `Ice Cream` finds
//! `Ice_Cream`. Candidates are sorted before matching, so duplicates that
//! normalize to the same name resolve the same way on every platform.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::DOCUMENT_EXTENSION;
use crate::error::StorageError;
use crate::image::{is_image_name, locate_image};
use crate::logical::LogicalPath;

/// Default replacement for spaces in URLs.
const DEFAULT_WORD_SEPARATOR: char = '_';

/// Kind of entry a resolved path ends at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    Document,
}

/// Real entry names verified against the tree, from the root down.
///
/// Every prefix names an existing folder. Only the last segment may name a
/// document, in which case it is the document's base name without extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    segments: Vec<String>,
    kind: EntryKind,
}

impl ResolvedPath {
    /// The root folder.
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            kind: EntryKind::Folder,
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[must_use]
    pub fn is_document(&self) -> bool {
        self.kind == EntryKind::Document
    }

    /// Name of the final entry, `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// All segments except the last.
    #[must_use]
    pub fn parent(&self) -> &[String] {
        self.segments
            .split_last()
            .map(|(_, parent)| parent)
            .unwrap_or_default()
    }
}

/// Visible contents of a folder, each list sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderListing {
    /// Sub-folder names, without hidden or excluded folders.
    pub folders: Vec<String>,
    /// Document base names (extension stripped).
    pub documents: Vec<String>,
}

/// Names returned by one directory listing, sorted.
#[derive(Debug, Default)]
struct Children {
    folders: Vec<String>,
    documents: Vec<String>,
    /// Regular files that are not documents.
    files: Vec<String>,
}

/// Read-only recipe tree rooted at a content directory.
///
/// Holds only configuration: every call lists and reads the filesystem
/// afresh, so one instance can be shared freely between threads.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use cookbook_storage::{ContentTree, LogicalPath};
///
/// let tree = ContentTree::new(PathBuf::from("recipes"));
/// let resolved = tree.resolve(&LogicalPath::parse("Main_Dishes/Lasagne"))?;
/// assert_eq!(resolved.segments(), ["Main Dishes", "Lasagne"]);
/// ```
#[derive(Debug, Clone)]
pub struct ContentTree {
    root: PathBuf,
    word_separator: char,
    exclude_dirs: Vec<String>,
}

impl ContentTree {
    /// Create a content tree using `_` as the word separator and no excluded folders.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            word_separator: DEFAULT_WORD_SEPARATOR,
            exclude_dirs: Vec::new(),
        }
    }

    /// Set the character that stands in for a space in logical paths.
    #[must_use]
    pub fn with_word_separator(mut self, word_separator: char) -> Self {
        self.word_separator = word_separator;
        self
    }

    /// Set folder names hidden from listings.
    ///
    /// Excluded folders are still reachable through [`resolve`](Self::resolve).
    #[must_use]
    pub fn with_exclude_dirs(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical path to the real entry it denotes.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if a segment is `.`/`..`, contains a separator, or the
    ///   resolved entry lies outside the root (e.g. through a symlink)
    /// - `NotFound` if a segment matches nothing or only a hidden entry, or
    ///   segments follow a document
    pub fn resolve(&self, logical: &LogicalPath) -> Result<ResolvedPath, StorageError> {
        for segment in logical.segments() {
            validate_segment(segment)?;
        }

        let mut segments = Vec::with_capacity(logical.segments().len());
        let mut kind = EntryKind::Folder;
        let mut current = self.root.clone();

        for segment in logical.segments() {
            if kind == EntryKind::Document {
                tracing::debug!(path = %display_path(logical), "Path continues past a document");
                return Err(StorageError::not_found(display_path(logical)));
            }

            let children = list_children(&current)?;
            let Some((name, matched)) = self
                .match_segment(segment, &children)
                .filter(|(name, _)| !is_hidden(name))
            else {
                tracing::debug!(
                    segment = %segment,
                    dir = %current.display(),
                    "No entry matches path segment"
                );
                return Err(StorageError::not_found(display_path(logical)));
            };

            if matched == EntryKind::Folder {
                current.push(&name);
                self.ensure_within_root(&current)?;
            }
            segments.push(name);
            kind = matched;
        }

        let resolved = ResolvedPath { segments, kind };
        self.ensure_within_root(&self.fs_path(&resolved))?;
        Ok(resolved)
    }

    /// Resolve a logical path naming an image file next to the documents.
    ///
    /// The parent segments resolve like folders; the file name is matched
    /// exactly first, then normalized, against image files only.
    ///
    /// # Errors
    ///
    /// Same conditions as [`resolve`](Self::resolve).
    pub fn resolve_image(&self, logical: &LogicalPath) -> Result<PathBuf, StorageError> {
        for segment in logical.segments() {
            validate_segment(segment)?;
        }
        let Some((file_name, parent)) = logical.split_last() else {
            return Err(StorageError::not_found(display_path(logical)));
        };

        let folder = self.resolve(&parent)?;
        if folder.is_document() {
            return Err(StorageError::not_found(display_path(logical)));
        }

        let dir = self.fs_path(&folder);
        let children = list_children(&dir)?;
        let images: Vec<&String> = children
            .files
            .iter()
            .filter(|name| is_image_name(name) && !is_hidden(name))
            .collect();

        let wanted = self.normalize(file_name);
        let name = images
            .iter()
            .find(|name| name.as_str() == file_name)
            .or_else(|| images.iter().find(|name| self.normalize(name) == wanted))
            .ok_or_else(|| StorageError::not_found(display_path(logical)))?;

        let path = dir.join(name);
        self.ensure_within_root(&path)?;
        Ok(path)
    }

    /// List the visible contents of a resolved folder.
    ///
    /// Hidden entries (leading `.`) and excluded folder names are left out.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `resolved` is a document or the folder vanished.
    pub fn list_folder(&self, resolved: &ResolvedPath) -> Result<FolderListing, StorageError> {
        if resolved.is_document() {
            return Err(StorageError::not_found(self.fs_path(resolved)));
        }

        let children = list_children(&self.fs_path(resolved))?;
        let folders = children
            .folders
            .into_iter()
            .filter(|name| !is_hidden(name) && !self.exclude_dirs.contains(name))
            .collect();
        let documents = children
            .documents
            .into_iter()
            .filter(|name| !is_hidden(name))
            .collect();

        Ok(FolderListing { folders, documents })
    }

    /// Read the raw text of a resolved document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for folders, or an I/O error from reading.
    pub fn read_document(&self, resolved: &ResolvedPath) -> Result<String, StorageError> {
        let path = self.fs_path(resolved);
        if !resolved.is_document() {
            return Err(StorageError::not_found(path));
        }
        fs::read_to_string(&path).map_err(|e| StorageError::io(e, path))
    }

    /// Modification time of the entry behind a resolved path.
    #[must_use]
    pub fn modified(&self, resolved: &ResolvedPath) -> Option<SystemTime> {
        fs::metadata(self.fs_path(resolved))
            .and_then(|m| m.modified())
            .ok()
    }

    /// File name of the image accompanying a resolved document, if any.
    #[must_use]
    pub fn locate_image(&self, resolved: &ResolvedPath) -> Option<String> {
        if !resolved.is_document() {
            return None;
        }
        let name = resolved.name()?;
        let dir = resolved
            .parent()
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment));
        locate_image(&dir, name)
    }

    /// Filesystem path of a resolved entry (documents get their extension back).
    #[must_use]
    pub fn fs_path(&self, resolved: &ResolvedPath) -> PathBuf {
        let mut path = self.root.clone();
        for segment in resolved.parent() {
            path.push(segment);
        }
        if let Some(name) = resolved.name() {
            if resolved.is_document() {
                path.push(format!("{name}.{DOCUMENT_EXTENSION}"));
            } else {
                path.push(name);
            }
        }
        path
    }

    /// Find the real child a logical segment refers to.
    fn match_segment(&self, segment: &str, children: &Children) -> Option<(String, EntryKind)> {
        let candidates: Vec<(&String, EntryKind)> = children
            .folders
            .iter()
            .map(|name| (name, EntryKind::Folder))
            .chain(
                children
                    .documents
                    .iter()
                    .map(|name| (name, EntryKind::Document)),
            )
            .collect();

        let wanted = self.normalize(segment);
        candidates
            .iter()
            .find(|(name, _)| name.as_str() == segment)
            .or_else(|| {
                candidates
                    .iter()
                    .find(|(name, _)| self.normalize(name) == wanted)
            })
            .map(|&(name, kind)| (name.clone(), kind))
    }

    fn normalize(&self, name: &str) -> String {
        name.replace(self.word_separator, " ")
    }

    /// Reject paths whose real location is outside the content root.
    fn ensure_within_root(&self, path: &Path) -> Result<(), StorageError> {
        let root = fs::canonicalize(&self.root).map_err(|e| StorageError::io(e, &self.root))?;
        let real = fs::canonicalize(path).map_err(|e| StorageError::io(e, path))?;
        if real.starts_with(&root) {
            Ok(())
        } else {
            tracing::warn!(path = %path.display(), "Path escapes the content root");
            Err(StorageError::forbidden(path))
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Reject segments that could step outside the current directory.
fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment == "." || segment == ".." || segment.contains(['/', '\\', '\0']) {
        return Err(StorageError::forbidden(segment));
    }
    Ok(())
}

/// List a directory once, splitting children into folders, documents and files.
fn list_children(dir: &Path) -> Result<Children, StorageError> {
    let entries = fs::read_dir(dir).map_err(|e| StorageError::io(e, dir))?;

    let mut children = Children::default();
    for entry in entries.filter_map(Result::ok) {
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "Skipping entry with non UTF-8 name");
            continue;
        };
        // Follows symlinks; escapes are caught by `ensure_within_root`
        let path = entry.path();
        if path.is_dir() {
            children.folders.push(name);
        } else if path.is_file() {
            match document_base_name(&name) {
                Some(base) => children.documents.push(base.to_owned()),
                None => children.files.push(name),
            }
        }
    }

    children.folders.sort();
    children.documents.sort();
    children.files.sort();
    Ok(children)
}

/// Base name of a document file, `None` for anything else.
fn document_base_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(DOCUMENT_EXTENSION)?
        .strip_suffix('.')
        .filter(|base| !base.is_empty())
}

fn display_path(logical: &LogicalPath) -> String {
    logical.segments().join("/")
}
