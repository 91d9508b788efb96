//! Read-only access to a recipe content tree.
//!
//! A content tree is an ordinary directory: folders are categories, `*.cook`
//! files are recipes and `*.jpg`/`*.png` files next to a recipe are its photo.
//! Nothing is indexed or cached; every lookup reads the directory it needs.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`LogicalPath`] for caller-supplied segments (word separators, optional `.cook`)
//! - [`ContentTree`] to resolve logical paths to [`ResolvedPath`]s, list folders
//!   and read documents
//! - [`locate_image`] for finding the photo that belongs to a recipe
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use cookbook_storage::{ContentTree, LogicalPath};
//!
//! let tree = ContentTree::new(PathBuf::from("recipes"));
//! let resolved = tree.resolve(&LogicalPath::parse("Desserts/Chocolate_Cake"))?;
//! let text = tree.read_document(&resolved)?;
//! ```

mod error;
mod image;
mod logical;
mod tree;

pub use error::{StorageError, StorageErrorKind};
pub use image::{IMAGE_EXTENSIONS, is_image_name, locate_image};
pub use logical::LogicalPath;
pub use tree::{ContentTree, EntryKind, FolderListing, ResolvedPath};

/// Extension of recipe documents, without the dot.
pub const DOCUMENT_EXTENSION: &str = "cook";
