//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use cookbook_recipe::{CooklangParser, RecipeParser};
use cookbook_storage::ContentTree;
use minijinja::Environment;

use crate::ServerConfig;
use crate::templates;

/// Application state shared across all handlers.
///
/// Immutable after construction; every request reads the tree afresh.
pub(crate) struct AppState {
    /// Recipe content tree.
    pub(crate) tree: ContentTree,
    /// Parser for recipe documents.
    pub(crate) parser: Box<dyn RecipeParser>,
    /// Page templates.
    pub(crate) templates: Environment<'static>,
    /// Directory served under `/static`.
    pub(crate) static_dir: PathBuf,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}

impl AppState {
    /// Build state for the given configuration with the default parser.
    pub(crate) fn new(config: &ServerConfig) -> Result<Self, minijinja::Error> {
        let tree = ContentTree::new(config.source_dir.clone())
            .with_word_separator(config.word_separator)
            .with_exclude_dirs(config.exclude_dirs.clone());

        Ok(Self {
            tree,
            parser: Box::new(CooklangParser),
            templates: templates::environment()?,
            static_dir: config.static_dir.clone(),
            version: config.version.clone(),
        })
    }
}
