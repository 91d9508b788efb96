//! `cookbook show` command implementation.

use std::path::PathBuf;

use clap::Args;
use cookbook_config::{CliSettings, Config};
use cookbook_recipe::{CooklangParser, Recipe, RecipeParser, highlight};
use cookbook_storage::{ContentTree, FolderListing, LogicalPath};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Folder or recipe path, relative to the recipe directory.
    ///
    /// The word separator (default `_`) may stand in for spaces.
    #[arg(default_value = "")]
    path: String,

    /// Path to configuration file (default: auto-discover cookbook.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recipe source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not resolve or the recipe is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let recipes = &config.recipes_resolved;

        let tree = ContentTree::new(recipes.source_dir.clone())
            .with_word_separator(recipes.word_separator)
            .with_exclude_dirs(recipes.exclude_dirs.clone());
        let resolved = tree.resolve(&LogicalPath::parse(&self.path))?;
        let title = resolved.segments().join(" / ");

        let output = Output::stdout();
        if resolved.is_document() {
            let recipe = CooklangParser.parse(&tree.read_document(&resolved)?)?;
            print_recipe(&output, &title, &recipe);
            if let Some(image) = tree.locate_image(&resolved) {
                output.muted(&format!("Image: {image}"));
            }
        } else {
            let listing = tree.list_folder(&resolved)?;
            print_folder(&output, &title, &listing);
        }

        Ok(())
    }
}

fn print_folder(output: &Output, title: &str, listing: &FolderListing) {
    output.highlight(if title.is_empty() { "Cookbook" } else { title });
    if listing.folders.is_empty() && listing.documents.is_empty() {
        output.warning("No recipes here yet");
        return;
    }
    for line in folder_lines(listing) {
        output.info(&line);
    }
}

fn print_recipe(output: &Output, title: &str, recipe: &Recipe) {
    output.highlight(title);
    output.separator();
    for (key, value) in &recipe.metadata {
        output.muted(&format!("{key}: {value}"));
    }

    output.highlight("Ingredients");
    for line in ingredient_lines(recipe) {
        output.info(&line);
    }

    output.highlight("Steps");
    for line in step_lines(recipe) {
        output.info(&line);
    }
}

/// Sub-folders (with trailing `/`) followed by recipes.
fn folder_lines(listing: &FolderListing) -> Vec<String> {
    listing
        .folders
        .iter()
        .map(|name| format!("  {name}/"))
        .chain(listing.documents.iter().map(|name| format!("  {name}")))
        .collect()
}

fn ingredient_lines(recipe: &Recipe) -> Vec<String> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| match &ingredient.quantity {
            Some(quantity) => format!("  - {}: {quantity}", ingredient.name),
            None => format!("  - {}", ingredient.name),
        })
        .collect()
}

/// Numbered steps with inline quantities.
fn step_lines(recipe: &Recipe) -> Vec<String> {
    highlight(&recipe.ingredients, &recipe.steps)
        .iter()
        .enumerate()
        .map(|(index, step)| format!("  {}. {step}", index + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_folder_lines() {
        let listing = FolderListing {
            folders: vec!["Desserts".to_owned()],
            documents: vec!["Pancakes".to_owned(), "Waffles".to_owned()],
        };

        assert_eq!(
            folder_lines(&listing),
            vec!["  Desserts/", "  Pancakes", "  Waffles"]
        );
    }

    #[test]
    fn test_recipe_lines() {
        let recipe = Recipe::parse("Add @flour{200%g} to @water.\n\nKnead the dough.").unwrap();

        assert_eq!(ingredient_lines(&recipe), vec!["  - flour: 200 g", "  - water"]);
        assert_eq!(
            step_lines(&recipe),
            vec!["  1. Add flour(200 g) to water.", "  2. Knead the dough."]
        );
    }
}
