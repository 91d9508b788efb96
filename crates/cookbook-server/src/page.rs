//! View models for folder and recipe pages.
//!
//! The same models back the HTML templates and the JSON API. Links always
//! use the real entry names, percent-encoded, so following one never relies
//! on tolerant matching.

use cookbook_recipe::{Ingredient, Metadata, Recipe, highlight, highlight_escaped};
use cookbook_storage::{FolderListing, ResolvedPath};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// URL prefix of the browsable tree.
pub(crate) const MOUNT: &str = "/cookbook";

/// Title of the root folder.
const ROOT_TITLE: &str = "Cookbook";

/// Unreserved characters: A-Z a-z 0-9 - . _ ~
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How annotated steps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Markup {
    /// Escaped HTML with quantity spans.
    Html,
    /// Plain text with `(amount unit)` annotations.
    Text,
}

/// A named link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Link {
    pub(crate) name: String,
    pub(crate) href: String,
}

/// A folder or recipe page.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Page {
    Folder(FolderPage),
    Recipe(RecipePage),
}

#[derive(Debug, Serialize)]
pub(crate) struct FolderPage {
    pub(crate) title: String,
    pub(crate) breadcrumbs: Vec<Link>,
    pub(crate) folders: Vec<Link>,
    pub(crate) recipes: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecipePage {
    pub(crate) name: String,
    pub(crate) breadcrumbs: Vec<Link>,
    pub(crate) ingredients: Vec<IngredientView>,
    /// Steps with inline quantity annotations.
    pub(crate) steps: Vec<String>,
    pub(crate) metadata: Metadata,
    /// Link to the recipe photo.
    pub(crate) image: Option<String>,
    /// Render without navigation chrome.
    pub(crate) printable: bool,
}

/// Ingredient as shown in the ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct IngredientView {
    pub(crate) name: String,
    pub(crate) quantity: Option<String>,
}

impl From<&Ingredient> for IngredientView {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            quantity: ingredient.quantity.as_ref().map(ToString::to_string),
        }
    }
}

impl FolderPage {
    pub(crate) fn new(resolved: &ResolvedPath, listing: FolderListing) -> Self {
        let base = folder_href(resolved.segments());
        Self {
            title: resolved.name().unwrap_or(ROOT_TITLE).to_owned(),
            breadcrumbs: breadcrumbs(resolved),
            folders: listing
                .folders
                .into_iter()
                .map(|name| Link {
                    href: format!("{base}{}/", encode_segment(&name)),
                    name,
                })
                .collect(),
            recipes: listing
                .documents
                .into_iter()
                .map(|name| Link {
                    href: format!("{base}{}", encode_segment(&name)),
                    name,
                })
                .collect(),
        }
    }
}

impl RecipePage {
    pub(crate) fn new(
        resolved: &ResolvedPath,
        recipe: &Recipe,
        image: Option<&str>,
        markup: Markup,
        printable: bool,
    ) -> Self {
        let steps = match markup {
            Markup::Html => highlight_html(&recipe.ingredients, &recipe.steps),
            Markup::Text => highlight(&recipe.ingredients, &recipe.steps),
        };
        let image = image.map(|file| {
            format!(
                "{}{}",
                folder_href(resolved.parent()),
                encode_segment(file)
            )
        });

        Self {
            name: resolved.name().unwrap_or_default().to_owned(),
            breadcrumbs: breadcrumbs(resolved),
            ingredients: recipe.ingredients.iter().map(IngredientView::from).collect(),
            steps,
            metadata: recipe.metadata.clone(),
            image,
            printable,
        }
    }
}

/// Links from the root down to the current entry.
///
/// Folder links end with `/`; a trailing document link does not.
pub(crate) fn breadcrumbs(resolved: &ResolvedPath) -> Vec<Link> {
    let mut href = format!("{MOUNT}/");
    let mut links = vec![Link {
        name: ROOT_TITLE.to_owned(),
        href: href.clone(),
    }];

    let last = resolved.segments().len().saturating_sub(1);
    for (index, segment) in resolved.segments().iter().enumerate() {
        href.push_str(&encode_segment(segment));
        if index < last || !resolved.is_document() {
            href.push('/');
        }
        links.push(Link {
            name: segment.clone(),
            href: href.clone(),
        });
    }
    links
}

/// URL of a folder, with trailing slash.
pub(crate) fn folder_href(segments: &[String]) -> String {
    let mut href = format!("{MOUNT}/");
    for segment in segments {
        href.push_str(&encode_segment(segment));
        href.push('/');
    }
    href
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

/// Annotate steps as HTML.
///
/// Matching runs on the raw step text and each piece around a match is
/// escaped, so the quantity spans are the only markup in the result.
pub(crate) fn highlight_html(ingredients: &[Ingredient], steps: &[String]) -> Vec<String> {
    highlight_escaped(ingredients, steps, escape_html, |quantity| {
        format!(
            "<span class=\"ingr-quantity-inline\">({})</span>",
            escape_html(&quantity.to_string())
        )
    })
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
