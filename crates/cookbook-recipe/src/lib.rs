//! Recipe documents for the cookbook server.
//!
//! This crate provides:
//! - [`Recipe`]: the parsed form of a recipe document (ingredients, steps, metadata)
//! - [`RecipeParser`]: the parser seam, with [`CooklangParser`] as the default implementation
//! - [`highlight`]: inline quantity annotation of instruction steps
//!
//! # Quick Start
//!
//! ```
//! use cookbook_recipe::{CooklangParser, RecipeParser, highlight};
//!
//! let recipe = CooklangParser.parse("Add @flour{200%g} and @water.").unwrap();
//! let steps = highlight(&recipe.ingredients, &recipe.steps);
//!
//! assert_eq!(steps, vec!["Add flour(200 g) and water."]);
//! ```

mod highlight;
mod model;
mod parser;

pub use highlight::{highlight, highlight_escaped, highlight_with};
pub use model::{Amount, Ingredient, Metadata, Quantity, Recipe};
pub use parser::{CooklangParser, ParseError, RecipeParser};
