//! Inline quantity annotation of instruction steps.
//!
//! Every ingredient is looked up in every step as a plain substring (no word
//! boundaries, so `oil` also matches inside `boil`). The first occurrence per
//! step yields an insertion right after the match. Offsets always refer to the
//! raw step text; the output is assembled left to right from the raw pieces
//! between insertions, so escaping a piece never moves a match.

use crate::model::{Ingredient, Quantity};

/// A pending annotation: where to insert and for which ingredient.
#[derive(Debug, Clone, Copy)]
struct Insertion<'a> {
    offset: usize,
    ingredient: &'a Ingredient,
}

/// Annotate steps with `(amount unit)` after each ingredient occurrence.
///
/// Returns a new list with the same length and order as `steps`.
///
/// # Example
///
/// ```
/// use cookbook_recipe::{Amount, Ingredient, Quantity, highlight};
///
/// let flour = Ingredient::new("flour")
///     .with_quantity(Quantity::new(Amount::Number(200.0), Some("g".to_owned())));
/// let steps = vec!["Add flour and water".to_owned()];
///
/// assert_eq!(
///     highlight(&[flour, Ingredient::new("water")], &steps),
///     vec!["Add flour(200 g) and water"]
/// );
/// ```
pub fn highlight(ingredients: &[Ingredient], steps: &[String]) -> Vec<String> {
    highlight_with(ingredients, steps, |quantity| format!("({quantity})"))
}

/// Annotate steps using a caller-supplied markup for each quantity.
///
/// Ingredients without a quantity still match but insert nothing, so their
/// steps come back unchanged. Ingredients with an empty name are ignored.
pub fn highlight_with<F>(ingredients: &[Ingredient], steps: &[String], annotate: F) -> Vec<String>
where
    F: Fn(&Quantity) -> String,
{
    highlight_escaped(ingredients, steps, str::to_owned, annotate)
}

/// Annotate steps, passing every piece of original step text through `escape`.
///
/// Matching happens on the unescaped text, so names never match inside an
/// escape sequence and the annotations land where [`highlight`] puts them.
/// The output of `annotate` is inserted as is.
pub fn highlight_escaped<E, F>(
    ingredients: &[Ingredient],
    steps: &[String],
    escape: E,
    annotate: F,
) -> Vec<String>
where
    E: Fn(&str) -> String,
    F: Fn(&Quantity) -> String,
{
    steps
        .iter()
        .map(|step| {
            let mut annotated = String::with_capacity(step.len());
            let mut cursor = 0;
            for insertion in find_insertions(ingredients, step) {
                let Some(quantity) = &insertion.ingredient.quantity else {
                    continue;
                };
                annotated.push_str(&escape(&step[cursor..insertion.offset]));
                annotated.push_str(&annotate(quantity));
                cursor = insertion.offset;
            }
            annotated.push_str(&escape(&step[cursor..]));
            annotated
        })
        .collect()
}

/// Insertions for one step, in output order.
///
/// At equal offsets a later ingredient comes first.
fn find_insertions<'a>(ingredients: &'a [Ingredient], step: &str) -> Vec<Insertion<'a>> {
    let mut insertions: Vec<Insertion<'a>> = ingredients
        .iter()
        .rev()
        .filter(|i| !i.name.is_empty())
        .filter_map(|ingredient| {
            step.find(ingredient.name.as_str()).map(|start| Insertion {
                offset: start + ingredient.name.len(),
                ingredient,
            })
        })
        .collect();

    // Stable, so ties stay in reverse ingredient order
    insertions.sort_by_key(|insertion| insertion.offset);
    insertions
}
