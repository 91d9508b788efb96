//! Cooklang document parsing.
//!
//! Supports the subset of Cooklang found in hand-written recipe trees:
//!
//! - `>> key: value` metadata lines
//! - `@ingredient`, `@multi word ingredient{amount%unit}`
//! - `#cookware` and `#multi word cookware{}`
//! - `~{amount%unit}` and `~name{amount%unit}` timers
//! - `-- line comments` and `[- block comments -]`
//!
//! Paragraphs (runs of non-empty lines) become steps. Tokens are replaced by
//! their display text, so ingredient names stay readable in the step.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Amount, Ingredient, Quantity, Recipe};

/// `@`, `#` or `~` followed by either `name{body}` or a single word.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<sigil>[@#~])(?:(?P<long>[^@#~{}\n]*?)\{(?P<body>[^{}\n]*)\}|(?P<short>[^\s@#~{}.,;:!?()]+))",
    )
    .unwrap()
});

/// A token whose opening brace is never closed on the same line.
static UNCLOSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[@#~][^@#~{}\n]*\{[^}]*$").unwrap());

static BLOCK_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[-.*?-\]").unwrap());

/// Error returned when a recipe document cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// An ingredient, cookware or timer opens `{` without closing it.
    #[error("line {line}: unclosed '{{' in token")]
    UnclosedBrace { line: usize },
    /// A `[-` block comment is never closed.
    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },
    /// A `>>` metadata line without a `key: value` pair.
    #[error("line {line}: metadata must have the form '>> key: value'")]
    InvalidMetadata { line: usize },
}

/// Parser seam between raw document text and the structured [`Recipe`].
pub trait RecipeParser: Send + Sync {
    /// Parse a complete document.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the document is malformed.
    fn parse(&self, source: &str) -> Result<Recipe, ParseError>;
}

/// Default parser for `.cook` documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct CooklangParser;

impl RecipeParser for CooklangParser {
    fn parse(&self, source: &str) -> Result<Recipe, ParseError> {
        let source = strip_block_comments(source)?;
        let mut recipe = Recipe::default();
        let mut paragraph: Vec<String> = Vec::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_line_comment(raw_line).trim();

            if let Some(entry) = line.strip_prefix(">>") {
                let (key, value) = entry
                    .split_once(':')
                    .filter(|(key, _)| !key.trim().is_empty())
                    .ok_or(ParseError::InvalidMetadata { line: line_no })?;
                recipe
                    .metadata
                    .insert(key.trim().to_owned(), value.trim().to_owned());
                flush_step(&mut paragraph, &mut recipe.steps);
                continue;
            }

            if line.is_empty() {
                // A comment-only line does not end the paragraph
                if !raw_line.trim().is_empty() {
                    continue;
                }
                flush_step(&mut paragraph, &mut recipe.steps);
                continue;
            }

            if UNCLOSED_RE.is_match(line) {
                return Err(ParseError::UnclosedBrace { line: line_no });
            }

            paragraph.push(parse_line(line, &mut recipe.ingredients));
        }
        flush_step(&mut paragraph, &mut recipe.steps);

        Ok(recipe)
    }
}

impl Recipe {
    /// Parse Cooklang text with the default [`CooklangParser`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the document is malformed.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        CooklangParser.parse(source)
    }
}

/// Remove `[- ... -]` comments, keeping their newlines so line numbers hold.
fn strip_block_comments(source: &str) -> Result<String, ParseError> {
    let stripped = BLOCK_COMMENT_RE.replace_all(source, |caps: &regex::Captures<'_>| {
        "\n".repeat(caps[0].matches('\n').count())
    });

    if let Some(start) = stripped.find("[-") {
        let line = stripped[..start].matches('\n').count() + 1;
        return Err(ParseError::UnterminatedComment { line });
    }

    Ok(stripped.into_owned())
}

fn strip_line_comment(line: &str) -> &str {
    line.find("--").map_or(line, |pos| &line[..pos])
}

/// Join the collected lines into one step and reset the buffer.
fn flush_step(paragraph: &mut Vec<String>, steps: &mut Vec<String>) {
    if !paragraph.is_empty() {
        steps.push(paragraph.join(" "));
        paragraph.clear();
    }
}

/// Replace tokens in a line with their display text, collecting ingredients.
fn parse_line(line: &str, ingredients: &mut Vec<Ingredient>) -> String {
    let mut text = String::with_capacity(line.len());
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(line) {
        let Some(token) = caps.get(0) else { continue };
        text.push_str(&line[last..token.start()]);
        last = token.end();

        let name = caps
            .name("long")
            .or_else(|| caps.name("short"))
            .map_or("", |m| m.as_str().trim());
        let quantity = caps.name("body").and_then(|b| parse_quantity(b.as_str()));

        match &caps["sigil"] {
            "@" => {
                text.push_str(name);
                if !name.is_empty() {
                    ingredients.push(Ingredient {
                        name: name.to_owned(),
                        quantity,
                    });
                }
            }
            "#" => text.push_str(name),
            _ => match quantity {
                Some(quantity) => text.push_str(&quantity.to_string()),
                None => text.push_str(name),
            },
        }
    }

    text.push_str(&line[last..]);
    text
}

/// Parse a `{amount%unit}` body. Empty bodies carry no quantity.
fn parse_quantity(body: &str) -> Option<Quantity> {
    let (amount, unit) = match body.split_once('%') {
        Some((amount, unit)) => (amount.trim(), Some(unit.trim())),
        None => (body.trim(), None),
    };
    if amount.is_empty() {
        return None;
    }
    let unit = unit.filter(|u| !u.is_empty()).map(str::to_owned);
    Some(Quantity::new(Amount::parse(amount), unit))
}
