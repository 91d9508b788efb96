//! Embedded page templates.

use minijinja::Environment;
use serde::Serialize;

use crate::page::Page;

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../templates/base.html")),
    ("folder.html", include_str!("../templates/folder.html")),
    ("recipe.html", include_str!("../templates/recipe.html")),
];

/// Build the template environment with all page templates loaded.
///
/// Templates ending in `.html` are auto-escaped; annotated recipe steps are
/// escaped beforehand and marked safe in the template.
pub(crate) fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Render a page with the template matching its kind.
pub(crate) fn render(env: &Environment<'_>, page: &Page) -> Result<String, minijinja::Error> {
    match page {
        Page::Folder(folder) => render_template(env, "folder.html", folder),
        Page::Recipe(recipe) => render_template(env, "recipe.html", recipe),
    }
}

fn render_template<S: Serialize>(
    env: &Environment<'_>,
    name: &str,
    context: &S,
) -> Result<String, minijinja::Error> {
    env.get_template(name)?.render(context)
}
