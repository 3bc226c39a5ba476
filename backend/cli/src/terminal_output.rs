//! Terminal output: colored notes and recipe rendering.

use recipesnap_core::RecipeExtraction;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

/// Render a recipe as label/value pairs, one column per field.
///
/// Multi-line values are indented under their label.
pub fn render_recipe(recipe: &RecipeExtraction) -> String {
    let fields = [
        ("Name", recipe.name.as_str()),
        ("Ingredients", recipe.ingredients.as_str()),
        ("Steps", recipe.steps.as_str()),
        ("Cook Time", recipe.cook_time.as_deref().unwrap_or("-")),
        ("Servings", recipe.servings.as_deref().unwrap_or("-")),
    ];
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in fields {
        let mut lines = value.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!("  {label:<width$}  {first}\n"));
        for line in lines {
            out.push_str(&format!("  {:<width$}  {line}\n", ""));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_fields_aligned() {
        let recipe = RecipeExtraction {
            name: "Pancakes".into(),
            ingredients: "flour\nmilk".into(),
            steps: "mix; cook".into(),
            cook_time: None,
            servings: Some("4".into()),
        };
        let out = render_recipe(&recipe);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  Name         Pancakes");
        assert_eq!(lines[1], "  Ingredients  flour");
        assert_eq!(lines[2], "               milk");
        assert_eq!(lines[4], "  Cook Time    -");
        assert_eq!(lines.len(), 6);
    }
}
