//! Turning model output into a `RecipeExtraction`.
//!
//! The prompt asks for JSON, but models wrap it in code fences, rename keys,
//! or fall back to labelled prose ("Ingredients:", "**Steps**"). Both shapes
//! are accepted; the three required fields must be found in one of them.

use once_cell::sync::Lazy;
use recipesnap_core::{RecipeError, RecipeExtraction};
use regex::Regex;
use serde_json::{Map, Value};

/// Leading bullet or step number on a list line: `- `, `* `, `• `, `1. `, `2) `, `(3) `.
static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:[-*•·–]|\d{1,3}[.)]|\(\d{1,3}\)|step\s+\d{1,3}[.:)]?)\s+").unwrap());

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[A-Za-z]*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Ingredients,
    Steps,
    CookTime,
    Servings,
}

impl Field {
    fn is_list(self) -> bool {
        matches!(self, Field::Ingredients | Field::Steps)
    }

    /// Field for a label or JSON key, compared with case, spaces and
    /// underscores ignored.
    fn from_label(label: &str) -> Option<Field> {
        let key: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "name" | "title" | "recipe" | "recipename" | "recipetitle" | "dish" => Some(Field::Name),
            "ingredients" | "ingredient" | "ingredientlist" => Some(Field::Ingredients),
            "steps" | "step" | "instructions" | "directions" | "method" | "preparation" => {
                Some(Field::Steps)
            }
            "cooktime" | "cookingtime" | "time" | "totaltime" => Some(Field::CookTime),
            "servings" | "serving" | "serves" | "yield" | "portions" => Some(Field::Servings),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RawFields {
    name: Option<String>,
    ingredients: Option<String>,
    steps: Option<String>,
    cook_time: Option<String>,
    servings: Option<String>,
}

impl RawFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Ingredients => &mut self.ingredients,
            Field::Steps => &mut self.steps,
            Field::CookTime => &mut self.cook_time,
            Field::Servings => &mut self.servings,
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ingredients.is_none()
            && self.steps.is_none()
            && self.cook_time.is_none()
            && self.servings.is_none()
    }

    fn into_extraction(self) -> Result<RecipeExtraction, RecipeError> {
        let missing = |field: &str| RecipeError::Extraction(format!("missing required field: {field}"));
        Ok(RecipeExtraction {
            name: self.name.ok_or_else(|| missing("name"))?,
            ingredients: self.ingredients.ok_or_else(|| missing("ingredients"))?,
            steps: self.steps.ok_or_else(|| missing("steps"))?,
            cook_time: self.cook_time,
            servings: self.servings,
        })
    }
}

/// Parse a model response into recipe fields.
pub fn parse_recipe_text(text: &str) -> Result<RecipeExtraction, RecipeError> {
    let cleaned = CODE_FENCE_RE.replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(RecipeError::Extraction("model returned an empty response".into()));
    }

    if let Some(object) = json_object(cleaned) {
        return fields_from_json(&object).into_extraction();
    }

    let fields = fields_from_labels(cleaned);
    if fields.is_empty() {
        return Err(RecipeError::Extraction(
            "response contained neither JSON nor labelled recipe fields".into(),
        ));
    }
    fields.into_extraction()
}

/// The first JSON object in `text`. Anything after it is ignored.
fn json_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next()? {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

fn fields_from_json(object: &Map<String, Value>) -> RawFields {
    // Some models nest everything under a "recipe" key.
    if let Some(Value::Object(inner)) = object.get("recipe") {
        return fields_from_json(inner);
    }

    let mut fields = RawFields::default();
    for (key, value) in object {
        let Some(field) = Field::from_label(key) else {
            continue;
        };
        let slot = fields.slot(field);
        if slot.is_none() {
            *slot = json_text(value, field.is_list());
        }
    }
    fields
}

fn json_text(value: &Value, is_list: bool) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(|item| json_text(item, false))
                .map(|line| if is_list { strip_list_marker(&line) } else { line })
                .collect();
            lines.join(if is_list { "\n" } else { ", " })
        }
        Value::Object(map) => {
            // {"quantity": "2 cups", "item": "flour"} style entries.
            let parts: Vec<String> = map.values().filter_map(|v| json_text(v, false)).collect();
            parts.join(" ")
        }
        Value::Null | Value::Bool(_) => return None,
    };
    present(text)
}

fn fields_from_labels(text: &str) -> RawFields {
    let mut sections: Vec<(Field, Vec<String>)> = Vec::new();
    let mut current: Option<usize> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((field, inline)) = label_line(line) {
            let idx = match sections.iter().position(|(f, _)| *f == field) {
                Some(idx) => idx,
                None => {
                    sections.push((field, Vec::new()));
                    sections.len() - 1
                }
            };
            if let Some(value) = inline {
                sections[idx].1.push(value);
            }
            current = Some(idx);
            continue;
        }

        if let Some(idx) = current {
            let content = strip_markdown(line);
            let content = if sections[idx].0.is_list() {
                strip_list_marker(&content)
            } else {
                content
            };
            if !content.is_empty() {
                sections[idx].1.push(content);
            }
        }
    }

    let mut fields = RawFields::default();
    for (field, lines) in sections {
        let joined = lines.join(if field.is_list() { "\n" } else { " " });
        *fields.slot(field) = present(joined);
    }
    fields
}

/// Recognise `Label: value`, `**Label:** value`, `## Label` and `Label` lines.
fn label_line(line: &str) -> Option<(Field, Option<String>)> {
    let bare = line.trim_start_matches(|c: char| c == '#' || c.is_whitespace());
    let (label, rest) = match bare.find(|c: char| c == ':' || c == '：') {
        Some(pos) => {
            let sep_len = bare[pos..].chars().next().map_or(1, char::len_utf8);
            (&bare[..pos], Some(&bare[pos + sep_len..]))
        }
        None => (bare, None),
    };

    let label = strip_markdown(label);
    // Long prefixes before a colon are sentences, not labels.
    if label.is_empty() || label.split_whitespace().count() > 3 {
        return None;
    }
    let field = Field::from_label(&label)?;
    let inline = rest.map(strip_markdown).and_then(present);
    Some((field, inline))
}

fn strip_markdown(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '`')
        .trim()
        .to_string()
}

fn strip_list_marker(line: &str) -> String {
    LIST_MARKER_RE.replace(line.trim(), "").trim().to_string()
}

/// `None` for blank values and the placeholders models use for "not shown".
fn present(value: String) -> Option<String> {
    let trimmed = value.trim();
    let placeholder = ["", "null", "none", "n/a", "na", "unknown", "-", "not specified"]
        .iter()
        .any(|p| trimmed.eq_ignore_ascii_case(p));
    if placeholder {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let text = r#"{"name": "Pancakes", "ingredients": "flour, milk, eggs", "steps": "mix; cook", "cookTime": "20 min", "servings": "4"}"#;
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(
            recipe,
            RecipeExtraction {
                name: "Pancakes".into(),
                ingredients: "flour, milk, eggs".into(),
                steps: "mix; cook".into(),
                cook_time: Some("20 min".into()),
                servings: Some("4".into()),
            }
        );
    }

    #[test]
    fn parses_fenced_json_with_lists_and_aliases() {
        let text = "```json\n{\n  \"title\": \"Garlic Noodles\",\n  \"ingredients\": [\"200g noodles\", \"4 cloves garlic\"],\n  \"instructions\": [\"1. Boil noodles\", \"2. Fry garlic\"],\n  \"cook_time\": null,\n  \"servings\": 2\n}\n```";
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(recipe.name, "Garlic Noodles");
        assert_eq!(recipe.ingredients, "200g noodles\n4 cloves garlic");
        assert_eq!(recipe.steps, "Boil noodles\nFry garlic");
        assert_eq!(recipe.cook_time, None);
        assert_eq!(recipe.servings.as_deref(), Some("2"));
    }

    #[test]
    fn trailing_note_with_braces_after_json_is_ignored() {
        let text = "```json\n{\"name\":\"Pancakes\",\"ingredients\":[\"flour\",\"milk\"],\"steps\":[\"mix\",\"cook\"],\"cookTime\":\"20 min\",\"servings\":\"4\"}\n```\nNote: swap {milk} for oat milk if needed.";
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.ingredients, "flour\nmilk");
        assert_eq!(recipe.steps, "mix\ncook");
        assert_eq!(recipe.cook_time.as_deref(), Some("20 min"));
        assert_eq!(recipe.servings.as_deref(), Some("4"));
    }

    #[test]
    fn skips_braces_in_preamble_before_json() {
        let text = "Sure {here} it is: {\"name\":\"Toast\",\"ingredients\":\"bread\",\"steps\":\"toast it\"}";
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(recipe.name, "Toast");
        assert_eq!(recipe.cook_time, None);
    }

    #[test]
    fn json_missing_ingredients_is_an_extraction_error() {
        let text = r#"{"name": "Mystery", "steps": ["stir"], "cookTime": null}"#;
        let err = parse_recipe_text(text).unwrap_err();
        assert!(matches!(err, RecipeError::Extraction(ref m) if m.contains("ingredients")));
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let text = r#"{"name": "  ", "ingredients": ["a"], "steps": ["b"]}"#;
        let err = parse_recipe_text(text).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn parses_labelled_free_text() {
        let text = "Here is the recipe!\n\n\
            **Name:** Crispy Smashed Potatoes\n\
            **Cook Time:** 45 minutes\n\
            Serves: 4\n\n\
            ## Ingredients\n\
            - 1kg baby potatoes\n\
            - 3 tbsp olive oil\n\
            * Flaky salt\n\n\
            ## Instructions\n\
            1. Boil potatoes until tender.\n\
            2) Smash and drizzle with oil.\n\
            Step 3: Roast at 220C until crisp.\n";
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(recipe.name, "Crispy Smashed Potatoes");
        assert_eq!(recipe.cook_time.as_deref(), Some("45 minutes"));
        assert_eq!(recipe.servings.as_deref(), Some("4"));
        assert_eq!(recipe.ingredients, "1kg baby potatoes\n3 tbsp olive oil\nFlaky salt");
        assert_eq!(
            recipe.steps,
            "Boil potatoes until tender.\nSmash and drizzle with oil.\nRoast at 220C until crisp."
        );
    }

    #[test]
    fn ingredient_lines_with_colons_stay_in_section() {
        let text = "Title: Teriyaki Bowl\nIngredients:\nSauce: 3 tbsp soy sauce\nRice: 1 cup\nSteps: Cook rice, then glaze.";
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(recipe.ingredients, "Sauce: 3 tbsp soy sauce\nRice: 1 cup");
        assert_eq!(recipe.steps, "Cook rice, then glaze.");
        assert_eq!(recipe.cook_time, None);
    }

    #[test]
    fn labelled_text_missing_steps_fails() {
        let text = "Name: Toast\nIngredients:\n- bread";
        let err = parse_recipe_text(text).unwrap_err();
        assert!(err.to_string().contains("steps"));
    }

    #[test]
    fn unrelated_text_fails() {
        let err = parse_recipe_text("I can't see a recipe in this image.").unwrap_err();
        assert!(matches!(err, RecipeError::Extraction(_)));
        assert!(parse_recipe_text("   ").is_err());
    }

    #[test]
    fn placeholders_become_absent() {
        let text = r#"{"name": "Salad", "ingredients": "lettuce", "steps": "toss", "cookTime": "N/A", "servings": "null"}"#;
        let recipe = parse_recipe_text(text).unwrap();
        assert_eq!(recipe.cook_time, None);
        assert_eq!(recipe.servings, None);
    }
}
