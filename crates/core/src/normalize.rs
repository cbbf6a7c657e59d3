//! Translation of raw recipe records into the canonical [`Recipe`].
//!
//! Two record shapes exist:
//!
//! - **Custom** documents from the `recipes` collection: `title`, `description`,
//!   `category`, `area`, `image`, `ingredients` (`[{ingredient, measure}]`), free-text
//!   `instructions`, `source`, `createdBy`.
//! - **External** meals from the remote API: `idMeal`, `strMeal`, `strCategory`, `strArea`,
//!   `strMealThumb`, `strSource`, `strInstructions` and the paired
//!   `strIngredient1..20` / `strMeasure1..20` slots.
//!
//! Callers wrap records in [`RawRecipe`] first, so the shape is decided once rather than by
//! probing fields at every use site.

use crate::constants::EXTERNAL_INGREDIENT_SLOTS;
use crate::error::{RecipeError, RecipeResult};
use crate::recipe::{Ingredient, IngredientLine, Origin, Recipe};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Marker field set on every custom document.
pub const CUSTOM_MARKER: &str = "isCustom";

/// A raw record tagged with its shape.
#[derive(Clone, Debug, PartialEq)]
pub enum RawRecipe {
    /// A custom document. `id` is the document id assigned by the store.
    Custom { id: Option<String>, doc: Value },
    /// A meal object from the remote API's `meals` array.
    External(Value),
}

impl RawRecipe {
    /// Tags `value` as custom or external.
    ///
    /// A truthy `isCustom` marker always wins; otherwise `hint` decides. For custom
    /// records the document id falls back to an `id` field inside the document.
    pub fn from_value(id: Option<&str>, value: Value, hint: Origin) -> Self {
        let marked_custom = value
            .get(CUSTOM_MARKER)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if marked_custom || hint == Origin::Custom {
            let id = id
                .map(str::to_owned)
                .or_else(|| value.get("id").and_then(Value::as_str).map(str::to_owned));
            RawRecipe::Custom { id, doc: value }
        } else {
            RawRecipe::External(value)
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            RawRecipe::Custom { .. } => Origin::Custom,
            RawRecipe::External(_) => Origin::External,
        }
    }
}

/// Lenient read model for custom documents; requiredness is checked in `normalize_custom`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomRecord {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    area: Option<String>,
    image: Option<String>,
    ingredients: Option<Vec<IngredientLine>>,
    instructions: Option<String>,
    source: Option<String>,
    created_by: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

/// Splits free-text instructions into steps.
///
/// Splits on every `.`, drops segments that are blank after trimming, and re-appends a
/// period to each trimmed segment. Abbreviations and decimals are split too.
pub fn split_instructions(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(|step| format!("{step}."))
        .collect()
}

/// Normalizes a single tagged record.
pub fn normalize(raw: RawRecipe) -> RecipeResult<Recipe> {
    match raw {
        RawRecipe::Custom { id, doc } => normalize_custom(id, doc),
        RawRecipe::External(value) => normalize_external(&value),
    }
}

/// Tags and normalizes in one step. See [`RawRecipe::from_value`].
pub fn normalize_value(id: Option<&str>, value: Value, hint: Origin) -> RecipeResult<Recipe> {
    normalize(RawRecipe::from_value(id, value, hint))
}

/// Normalizes a batch, skipping malformed records instead of failing the batch.
///
/// Returns the recipes in input order and the number of records skipped.
pub fn normalize_batch(records: impl IntoIterator<Item = RawRecipe>) -> (Vec<Recipe>, usize) {
    let mut recipes = Vec::new();
    let mut skipped = 0;

    for raw in records {
        let origin = raw.origin();
        match normalize(raw) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => {
                tracing::warn!(%origin, "skipping recipe record: {e}");
                skipped += 1;
            }
        }
    }

    (recipes, skipped)
}

fn normalize_custom(id: Option<String>, doc: Value) -> RecipeResult<Recipe> {
    let id = id.ok_or_else(|| RecipeError::malformed(None, "custom recipe has no id"))?;
    let record: CustomRecord = serde_json::from_value(doc)
        .map_err(|e| RecipeError::malformed(Some(&id), e.to_string()))?;

    let title = record
        .title
        .ok_or_else(|| RecipeError::malformed(Some(&id), "missing title"))?;
    let instructions = record
        .instructions
        .ok_or_else(|| RecipeError::malformed(Some(&id), "missing instructions"))?;
    let lines = record
        .ingredients
        .ok_or_else(|| RecipeError::malformed(Some(&id), "missing ingredients"))?;

    let ingredients: Vec<Ingredient> = lines
        .into_iter()
        .map(|line| Ingredient {
            name: line.ingredient,
            amount: line.measure,
        })
        .collect();
    if ingredients.is_empty() {
        return Err(RecipeError::malformed(Some(&id), "no ingredients"));
    }

    Ok(Recipe {
        id,
        title,
        description: record.description.unwrap_or_default(),
        category: record.category.unwrap_or_default(),
        cuisine_area: record.area.unwrap_or_default(),
        image_url: record.image.unwrap_or_default(),
        instructions: split_instructions(&instructions),
        ingredients,
        source_url: record.source.filter(|s| !s.trim().is_empty()),
        origin: Origin::Custom,
        owner_id: record.created_by,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// String field of an external meal; JSON `null` and non-strings read as absent.
fn field<'a>(meal: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    meal.get(key).and_then(Value::as_str)
}

fn normalize_external(value: &Value) -> RecipeResult<Recipe> {
    let meal = value
        .as_object()
        .ok_or_else(|| RecipeError::malformed(None, "meal is not an object"))?;

    let id = field(meal, "idMeal")
        .ok_or_else(|| RecipeError::malformed(None, "missing idMeal"))?
        .to_string();
    let title = field(meal, "strMeal")
        .ok_or_else(|| RecipeError::malformed(Some(&id), "missing strMeal"))?
        .to_string();
    let instructions = field(meal, "strInstructions")
        .ok_or_else(|| RecipeError::malformed(Some(&id), "missing strInstructions"))?;

    let ingredients: Vec<Ingredient> = (1..=EXTERNAL_INGREDIENT_SLOTS)
        .filter_map(|slot| {
            // trimming only decides inclusion; the stored text is the API's own
            let name = field(meal, &format!("strIngredient{slot}"))?;
            if name.trim().is_empty() {
                return None;
            }
            let amount = field(meal, &format!("strMeasure{slot}")).unwrap_or_default();
            Some(Ingredient {
                name: name.to_string(),
                amount: amount.to_string(),
            })
        })
        .collect();
    if ingredients.is_empty() {
        return Err(RecipeError::malformed(Some(&id), "no ingredients"));
    }

    let text = |key: &str| field(meal, key).unwrap_or_default().to_string();

    Ok(Recipe {
        title,
        description: String::new(),
        category: text("strCategory"),
        cuisine_area: text("strArea"),
        image_url: text("strMealThumb"),
        instructions: split_instructions(instructions),
        ingredients,
        source_url: field(meal, "strSource")
            .filter(|s| !s.trim().is_empty())
            .map(str::to_owned),
        origin: Origin::External,
        owner_id: None,
        created_at: None,
        updated_at: None,
        id,
    })
}
