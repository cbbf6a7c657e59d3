//! Wire types for the REST API.
//!
//! Field names are camelCase on the wire. Timestamps are RFC 3339 strings.

use recipebox_core::{
    Capabilities, Favorite, Ingredient, IngredientLine, Recipe, RecipeDraft, SearchOutcome,
    Session, UserProfile,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialsReq {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRes {
    pub token: String,
    pub uid: String,
    pub email_verified: bool,
}

impl From<Session> for SessionRes {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            uid: session.identity.uid,
            email_verified: session.identity.email_verified,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientRes {
    pub name: String,
    pub amount: String,
}

impl From<Ingredient> for IngredientRes {
    fn from(i: Ingredient) -> Self {
        Self {
            name: i.name,
            amount: i.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRes {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub cuisine_area: String,
    pub image_url: String,
    pub instructions: Vec<String>,
    pub ingredients: Vec<IngredientRes>,
    pub source_url: Option<String>,
    /// `custom` or `external`.
    pub origin: String,
    pub owner_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Recipe> for RecipeRes {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            category: r.category,
            cuisine_area: r.cuisine_area,
            image_url: r.image_url,
            instructions: r.instructions,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
            source_url: r.source_url,
            origin: r.origin.as_str().to_string(),
            owner_id: r.owner_id,
            created_at: r.created_at.map(|t| t.to_rfc3339()),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchRes {
    pub recipes: Vec<RecipeRes>,
    /// Records dropped because they could not be normalized.
    pub skipped: usize,
}

impl From<SearchOutcome> for SearchRes {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            recipes: outcome.recipes.into_iter().map(Into::into).collect(),
            skipped: outcome.skipped,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRes {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_favorite: bool,
}

impl From<Capabilities> for CapabilitiesRes {
    fn from(c: Capabilities) -> Self {
        Self {
            can_edit: c.can_edit,
            can_delete: c.can_delete,
            can_favorite: c.can_favorite,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailRes {
    pub recipe: RecipeRes,
    pub capabilities: CapabilitiesRes,
    pub is_favorite: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct IngredientLineReq {
    #[serde(default)]
    pub ingredient: String,
    #[serde(default)]
    pub measure: String,
}

/// Body for creating or replacing a custom recipe.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RecipeReq {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineReq>,
    /// Free text; split into steps on periods when read back.
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub source: String,
}

impl From<RecipeReq> for RecipeDraft {
    fn from(req: RecipeReq) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            area: req.area,
            image: req.image,
            ingredients: req
                .ingredients
                .into_iter()
                .map(|line| IngredientLine {
                    ingredient: line.ingredient,
                    measure: line.measure,
                })
                .collect(),
            instructions: req.instructions,
            source: req.source,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipeListRes {
    pub recipes: Vec<RecipeRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRes {
    pub recipe_id: String,
    pub recipe: RecipeRes,
    pub added_at: String,
}

impl From<Favorite> for FavoriteRes {
    fn from(f: Favorite) -> Self {
        Self {
            recipe_id: f.recipe_id,
            recipe: f.recipe_snapshot.into(),
            added_at: f.added_at.to_rfc3339(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FavoriteListRes {
    pub favorites: Vec<FavoriteRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRes {
    pub is_favorite: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRes {
    pub name: String,
    pub email: String,
    pub updated_at: Option<String>,
}

impl From<UserProfile> for ProfileRes {
    fn from(p: UserProfile) -> Self {
        Self {
            name: p.name,
            email: p.email,
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use recipebox_core::Origin;

    #[test]
    fn recipe_res_uses_camel_case_and_lowercase_origin() {
        let recipe = Recipe {
            id: "52771".into(),
            title: "Spicy Arrabiata Penne".into(),
            description: String::new(),
            category: "Vegetarian".into(),
            cuisine_area: "Italian".into(),
            image_url: "https://img.test/penne.jpg".into(),
            instructions: vec!["Boil.".into()],
            ingredients: vec![Ingredient {
                name: "penne rigate".into(),
                amount: "1 pound".into(),
            }],
            source_url: None,
            origin: Origin::External,
            owner_id: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
            updated_at: None,
        };

        let json = serde_json::to_value(RecipeRes::from(recipe)).unwrap();

        assert_eq!(json["cuisineArea"], "Italian");
        assert_eq!(json["imageUrl"], "https://img.test/penne.jpg");
        assert_eq!(json["origin"], "external");
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00+00:00");
        assert!(json["sourceUrl"].is_null());
    }

    #[test]
    fn recipe_req_fills_missing_fields_with_defaults() {
        let req: RecipeReq = serde_json::from_str(
            r#"{"title":"Scones","ingredients":[{"ingredient":"Flour"}]}"#,
        )
        .unwrap();
        let draft = RecipeDraft::from(req);

        assert_eq!(draft.title, "Scones");
        assert_eq!(draft.ingredients.len(), 1);
        assert_eq!(draft.ingredients[0].measure, "");
        assert_eq!(draft.instructions, "");
    }
}
