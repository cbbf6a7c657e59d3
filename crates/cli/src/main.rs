use clap::{Parser, Subcommand};
use recipebox_core::{
    config::config_from_env_values, MealDbClient, MemoryStore, Recipe, SearchAggregator,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(about = "Recipebox recipe catalog CLI")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by title prefix
    Search {
        /// Title prefix (case-sensitive)
        query: String,
    },
    /// Show one recipe in full
    Show {
        /// Recipe id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = config_from_env_values(|name| std::env::var(name).ok())?;
    let meals = Arc::new(MealDbClient::from_config(&cfg)?);
    let search = SearchAggregator::new(Arc::new(MemoryStore::new()), meals);

    match cli.command {
        Commands::Search { query } => {
            let outcome = search.search(&query).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.recipes.is_empty() {
                println!("No recipes found.");
            } else {
                for recipe in &outcome.recipes {
                    println!(
                        "ID: {}, Title: {}, Category: {}, Origin: {}",
                        recipe.id, recipe.title, recipe.category, recipe.origin
                    );
                }
                if outcome.skipped > 0 {
                    println!("({} malformed records skipped)", outcome.skipped);
                }
            }
        }
        Commands::Show { id } => {
            let recipe = search.find_by_id(&id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else {
                print_recipe(&recipe);
            }
        }
    }

    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    println!("{} [{}]", recipe.title, recipe.origin);
    println!("Category: {}, Area: {}", recipe.category, recipe.cuisine_area);
    if let Some(source) = &recipe.source_url {
        println!("Source: {source}");
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        if ingredient.amount.is_empty() {
            println!("  - {}", ingredient.name);
        } else {
            println!("  - {} ({})", ingredient.name, ingredient.amount);
        }
    }

    println!("\nSteps:");
    for (n, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", n + 1, step);
    }
}
