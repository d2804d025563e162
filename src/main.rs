use std::env;
use std::process::ExitCode;

use log::{debug, error};
use serde_json::json;
use tokio::io::AsyncReadExt;

use recipe_extract::{
    aggregate_ingredients, group_by_category, ImportError, ImportResult, RecipeImporter,
    RecipeSelection,
};

const USAGE: &str = "Usage:
  recipe-extract url <URL>
  recipe-extract markdown <FILE|->
  recipe-extract groceries <FILE>";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, target) = match args.as_slice() {
        [command, target] => (command.as_str(), target.as_str()),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match run(command, target).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            if let ImportError::InvalidMarkdown(inner) = &e {
                for warning in inner.warnings() {
                    eprintln!("  - {}", warning);
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &str, target: &str) -> Result<String, ImportError> {
    debug!("Running {} on {}", command, target);
    let value = match command {
        "url" => match RecipeImporter::builder().url(target).build().await? {
            ImportResult::Recipe(recipe) => serde_json::to_value(recipe)?,
            ImportResult::Markdown(import) => serde_json::to_value(import)?,
        },
        "markdown" => {
            let text = read_input(target).await?;
            match RecipeImporter::builder().markdown(text).build().await? {
                ImportResult::Markdown(import) => serde_json::to_value(import)?,
                ImportResult::Recipe(recipe) => serde_json::to_value(recipe)?,
            }
        }
        "groceries" => {
            let text = read_input(target).await?;
            let recipes: Vec<RecipeSelection> = serde_json::from_str(&text)?;
            let aggregated = aggregate_ingredients(&recipes);
            json!({
                "ingredients": aggregated,
                "groups": group_by_category(&aggregated),
            })
        }
        other => {
            return Err(ImportError::BuilderError(format!(
                "Unknown command '{}'\n{}",
                other, USAGE
            )))
        }
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Reads a file, or stdin when the path is `-`.
async fn read_input(path: &str) -> Result<String, ImportError> {
    if path == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }
    Ok(tokio::fs::read_to_string(path).await?)
}
