use std::path::PathBuf;

use anyhow::{bail, Context};
use flexora::recipe::EditRecipe;
use flexora::storage::ExportStorage;

const USAGE: &str = "usage: flexora <input-image> <recipe.json> <output-file>";

fn main() -> anyhow::Result<()> {
    flexora::logging::init();

    let args = std::env::args_os().skip(1).map(PathBuf::from).collect::<Vec<_>>();
    let [input, recipe_path, output] = args.as_slice() else {
        bail!(USAGE);
    };

    let config = flexora::config::load_app_config();
    let format = flexora::format_for_path(output)
        .with_context(|| format!("cannot export to {}", output.display()))?;
    let input_bytes =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let recipe_json = std::fs::read_to_string(recipe_path)
        .with_context(|| format!("failed to read {}", recipe_path.display()))?;
    let recipe = EditRecipe::from_json(&recipe_json)
        .with_context(|| format!("invalid recipe {}", recipe_path.display()))?;

    let encoded = flexora::process_image(&input_bytes, &recipe, format, &config)
        .with_context(|| format!("failed to edit {}", input.display()))?;

    let file_name = output
        .file_name()
        .and_then(|name| name.to_str())
        .context("output path has no file name")?;
    let output_dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let written = ExportStorage::new(output_dir).write(file_name, &encoded)?;

    tracing::info!(path = %written.display(), "done");
    Ok(())
}
