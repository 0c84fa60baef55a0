pub mod backend;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod recipe;
pub mod render;
pub mod state;
pub mod storage;

use std::path::Path;

pub use editor::{EditorError, EditorResult, EditorSession, SessionLimits};
pub use error::{AppError, AppResult};
pub use export::ExportFormat;
pub use render::RenderedSurface;

/// Opens `input`, replays `recipe` and returns the encoded export in `format`.
///
/// Entrypoint shared by the command-line binary and higher-level integrations.
pub fn process_image(
    input: &[u8],
    recipe: &recipe::EditRecipe,
    format: ExportFormat,
    config: &config::AppConfig,
) -> AppResult<Vec<u8>> {
    let limits = SessionLimits::from_config(&config.editor);
    let mut session = EditorSession::open(input, limits)?;
    recipe.apply(&mut session, config.text)?;

    let quality = match format {
        ExportFormat::Jpeg { .. } => config.editor.jpeg_quality,
        ExportFormat::WebP { .. } => config.editor.webp_quality,
        ExportFormat::Png | ExportFormat::Bmp => None,
    };
    let format = quality.map_or(format, |quality| format.with_quality(quality));
    Ok(session.export(format)?)
}

/// Export format implied by a file name's extension.
pub fn format_for_path(path: &Path) -> EditorResult<ExportFormat> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();
    extension.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn format_for_path_uses_extension() {
        assert_eq!(format_for_path(Path::new("out/a.PNG")).unwrap(), ExportFormat::Png);
        assert!(matches!(
            format_for_path(Path::new("out/a")),
            Err(EditorError::UnsupportedExportFormat(_))
        ));
    }

    #[test]
    fn process_image_applies_recipe_and_configured_quality() {
        let input = ExportFormat::Png
            .encode(&RgbaImage::from_pixel(64, 32, Rgba([200, 10, 10, 255])))
            .unwrap();
        let recipe = recipe::EditRecipe::from_json(
            r#"{ "steps": [ { "op": "resize", "spec": { "percentage": 50 } } ] }"#,
        )
        .unwrap();
        let mut config = config::AppConfig::default();
        config.editor.jpeg_quality = Some(60);

        let bytes = process_image(&input, &recipe, ExportFormat::Jpeg { quality: 92 }, &config)
            .expect("pipeline should succeed");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }
}
