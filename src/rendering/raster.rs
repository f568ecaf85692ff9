//! Document parsing and scan conversion

use crate::color::Rgba;
use crate::dimensions::Canvas;
use crate::{Error, Result};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use std::path::Path;
use std::sync::{Arc, LazyLock};

// Loading system fonts is slow; share one database across conversions.
static FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Parse SVG markup. Relative references resolve against `resources_dir`.
pub fn parse_document(svg: &str, resources_dir: Option<&Path>) -> Result<Tree> {
    let opt = Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb: FONTS.clone(),
        ..Options::default()
    };
    Tree::from_str(svg, &opt).map_err(|e| Error::DocumentParse(e.to_string()))
}

/// Intrinsic document size in user units.
pub fn natural_size(tree: &Tree) -> (f64, f64) {
    let size = tree.size();
    (f64::from(size.width()), f64::from(size.height()))
}

/// Allocate a `canvas` sized pixmap, composite `background` unless it is the
/// transparent sentinel, and draw `tree` stretched to fill it.
pub fn rasterize(tree: &Tree, canvas: Canvas, background: Rgba) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(canvas.width.max(1), canvas.height.max(1)).ok_or_else(|| {
        Error::Render(format!(
            "cannot allocate a {}x{} pixel buffer",
            canvas.width, canvas.height
        ))
    })?;

    if !background.is_transparent() {
        pixmap.fill(Color::from_rgba8(background.r, background.g, background.b, 255));
    }

    let size = tree.size();
    let transform = Transform::from_scale(
        pixmap.width() as f32 / size.width(),
        pixmap.height() as f32 / size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}
