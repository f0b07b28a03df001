use std::sync::Arc;

use once_cell::sync::Lazy;
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{self, fontdb},
};

use crate::{
    card::CardView,
    error::ExportError,
    export::{svg::CardLayout, CardExporter, ExportArtifact, EXPORT_FILE_NAME, EXPORT_MIME_TYPE},
};

/// System fonts, loaded once for every export
static FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!("Loaded {} font faces for card export", db.len());
    Arc::new(db)
});

/// Renders a card to a square PNG by rasterizing its SVG drawing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PngExporter {
    pub layout: CardLayout,
}

impl PngExporter {
    pub fn new(cell_size: u32, gap: u32, padding: u32) -> Self {
        Self {
            layout: CardLayout::new(cell_size, gap, padding),
        }
    }

    fn rasterize(&self, svg: &str, side: u32) -> Result<Vec<u8>, ExportError> {
        let options = usvg::Options {
            fontdb: Arc::clone(&FONTS),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| ExportError::Render(e.to_string()))?;

        let mut pixmap = Pixmap::new(side, side).ok_or_else(|| {
            ExportError::InvalidLayout(format!("cannot allocate a {side}x{side} image"))
        })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| ExportError::Render(e.to_string()))
    }
}

impl CardExporter for PngExporter {
    fn export(&self, view: &CardView) -> Result<ExportArtifact, ExportError> {
        let svg = self.layout.render_svg(view)?;
        let side = self.layout.image_side(view.size.get() as u32)?;
        let bytes = self.rasterize(&svg, side)?;

        tracing::debug!(
            "Rendered {}x{} card as a {}px PNG of {} bytes",
            view.size.get(),
            view.size.get(),
            side,
            bytes.len()
        );

        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE,
            bytes,
        })
    }
}
