pub mod png;
pub mod svg;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::{card::CardView, error::ExportError};

pub use png::PngExporter;
pub use svg::CardLayout;

/// File name every exported card is downloaded as
pub const EXPORT_FILE_NAME: &str = "bingo-card.png";
pub const EXPORT_MIME_TYPE: &str = "image/png";

/// An image file ready to hand to the browser for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// Turns the renderable card state into an image file
pub trait CardExporter: Send + Sync {
    fn export(&self, view: &CardView) -> Result<ExportArtifact, ExportError>;
}
