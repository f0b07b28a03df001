use std::fmt::Write;

use crate::{card::CardView, error::ExportError};

/// Font size as a fraction of the cell side
const FONT_RATIO: f64 = 0.14;
/// Average glyph width as a fraction of the font size, used for wrapping
const GLYPH_WIDTH_RATIO: f64 = 0.55;
const LINE_HEIGHT_EM: f64 = 1.2;

/// Largest width or height of an exported image, in pixels
pub const MAX_IMAGE_SIDE: u32 = 4096;

/// Geometry of an exported card. Every position is computed with checked
/// arithmetic and the whole image must fit in `MAX_IMAGE_SIDE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    /// Side of one cell in pixels
    pub cell_size: u32,
    /// Space between cells
    pub gap: u32,
    /// Border around the grid
    pub padding: u32,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            cell_size: 140,
            gap: 4,
            padding: 16,
        }
    }
}

impl CardLayout {
    pub fn new(cell_size: u32, gap: u32, padding: u32) -> Self {
        Self {
            cell_size,
            gap,
            padding,
        }
    }

    /// Width and height of the rendered image for an `n`×`n` card
    pub fn image_side(&self, n: u32) -> Result<u32, ExportError> {
        if self.cell_size == 0 {
            return Err(ExportError::InvalidLayout(
                "cell size must be greater than zero".to_string(),
            ));
        }

        let side = self
            .padding
            .checked_mul(2)
            .and_then(|border| {
                let cells = n.checked_mul(self.cell_size)?;
                let gaps = n.saturating_sub(1).checked_mul(self.gap)?;
                border.checked_add(cells)?.checked_add(gaps)
            })
            .filter(|side| *side <= MAX_IMAGE_SIDE)
            .ok_or_else(|| {
                ExportError::InvalidLayout(format!(
                    "a {n}x{n} card with cell size {}, gap {} and padding {} exceeds {MAX_IMAGE_SIDE}px",
                    self.cell_size, self.gap, self.padding
                ))
            })?;

        Ok(side)
    }

    /// Offset of the cell at `index` along either axis. Only valid for
    /// indices of a card whose `image_side` succeeded.
    fn cell_offset(&self, index: usize) -> Option<u32> {
        let index = u32::try_from(index).ok()?;
        let stride = self.cell_size.checked_add(self.gap)?;
        self.padding.checked_add(index.checked_mul(stride)?)
    }

    /// Draw the card as a square SVG document with wrapped, escaped cell text
    pub fn render_svg(&self, view: &CardView) -> Result<String, ExportError> {
        view.validate()
            .map_err(|e| ExportError::InvalidLayout(e.to_string()))?;

        let n = view.size.get() as u32;
        let side = self.image_side(n)?;
        let background = view.color.to_hex();
        let ink = view.color.contrasting_text().to_hex();
        let font_size = self.cell_size as f64 * FONT_RATIO;
        let max_chars = ((self.cell_size as f64 * 0.9) / (font_size * GLYPH_WIDTH_RATIO))
            .floor()
            .max(1.0) as usize;

        let mut svg = String::new();
        let fmt_err = |e: std::fmt::Error| ExportError::Render(e.to_string());

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{side}" height="{side}" viewBox="0 0 {side} {side}">"#
        )
        .map_err(fmt_err)?;
        writeln!(
            svg,
            r#"  <rect x="0" y="0" width="{side}" height="{side}" rx="8" fill="{background}"/>"#
        )
        .map_err(fmt_err)?;
        writeln!(
            svg,
            r#"  <g font-family="sans-serif" font-size="{font_size:.1}" fill="{ink}" text-anchor="middle" dominant-baseline="central">"#
        )
        .map_err(fmt_err)?;

        for (r, row) in view.rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                let (x, y) = self
                    .cell_offset(c)
                    .zip(self.cell_offset(r))
                    .ok_or_else(|| {
                        ExportError::InvalidLayout(format!("cell ({r}, {c}) does not fit"))
                    })?;
                writeln!(
                    svg,
                    r#"    <rect class="cell" x="{x}" y="{y}" width="{size}" height="{size}" fill="{background}" stroke="{ink}" stroke-opacity="0.35"/>"#,
                    size = self.cell_size
                )
                .map_err(fmt_err)?;

                let lines = wrap_text(text, max_chars);
                if lines.is_empty() {
                    continue;
                }

                let cx = x as f64 + self.cell_size as f64 / 2.0;
                let cy = y as f64 + self.cell_size as f64 / 2.0;
                let first_dy = -((lines.len() - 1) as f64) * LINE_HEIGHT_EM / 2.0;
                write!(svg, r#"    <text x="{cx:.1}" y="{cy:.1}">"#).map_err(fmt_err)?;
                for (i, line) in lines.iter().enumerate() {
                    let dy = if i == 0 { first_dy } else { LINE_HEIGHT_EM };
                    write!(
                        svg,
                        r#"<tspan x="{cx:.1}" dy="{dy:.2}em">{}</tspan>"#,
                        html_escape::encode_text(line)
                    )
                    .map_err(fmt_err)?;
                }
                writeln!(svg, "</text>").map_err(fmt_err)?;
            }
        }

        writeln!(svg, "  </g>").map_err(fmt_err)?;
        writeln!(svg, "</svg>").map_err(fmt_err)?;
        Ok(svg)
    }
}

/// Break cell text into display lines: explicit newlines first, then greedy
/// word wrapping at `max_chars`. Blank lines are dropped.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
