use anyhow::{bail, Context, Result};
use std::{env, ops::RangeInclusive};

use crate::{
    card::{GridSize, Rgb},
    export::{CardLayout, PngExporter},
};

/// Accepted export geometry. The largest card at these limits stays inside
/// the exporter's maximum image side.
const CELL_SIZE_RANGE: RangeInclusive<u32> = 16..=400;
const GAP_RANGE: RangeInclusive<u32> = 0..=64;
const PADDING_RANGE: RangeInclusive<u32> = 0..=128;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub card: CardConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory the static frontend is served from
    pub frontend_dir: String,
}

#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Size of the card every new session starts with
    pub default_size: GridSize,
    pub default_color: Rgb,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub cell_size: u32,
    pub gap: u32,
    pub padding: u32,
}

impl Default for Config {
    fn default() -> Self {
        let layout = CardLayout::default();
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                frontend_dir: "./frontend".to_string(),
            },
            card: CardConfig {
                default_size: GridSize::default(),
                default_color: Rgb::WHITE,
            },
            export: ExportConfig {
                cell_size: layout.cell_size,
                gap: layout.gap,
                padding: layout.padding,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source, falling back to
    /// defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.server.host),
            port: lookup("PORT")
                .unwrap_or_else(|| defaults.server.port.to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_dir: lookup("FRONTEND_DIR").unwrap_or(defaults.server.frontend_dir),
        };

        let default_size: u8 = lookup("DEFAULT_GRID_SIZE")
            .unwrap_or_else(|| defaults.card.default_size.get().to_string())
            .parse()
            .context("DEFAULT_GRID_SIZE must be a number")?;

        let card = CardConfig {
            default_size: GridSize::new(default_size).context("DEFAULT_GRID_SIZE is invalid")?,
            default_color: lookup("DEFAULT_CARD_COLOR")
                .map(|color| color.parse::<Rgb>())
                .transpose()
                .context("DEFAULT_CARD_COLOR must be a color like #ffffff")?
                .unwrap_or(defaults.card.default_color),
        };

        let bounded = |key: &str, default: u32, range: RangeInclusive<u32>| -> Result<u32> {
            let value: u32 = lookup(key)
                .unwrap_or_else(|| default.to_string())
                .parse()
                .with_context(|| format!("{key} must be a number"))?;
            if !range.contains(&value) {
                bail!(
                    "{key} must be between {} and {}, got {value}",
                    range.start(),
                    range.end()
                );
            }
            Ok(value)
        };

        let export = ExportConfig {
            cell_size: bounded("EXPORT_CELL_SIZE", defaults.export.cell_size, CELL_SIZE_RANGE)?,
            gap: bounded("EXPORT_CELL_GAP", defaults.export.gap, GAP_RANGE)?,
            padding: bounded("EXPORT_PADDING", defaults.export.padding, PADDING_RANGE)?,
        };

        Ok(Config {
            server,
            card,
            export,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn exporter(&self) -> PngExporter {
        PngExporter::new(self.export.cell_size, self.export.gap, self.export.padding)
    }
}
