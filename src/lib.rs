//! Exoplanet imaging contrast figure generation
//!
//! This crate builds a log-log figure of coronagraph contrast detection
//! limits against the flux ratios of known and modeled planets, together
//! with an auto-generated caption listing the plotted data sources.

pub mod caption;
pub mod config;
pub mod figure;
pub mod palette;
pub mod photometry;
pub mod sources;
pub mod table;

// Re-exports for easier access
pub use caption::Caption;
pub use config::PlotConfig;
pub use figure::{FigureError, FluxRatioFigure};
pub use palette::{ColorMode, WavelengthPalette};
pub use photometry::{
    contrast_from_delta_mag, delta_mag_from_contrast, lambert_phase_function,
    projected_separation_arcsec, ReflectedLightPlanet,
};
pub use sources::build_figure;
pub use table::{Table, TableError};
