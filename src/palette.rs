//! Wavelength color coding for contrast curves and planet points

use clap::ValueEnum;
use plotters::style::RGBColor;

// Named colors shared across the figure
pub const DODGER_BLUE: RGBColor = RGBColor(30, 144, 255);
pub const CADET_BLUE: RGBColor = RGBColor(95, 158, 160);
pub const GOLDENROD: RGBColor = RGBColor(218, 165, 32);
pub const CORAL: RGBColor = RGBColor(255, 127, 80);
pub const FIREBRICK: RGBColor = RGBColor(178, 34, 34);
pub const PURE_RED: RGBColor = RGBColor(255, 0, 0);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
pub const DARK_VIOLET: RGBColor = RGBColor(148, 0, 211);
pub const PINK: RGBColor = RGBColor(255, 192, 203);
pub const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);
pub const TAN: RGBColor = RGBColor(210, 180, 140);

/// Marker color for specific planetary systems (Solar System, Tau Ceti)
pub const PLANET_CYAN: RGBColor = RGBColor(0, 191, 191);

/// How to color curves and points by wavelength of observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// One color per bandpass
    Full,
    /// Blue optical / red optical / near IR
    #[default]
    Simple,
    /// Everything in the default curve color
    None,
}

/// Colors assigned to each observing band under a given [`ColorMode`]
#[derive(Debug, Clone)]
pub struct WavelengthPalette {
    /// V band / 550nm
    pub v: RGBColor,
    /// Broadband visible
    pub broadband_visible: RGBColor,
    /// 750nm red optical
    pub red_750: RGBColor,
    /// YJH band
    pub yjh: RGBColor,
    /// H band
    pub h: RGBColor,
    /// K band
    pub k: RGBColor,
}

impl WavelengthPalette {
    pub fn new(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Full => Self {
                v: DODGER_BLUE,
                broadband_visible: CADET_BLUE,
                red_750: GOLDENROD,
                yjh: CORAL,
                h: PURE_RED,
                k: FIREBRICK,
            },
            ColorMode::Simple => Self {
                v: DODGER_BLUE,
                broadband_visible: DODGER_BLUE,
                red_750: ORANGE,
                yjh: FIREBRICK,
                h: FIREBRICK,
                k: FIREBRICK,
            },
            ColorMode::None => Self {
                v: DARK_VIOLET,
                broadband_visible: DARK_VIOLET,
                red_750: DARK_VIOLET,
                yjh: DARK_VIOLET,
                h: DARK_VIOLET,
                k: DARK_VIOLET,
            },
        }
    }

    /// Entries for the bandpass legend, empty when color coding is off
    pub fn legend_entries(mode: ColorMode) -> Vec<(&'static str, RGBColor)> {
        match mode {
            ColorMode::Full => vec![
                ("V/550nm", DODGER_BLUE),
                ("broadband visible", CADET_BLUE),
                ("750nm", GOLDENROD),
                ("YJH-band", CORAL),
                ("H-band", PURE_RED),
                ("K-band", FIREBRICK),
            ],
            ColorMode::Simple => vec![
                ("Blue optical", DODGER_BLUE),
                ("Red optical", ORANGE),
                ("near IR", FIREBRICK),
            ],
            ColorMode::None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_mode_uses_single_color() {
        let palette = WavelengthPalette::new(ColorMode::None);
        assert_eq!(palette.v, DARK_VIOLET);
        assert_eq!(palette.k, DARK_VIOLET);
        assert!(WavelengthPalette::legend_entries(ColorMode::None).is_empty());
    }

    #[test]
    fn test_simple_mode_merges_bands() {
        let palette = WavelengthPalette::new(ColorMode::Simple);
        assert_eq!(palette.v, palette.broadband_visible);
        assert_eq!(palette.yjh, palette.h);
        assert_eq!(palette.h, palette.k);
        assert_eq!(
            WavelengthPalette::legend_entries(ColorMode::Simple).len(),
            3
        );
    }

    #[test]
    fn test_full_mode_distinguishes_bands() {
        let palette = WavelengthPalette::new(ColorMode::Full);
        assert_ne!(palette.h, palette.k);
        assert_eq!(WavelengthPalette::legend_entries(ColorMode::Full).len(), 6);
    }
}
