//! Figure configuration: which data sources to draw and where to put the
//! output
//!
//! Defaults reproduce the standard figure: the HST and ground-based
//! contrast curves, the directly imaged planets with both model
//! extrapolations, and both technical requirement lines; the speculative
//! ELT wedge, the HabEx goal line and the special planetary systems stay
//! off unless asked for.

use std::path::PathBuf;

use crate::palette::ColorMode;

/// Selects the data sources and styling of the flux ratio figure
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Speculative future ELT performance wedge
    pub include_elt: bool,
    /// HabEx goal contrast line
    pub include_habex: bool,
    /// HST ACS contrast curve
    pub include_acs: bool,
    /// HST NICMOS contrast curve
    pub include_nicmos: bool,
    /// HST STIS Bar5 contrast curve
    pub include_stis: bool,
    /// JWST NIRCam contrast curve
    pub include_nircam: bool,
    /// VLT SPHERE contrast curve (IFS + IRDIS)
    pub include_sphere: bool,
    /// Gemini GPI H-band contrast curve
    pub include_gpi: bool,
    /// Measured H-band contrasts of directly imaged planets
    pub include_di_h: bool,
    /// COND/BT-Settl model extrapolations to ~750nm
    pub include_di_750_extrap: bool,
    /// COND/BT-Settl model extrapolations to ~550nm
    pub include_di_550_extrap: bool,
    /// Imaging technical requirement line
    pub include_btr_img: bool,
    /// Disk-mask technical requirement translated to point sources
    pub include_btr_disk_to_img: bool,
    /// Tau Ceti and Solar System reflected-light planets
    pub include_special_systems: bool,

    /// Stamp DRAFT and the current date on the figure
    pub draft: bool,

    /// Color code curves and points by wavelength of observation
    pub color_by_lambda: ColorMode,

    /// Directory holding the instrument and planet data files
    pub data_dir: PathBuf,

    /// Directory the figure and caption are written to
    pub output_dir: PathBuf,

    /// Figure file name; the extension picks the backend (`.svg` for
    /// vector output, anything else renders a bitmap)
    pub figure_name: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            include_elt: false,
            include_habex: false,
            include_acs: true,
            include_nicmos: true,
            include_stis: true,
            include_nircam: true,
            include_sphere: true,
            include_gpi: true,
            include_di_h: true,
            include_di_750_extrap: true,
            include_di_550_extrap: true,
            include_btr_img: true,
            include_btr_disk_to_img: true,
            include_special_systems: false,
            draft: true,
            color_by_lambda: ColorMode::Simple,
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            figure_name: "flux_ratio_plot.svg".to_string(),
        }
    }
}

impl PlotConfig {
    /// Full path of the figure artifact
    pub fn figure_path(&self) -> PathBuf {
        self.output_dir.join(&self.figure_name)
    }

    /// Full path of the auto-generated caption artifact
    pub fn caption_path(&self) -> PathBuf {
        self.output_dir.join("auto_caption.txt")
    }
}
