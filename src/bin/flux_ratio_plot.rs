//! Generate the contrast detection limit vs planet flux ratio figure

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use exocontrast::{build_figure, ColorMode, PlotConfig};
use log::info;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot imaging contrast limits against known and modeled planet flux ratios"
)]
struct Args {
    /// Directory holding the instrument and planet data files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the figure and caption are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Figure file name; .svg renders vector output, anything else a bitmap
    #[arg(long, default_value = "flux_ratio_plot.svg")]
    figure_name: String,

    /// How to color curves and points by wavelength of observation
    #[arg(long, value_enum, default_value_t = ColorMode::Simple)]
    color_by_lambda: ColorMode,

    /// Drop the DRAFT stamp for a publication-ready figure
    #[arg(long, default_value_t = false)]
    no_draft: bool,

    /// Include the speculative future-ELT performance wedge
    #[arg(long, default_value_t = false)]
    elt: bool,

    /// Include the HabEx goal contrast line
    #[arg(long, default_value_t = false)]
    habex: bool,

    /// Include Tau Ceti e/f and the Solar System planets at 10 pc
    #[arg(long, default_value_t = false)]
    special_systems: bool,

    /// Leave out the HST ACS contrast curve
    #[arg(long, default_value_t = false)]
    no_acs: bool,

    /// Leave out the HST NICMOS contrast curve
    #[arg(long, default_value_t = false)]
    no_nicmos: bool,

    /// Leave out the HST STIS contrast curve
    #[arg(long, default_value_t = false)]
    no_stis: bool,

    /// Leave out the JWST NIRCam contrast curve
    #[arg(long, default_value_t = false)]
    no_nircam: bool,

    /// Leave out the VLT SPHERE contrast curve
    #[arg(long, default_value_t = false)]
    no_sphere: bool,

    /// Leave out the Gemini GPI contrast curve
    #[arg(long, default_value_t = false)]
    no_gpi: bool,

    /// Leave out the measured H-band contrasts of directly imaged planets
    #[arg(long, default_value_t = false)]
    no_di_h: bool,

    /// Leave out the 750nm model extrapolations of directly imaged planets
    #[arg(long, default_value_t = false)]
    no_di_750: bool,

    /// Leave out the 550nm model extrapolations of directly imaged planets
    #[arg(long, default_value_t = false)]
    no_di_550: bool,

    /// Leave out the imaging technical requirement line
    #[arg(long, default_value_t = false)]
    no_btr_img: bool,

    /// Leave out the disk-to-point-source technical requirement line
    #[arg(long, default_value_t = false)]
    no_btr_disk: bool,
}

impl Args {
    fn into_config(self) -> PlotConfig {
        PlotConfig {
            include_elt: self.elt,
            include_habex: self.habex,
            include_acs: !self.no_acs,
            include_nicmos: !self.no_nicmos,
            include_stis: !self.no_stis,
            include_nircam: !self.no_nircam,
            include_sphere: !self.no_sphere,
            include_gpi: !self.no_gpi,
            include_di_h: !self.no_di_h,
            include_di_750_extrap: !self.no_di_750,
            include_di_550_extrap: !self.no_di_550,
            include_btr_img: !self.no_btr_img,
            include_btr_disk_to_img: !self.no_btr_disk,
            include_special_systems: self.special_systems,
            draft: !self.no_draft,
            color_by_lambda: self.color_by_lambda,
            data_dir: self.data_dir,
            output_dir: self.output_dir,
            figure_name: self.figure_name,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Args::parse().into_config();

    let figure = build_figure(&config).context("building figure")?;

    let figure_path = config.figure_path();
    figure
        .render(&figure_path)
        .with_context(|| format!("rendering {}", figure_path.display()))?;
    info!("wrote {}", figure_path.display());

    let caption_path = config.caption_path();
    fs::write(&caption_path, figure.caption.text())
        .with_context(|| format!("writing {}", caption_path.display()))?;
    info!("wrote {}", caption_path.display());

    println!("Figure:  {}", figure_path.display());
    println!("Caption: {}", caption_path.display());
    Ok(())
}
