//! Flag-gated data sources of the flux ratio figure
//!
//! Each builder loads its data file (if it has one), derives the plotted
//! series, places the text labels, and contributes its caption fragment.
//! [`build_figure`] walks the enabled sources in plot order.

use std::path::Path;

use plotters::style::colors::BLACK;

use crate::caption::Caption;
use crate::config::PlotConfig;
use crate::figure::{
    Annotation, BandSpec, FluxRatioFigure, HAlign, LineSpec, Marker, ScatterSpec, VAlign,
    CURVE_WIDTH, LABEL_FONT, X_RANGE, Y_RANGE,
};
use crate::palette::{ColorMode, WavelengthPalette, LIGHT_GRAY, PINK, PLANET_CYAN, PURE_RED};
use crate::photometry::{
    contrast_from_delta_mag, projected_separation_arcsec, ReflectedLightPlanet,
    JUPITER_RADIUS_EARTH_RADII,
};
use crate::table::{Table, TableError};

const NIRCAM_FILE: &str = "jwst_nircam.txt";
const NICMOS_FILE: &str = "HST_NICMOS_Min.txt";
const STIS_FILE: &str = "HST_STIS.txt";
const ACS_FILE: &str = "HST_ACS.txt";
const SPHERE_FILE: &str = "SPHERE_Vigan.txt";
const GPI_FILE: &str = "GPIES_T-type_contrast_curve_2per.txt";
const CGI_EXOPLANET_FILE: &str = "exoplanet_mode.csv";
const CGI_DISK_FILE: &str = "disk_mode.csv";
const DI_PLANETS_FILE: &str = "DIplanets.txt";
const RV_PLANETS_FILE: &str = "reflected_light_table.txt";

/// Separation column shared by the whitespace-delimited instrument files
const RHO_COLUMN: &str = "Rho(as)";

/// Both technical requirement lines sit at half the 5e-8 requirement
const BTR_CONTRAST: f64 = 0.5 * 5e-8;

/// Assemble the figure and caption for the given configuration
pub fn build_figure(config: &PlotConfig) -> Result<FluxRatioFigure, TableError> {
    let palette = WavelengthPalette::new(config.color_by_lambda);
    let color_coded = config.color_by_lambda != ColorMode::None;

    let mut figure = FluxRatioFigure::new(Caption::new(color_coded));
    figure.draft = config.draft;
    figure.bandpass_legend = WavelengthPalette::legend_entries(config.color_by_lambda);

    figure.annotations.push(
        Annotation::new(
            " Contrast curves are 5σ post-processed detection limits.",
            (X_RANGE.0, Y_RANGE.0 * 1.1),
            BLACK,
        )
        .align(HAlign::Left, VAlign::Bottom)
        .font_size(LABEL_FONT - 2),
    );

    let data_dir = config.data_dir.as_path();

    if config.include_elt {
        add_elt(&mut figure);
    }
    if config.include_habex {
        add_habex(&mut figure, &palette);
    }
    if config.include_nircam {
        add_nircam(&mut figure, data_dir, &palette, config.include_sphere)?;
    }
    if config.include_nicmos {
        add_nicmos(&mut figure, data_dir, &palette)?;
    }
    if config.include_stis {
        add_stis(&mut figure, data_dir, &palette)?;
    }
    if config.include_acs {
        add_acs(&mut figure, data_dir, &palette)?;
    }
    if config.include_sphere {
        add_sphere(&mut figure, data_dir, &palette)?;
    }
    if config.include_gpi {
        add_gpi(&mut figure, data_dir, &palette)?;
    }

    add_wfirst_cgi(&mut figure, data_dir, &palette)?;

    if config.include_btr_img {
        add_btr_imaging(&mut figure, &palette);
    }
    if config.include_btr_disk_to_img {
        add_btr_disk_to_imaging(&mut figure, &palette);
    }

    add_directly_imaged(&mut figure, data_dir, &palette, config)?;

    if config.include_special_systems {
        add_special_systems(&mut figure);
    }

    add_rv_planets(&mut figure, data_dir)?;

    Ok(figure)
}

/// Speculative performance wedge for future extremely large telescopes
fn add_elt(figure: &mut FluxRatioFigure) {
    let range_x = [0.03, 1.0];
    let pessimistic = vec![(range_x[0], 1e-5), (range_x[1], 1e-8)];
    let optimistic = vec![(range_x[0], 1e-8), (range_x[1], 1e-9)];

    figure.bands.push(BandSpec {
        upper: pessimistic.clone(),
        lower: optimistic.clone(),
        color: PINK,
        alpha: 0.2,
    });
    figure.curves.push(LineSpec::new(pessimistic, PINK).dashed());
    figure
        .curves
        .push(LineSpec::new(optimistic, PINK).dashed().width(1));
    figure.annotations.push(
        Annotation::new("Future ELTs (NIR)?", (0.1, 2.5e-7), PURE_RED)
            .align(HAlign::Left, VAlign::Top),
    );
}

fn add_habex(figure: &mut FluxRatioFigure, palette: &WavelengthPalette) {
    figure.curves.push(
        LineSpec::new(vec![(0.06, 5e-11), (1.6, 5e-11)], palette.broadband_visible).dashed(),
    );
    figure.annotations.push(
        Annotation::new("HabEx goal", (1.6, 6e-11), palette.broadband_visible)
            .align(HAlign::Right, VAlign::Bottom),
    );
    figure.caption.push_fragment(
        "HabEx: Goal 5-sigma post-processed contrast.  \
         IWA ~ 2.5 lambda/D @ 450nm; OWA ~ 32 l/D @ 1micron \
         (source: B. Mennesson, personal communication)",
    );
}

fn add_nircam(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
    sphere_included: bool,
) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(NIRCAM_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let contrast = table.column("210_contr")?;

    figure
        .curves
        .push(LineSpec::new(zip_points(&rho, &contrast), palette.k).dashed());

    if sphere_included {
        // SPHERE occupies the label position, so point at the curve instead
        figure
            .annotations
            .push(Annotation::new("JWST NIRCam", (1.6, 5e-7), palette.k));
        figure
            .underlays
            .push(LineSpec::new(vec![(1.45, 3e-7), (1.6, 4e-7)], BLACK).width(1));
    } else {
        figure
            .annotations
            .push(Annotation::new("JWST NIRCam", (2.0, 1e-7), palette.k));
    }

    figure.caption.push_from_table(&table);
    Ok(())
}

fn add_nicmos(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(NICMOS_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let contrast = table.column("F160W_contr")?;

    let label_x = rho.iter().cloned().fold(f64::NEG_INFINITY, f64::max) * 1.1;
    figure
        .curves
        .push(LineSpec::new(zip_points(&rho, &contrast), palette.h));
    figure.annotations.push(
        Annotation::new("HST NICMOS", (label_x, 3.5e-6), palette.h)
            .align(HAlign::Right, VAlign::Center),
    );

    figure.caption.push_from_table(&table);
    Ok(())
}

fn add_stis(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(STIS_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let contrast = table.column("KLIP_Contr")?;

    figure
        .curves
        .push(LineSpec::new(zip_points(&rho, &contrast), palette.broadband_visible));
    figure
        .annotations
        .push(Annotation::new("HST STIS", (0.2, 5e-5), palette.broadband_visible));

    figure.caption.push_from_table(&table);
    Ok(())
}

fn add_acs(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(ACS_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let contrast = table.column("F606W_contr")?;

    figure
        .curves
        .push(LineSpec::new(zip_points(&rho, &contrast), palette.v));
    figure.annotations.push(
        Annotation::new("HST ACS", (3.8, 6e-9), palette.v).align(HAlign::Right, VAlign::Center),
    );

    figure.caption.push_from_table(&table);
    Ok(())
}

/// SPHERE stores magnitude differences; split at 0.7" into the IFS and
/// IRDIS arms per the survey documentation
fn add_sphere(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(SPHERE_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let delta = table.column("delta")?;

    let ifs: Vec<(f64, f64)> = rho
        .iter()
        .zip(&delta)
        .filter(|(r, _)| **r <= 0.7)
        .map(|(&r, &d)| (r, contrast_from_delta_mag(d)))
        .collect();
    let irdis: Vec<(f64, f64)> = rho
        .iter()
        .zip(&delta)
        .filter(|(r, _)| **r >= 0.7)
        .map(|(&r, &d)| (r, contrast_from_delta_mag(d)))
        .collect();

    figure.curves.push(LineSpec::new(ifs, palette.yjh));
    figure.curves.push(LineSpec::new(irdis, palette.k));

    figure.annotations.push(
        Annotation::new("VLT SPHERE", (0.2, 1e-6), palette.k).align(HAlign::Right, VAlign::Center),
    );
    figure.annotations.push(
        Annotation::new("IFS /", (0.14, 5e-7), palette.yjh).align(HAlign::Right, VAlign::Center),
    );
    figure
        .annotations
        .push(Annotation::new(" IRDIS", (0.14, 5e-7), palette.k));

    figure.caption.push_from_table(&table);
    Ok(())
}

fn add_gpi(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(GPI_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let contrast = table.column("H_contr")?;

    figure
        .curves
        .push(LineSpec::new(zip_points(&rho, &contrast), palette.h));
    figure
        .annotations
        .push(Annotation::new("Gemini GPI", (0.17, 1e-5), palette.h));

    figure.caption.push_from_table(&table);
    Ok(())
}

/// WFIRST coronagraph requirement curves, always drawn
fn add_wfirst_cgi(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
) -> Result<(), TableError> {
    let exoplanet = Table::from_path(&data_dir.join(CGI_EXOPLANET_FILE))?;
    let disk = Table::from_path(&data_dir.join(CGI_DISK_FILE))?;

    let exoplanet_points = zip_points(&exoplanet.column_by_index(1)?, &exoplanet.column_by_index(2)?);
    let disk_points = zip_points(&disk.column_by_index(1)?, &disk.column_by_index(2)?);

    figure
        .curves
        .push(LineSpec::new(exoplanet_points, palette.v).width(CURVE_WIDTH + 2));
    figure
        .curves
        .push(LineSpec::new(disk_points, palette.red_750).width(CURVE_WIDTH + 2));

    figure.caption.push_fragment(
        "WFIRST contrast curves are pre-WEITR L3 requirements for 5-sigma, \
         post-processed contrast.",
    );
    figure.annotations.push(
        Annotation::new("WFIRST CGI", (1.3, 2e-9), BLACK)
            .font_size(LABEL_FONT + 1)
            .bold(),
    );
    Ok(())
}

fn add_btr_imaging(figure: &mut FluxRatioFigure, palette: &WavelengthPalette) {
    figure.curves.push(
        LineSpec::new(vec![(0.23, BTR_CONTRAST), (0.4, BTR_CONTRAST)], palette.v)
            .width(CURVE_WIDTH + 5),
    );
    figure.annotations.push(
        Annotation::new("BTR1 ", (0.23, BTR_CONTRAST), palette.v)
            .align(HAlign::Right, VAlign::Center)
            .font_size(LABEL_FONT + 1)
            .bold(),
    );
    figure.caption.push_fragment("BTR1: imaging BTR.");
}

fn add_btr_disk_to_imaging(figure: &mut FluxRatioFigure, palette: &WavelengthPalette) {
    figure.curves.push(
        LineSpec::new(
            vec![(0.25, BTR_CONTRAST), (0.95, BTR_CONTRAST)],
            palette.red_750,
        )
        .dashed()
        .width(CURVE_WIDTH + 2),
    );
    figure.annotations.push(
        Annotation::new(" BTR3", (0.95, BTR_CONTRAST), palette.red_750)
            .font_size(LABEL_FONT + 1)
            .bold(),
    );
    figure.caption.push_fragment(
        "BTR3: extended object sensitivity BTR translate to point source sensitivity.",
    );
}

/// Self-luminous directly imaged planets: measured H-band contrasts plus
/// COND/BT-Settl model extrapolations to the optical
fn add_directly_imaged(
    figure: &mut FluxRatioFigure,
    data_dir: &Path,
    palette: &WavelengthPalette,
    config: &PlotConfig,
) -> Result<(), TableError> {
    if !(config.include_di_h || config.include_di_750_extrap || config.include_di_550_extrap) {
        return Ok(());
    }

    let table = Table::from_path(&data_dir.join(DI_PLANETS_FILE))?;
    let rho = table.column(RHO_COLUMN)?;
    let contrast_547: Vec<f64> = to_contrasts(&table.column("547m_delta")?);
    let contrast_763: Vec<f64> = to_contrasts(&table.column("763m_delta")?);
    let contrast_h: Vec<f64> = to_contrasts(&table.column("H_delta")?);
    let alpha = 0.7;

    figure.caption.push_from_table(&table);

    if config.include_di_h {
        figure.scatters.push(
            ScatterSpec::new(zip_points(&rho, &contrast_h), palette.h, Marker::Square)
                .size(4)
                .outlined()
                .alpha(alpha)
                .legend("DI, 1.6 μm"),
        );
    }

    if config.include_di_750_extrap {
        if !config.include_di_550_extrap {
            push_vertical_connectors(figure, &rho, &contrast_763, &contrast_h);
        }
        figure.scatters.push(
            ScatterSpec::new(zip_points(&rho, &contrast_763), palette.red_750, Marker::Diamond)
                .size(6)
                .outlined()
                .alpha(alpha)
                .legend("DI, 750nm pred."),
        );
    }

    if config.include_di_550_extrap {
        push_vertical_connectors(figure, &rho, &contrast_547, &contrast_h);
        figure.scatters.push(
            ScatterSpec::new(zip_points(&rho, &contrast_547), palette.v, Marker::Circle)
                .size(6)
                .outlined()
                .alpha(alpha)
                .legend("DI, 550nm pred."),
        );
    }

    Ok(())
}

/// Dotted line per planet from its model extrapolation up to the
/// measured H-band point
fn push_vertical_connectors(
    figure: &mut FluxRatioFigure,
    rho: &[f64],
    from: &[f64],
    to: &[f64],
) {
    for ((&r, &lower), &upper) in rho.iter().zip(from).zip(to) {
        figure.underlays.push(
            LineSpec::new(vec![(r, lower), (r, upper)], LIGHT_GRAY)
                .dotted()
                .width(1),
        );
    }
}

/// Tau Ceti e and f plus Earth and Jupiter at 10 pc, all reflected light
/// at quadrature
fn add_special_systems(figure: &mut FluxRatioFigure) {
    let tau_ceti_distance_pc = 3.65;
    let albedo = 0.35;
    // radius = (M/Me)^(1/3) * Re for 3.9 Earth-mass planets
    let radius = 3.9f64.powf(1.0 / 3.0);

    let tau_ceti_f = ReflectedLightPlanet::at_quadrature(1.334, radius, albedo);
    let tau_ceti_e = ReflectedLightPlanet::at_quadrature(0.538, radius, albedo);

    for (planet, name, h_align) in [
        (&tau_ceti_f, "  Tau Ceti f", HAlign::Left),
        (&tau_ceti_e, "Tau Ceti e  ", HAlign::Right),
    ] {
        let rho = projected_separation_arcsec(planet.sma_au, tau_ceti_distance_pc);
        let flux_ratio = planet.flux_ratio();
        figure.scatters.push(
            ScatterSpec::new(vec![(rho, flux_ratio)], PLANET_CYAN, Marker::TriangleUp)
                .size(6)
                .outlined(),
        );
        figure.annotations.push(
            Annotation::new(name, (rho, flux_ratio), PLANET_CYAN)
                .align(h_align, VAlign::Center),
        );
    }
    figure.caption.push_fragment(&format!(
        "Tau Ceti e&f. At quadrature, albedo = {albedo}, \
         radius = (M/Me)^(1/3) * Re, circular orbits."
    ));

    // Earth and Jupiter as seen from 10 pc
    let earth_ratio = ReflectedLightPlanet::at_quadrature(1.0, 1.0, 0.367).flux_ratio();
    let jupiter_ratio =
        ReflectedLightPlanet::at_quadrature(5.0, JUPITER_RADIUS_EARTH_RADII, 0.52).flux_ratio();

    figure.scatters.push(
        ScatterSpec::new(vec![(0.1, earth_ratio)], PLANET_CYAN, Marker::Circle)
            .size(6)
            .outlined(),
    );
    figure
        .annotations
        .push(Annotation::new("  Earth ", (0.1, earth_ratio), PLANET_CYAN));

    figure.scatters.push(
        ScatterSpec::new(vec![(0.5, jupiter_ratio)], PLANET_CYAN, Marker::TriangleDown)
            .size(6)
            .outlined(),
    );
    figure
        .annotations
        .push(Annotation::new("  Jupiter ", (0.5, jupiter_ratio), PLANET_CYAN));

    figure.caption.push_fragment(
        "Earth & Jupiter at quadrature as seen from 10 pc. \
         Albedos of 0.367 and 0.52, respectively. (Traub & Oppenheimer, \
         Direct Imaging chapter of Seager Exoplanets textbook, Table 3)",
    );

    figure.annotations.push(
        Annotation::new(
            "Solar System as seen from 10pc. ",
            (X_RANGE.1, Y_RANGE.0 * 1.1),
            BLACK,
        )
        .align(HAlign::Right, VAlign::Bottom)
        .font_size(LABEL_FONT - 2),
    );
}

/// Known radial velocity planets in reflected light, always drawn
fn add_rv_planets(figure: &mut FluxRatioFigure, data_dir: &Path) -> Result<(), TableError> {
    let table = Table::from_path(&data_dir.join(RV_PLANETS_FILE))?;
    let methods = table.text_column("pl_discmethod")?.to_vec();
    let sma = table.column("sma_arcsec")?;
    let flux_ratio = table.column("Fp/F*_quad")?;

    // Whitespace-delimited file, so multi-word methods are stored with
    // underscores
    let points: Vec<(f64, f64)> = methods
        .iter()
        .zip(sma.iter().zip(&flux_ratio))
        .filter(|(method, _)| method.replace('_', " ") == "Radial Velocity")
        .map(|(_, (&x, &y))| (x, y))
        .collect();

    figure.scatters.push(
        ScatterSpec::new(points, BLACK, Marker::TriangleUp)
            .size(6)
            .legend("RV, reflected light"),
    );

    figure.caption.push_from_table(&table);
    Ok(())
}

fn zip_points(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter().zip(y).map(|(&x, &y)| (x, y)).collect()
}

fn to_contrasts(deltas: &[f64]) -> Vec<f64> {
    deltas.iter().map(|&d| contrast_from_delta_mag(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    /// Minimal data directory covering every source
    fn fixture_data_dir() -> TempDir {
        let dir = tempfile::tempdir().expect("create fixture dir");
        let files: &[(&str, &str)] = &[
            (
                NIRCAM_FILE,
                "#short caption: JWST NIRCam 210R mask contrast.\n\
                 Rho(as) 210_contr\n0.6 1.0e-5\n1.5 3.0e-7\n4.0 6.0e-8\n",
            ),
            (
                NICMOS_FILE,
                "#short caption: HST NICMOS F160W minimum curve.\n\
                 Rho(as) F160W_contr\n0.3 1.0e-4\n1.0 9.0e-6\n2.0 3.0e-6\n",
            ),
            (
                STIS_FILE,
                "#short caption: HST STIS Bar5 KLIP contrast.\n\
                 Rho(as) KLIP_Contr\n0.2 8.0e-5\n0.6 4.0e-6\n1.2 6.0e-7\n",
            ),
            (
                ACS_FILE,
                "#short caption: HST ACS F606W coronagraph contrast.\n\
                 Rho(as) F606W_contr\n0.5 2.0e-6\n2.0 6.0e-8\n4.0 8.0e-9\n",
            ),
            (
                SPHERE_FILE,
                "#short caption: VLT SPHERE IFS and IRDIS limits.\n\
                 Rho(as) delta\n0.2 11.5\n0.5 13.0\n0.7 14.5\n1.5 16.0\n",
            ),
            (
                GPI_FILE,
                "#short caption: GPIES T-type 2 percent contrast curve.\n\
                 Rho(as) H_contr\n0.25 4.0e-5\n0.6 8.0e-6\n1.1 4.0e-6\n",
            ),
            (
                CGI_EXOPLANET_FILE,
                "0,0.15,1.0e-8\n1,0.4,5.0e-10\n2,0.9,8.0e-10\n",
            ),
            (CGI_DISK_FILE, "0,0.3,2.0e-8\n1,0.9,2.0e-9\n2,1.8,4.0e-9\n"),
            (
                DI_PLANETS_FILE,
                "#short caption: Directly imaged planets with model extrapolations.\n\
                 Rho(as) 547m_delta 763m_delta H_delta\n\
                 0.5 17.5 15.0 10.0\n1.7 20.0 17.5 11.3\n",
            ),
            (
                RV_PLANETS_FILE,
                "#short caption: RV planets, reflected light at quadrature.\n\
                 pl_name pl_discmethod sma_arcsec Fp/F*_quad\n\
                 47UMab Radial_Velocity 0.44 1.1e-9\n\
                 51Erib Imaging 0.45 2.0e-6\n\
                 ups_And_d Radial_Velocity 0.19 2.2e-10\n",
            ),
        ];
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).expect("write fixture");
        }
        dir
    }

    fn config_for(dir: &TempDir) -> PlotConfig {
        PlotConfig {
            data_dir: dir.path().to_path_buf(),
            ..PlotConfig::default()
        }
    }

    fn annotation_texts(figure: &FluxRatioFigure) -> Vec<&str> {
        figure.annotations.iter().map(|a| a.text.as_str()).collect()
    }

    #[test]
    fn test_default_figure_content() {
        let dir = fixture_data_dir();
        let figure = build_figure(&config_for(&dir)).unwrap();

        // NIRCam, NICMOS, STIS, ACS, SPHERE x2, GPI, CGI x2, BTR x2
        assert_eq!(figure.curves.len(), 11);
        // DI H + 750 + 550, RV
        assert_eq!(figure.scatters.len(), 4);
        // 550nm connectors, one per planet, plus the NIRCam callout
        assert_eq!(figure.underlays.len(), 3);
        assert!(figure.bands.is_empty());
        assert!(figure.draft);

        let texts = annotation_texts(&figure);
        for label in ["JWST NIRCam", "HST NICMOS", "HST STIS", "HST ACS", "VLT SPHERE",
            "Gemini GPI", "WFIRST CGI", "BTR1 ", " BTR3"]
        {
            assert!(texts.contains(&label), "missing label {label}");
        }

        let caption = figure.caption.text();
        assert!(caption.contains("-- JWST NIRCam 210R mask contrast."));
        assert!(caption.contains("-- RV planets, reflected light at quadrature."));
        assert!(caption.contains("color coded by wavelength"));
    }

    #[test]
    fn test_toggling_acs_removes_only_acs() {
        let dir = fixture_data_dir();
        let with_acs = build_figure(&config_for(&dir)).unwrap();

        let mut config = config_for(&dir);
        config.include_acs = false;
        let without_acs = build_figure(&config).unwrap();

        assert_eq!(without_acs.curves.len(), with_acs.curves.len() - 1);
        assert_eq!(without_acs.scatters.len(), with_acs.scatters.len());
        assert_eq!(
            without_acs.caption.fragment_count(),
            with_acs.caption.fragment_count() - 1
        );
        assert!(!without_acs.caption.mentions("ACS F606W"));
        assert!(without_acs.caption.mentions("NICMOS"));
        assert!(!annotation_texts(&without_acs).contains(&"HST ACS"));
        assert!(annotation_texts(&without_acs).contains(&"HST STIS"));
    }

    #[test]
    fn test_sphere_split_at_boundary() {
        let dir = fixture_data_dir();
        let mut figure = FluxRatioFigure::new(Caption::new(false));
        let palette = WavelengthPalette::new(ColorMode::Simple);
        add_sphere(&mut figure, dir.path(), &palette).unwrap();

        assert_eq!(figure.curves.len(), 2);
        let ifs = &figure.curves[0];
        let irdis = &figure.curves[1];
        assert!(ifs.points.iter().all(|&(x, _)| x <= 0.7));
        assert!(irdis.points.iter().all(|&(x, _)| x >= 0.7));
        // The 0.7" sample belongs to both arms so the curves join
        assert!(ifs.points.iter().any(|&(x, _)| x == 0.7));
        assert!(irdis.points.iter().any(|&(x, _)| x == 0.7));
    }

    #[test]
    fn test_sphere_deltas_become_contrasts() {
        let dir = fixture_data_dir();
        let mut figure = FluxRatioFigure::new(Caption::new(false));
        let palette = WavelengthPalette::new(ColorMode::Simple);
        add_sphere(&mut figure, dir.path(), &palette).unwrap();

        let (_, contrast) = figure.curves[0].points[0];
        assert!((contrast - contrast_from_delta_mag(11.5)).abs() < 1e-12);
    }

    #[test]
    fn test_nircam_label_moves_when_sphere_absent() {
        let dir = fixture_data_dir();

        let with_sphere = build_figure(&config_for(&dir)).unwrap();
        let nircam = with_sphere
            .annotations
            .iter()
            .find(|a| a.text == "JWST NIRCam")
            .unwrap();
        assert_eq!(nircam.at, (1.6, 5e-7));

        let mut config = config_for(&dir);
        config.include_sphere = false;
        let without_sphere = build_figure(&config).unwrap();
        let nircam = without_sphere
            .annotations
            .iter()
            .find(|a| a.text == "JWST NIRCam")
            .unwrap();
        assert_eq!(nircam.at, (2.0, 1e-7));
        // The callout line went away with SPHERE; 550nm connectors remain
        assert_eq!(without_sphere.underlays.len(), 2);
    }

    #[test]
    fn test_di_connectors_follow_bluest_extrapolation() {
        let dir = fixture_data_dir();

        // Both extrapolations: connectors reach from 547nm up to H
        let figure = build_figure(&config_for(&dir)).unwrap();
        let connector = figure
            .underlays
            .iter()
            .find(|u| u.points[0].0 == u.points[1].0)
            .unwrap();
        let (_, lower) = connector.points[0];
        assert!((lower - contrast_from_delta_mag(17.5)).abs() < 1e-12);

        // 750nm only: connectors start at the 763nm point instead
        let mut config = config_for(&dir);
        config.include_di_550_extrap = false;
        let figure = build_figure(&config).unwrap();
        let connector = figure
            .underlays
            .iter()
            .find(|u| u.points[0].0 == u.points[1].0)
            .unwrap();
        let (_, lower) = connector.points[0];
        assert!((lower - contrast_from_delta_mag(15.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rv_planets_filtered_by_discovery_method() {
        let dir = fixture_data_dir();
        let figure = build_figure(&config_for(&dir)).unwrap();

        let rv = figure
            .scatters
            .iter()
            .find(|s| s.legend.as_deref() == Some("RV, reflected light"))
            .unwrap();
        // Fixture has two RV rows and one imaging row
        assert_eq!(rv.points.len(), 2);
        assert!(rv.points.iter().any(|&(x, _)| x == 0.44));
        assert!(!rv.points.iter().any(|&(x, _)| x == 0.45));
    }

    #[test]
    fn test_special_systems_off_by_default() {
        let dir = fixture_data_dir();
        let figure = build_figure(&config_for(&dir)).unwrap();
        assert!(!figure.caption.mentions("Tau Ceti"));

        let mut config = config_for(&dir);
        config.include_special_systems = true;
        let figure = build_figure(&config).unwrap();
        assert!(figure.caption.mentions("Tau Ceti e&f"));
        assert!(figure.caption.mentions("Earth & Jupiter"));
        // Tau Ceti e/f, Earth, Jupiter
        assert_eq!(figure.scatters.len(), 4 + 4);
    }

    #[test]
    fn test_color_mode_none_drops_bandpass_legend_and_note() {
        let dir = fixture_data_dir();
        let mut config = config_for(&dir);
        config.color_by_lambda = ColorMode::None;
        let figure = build_figure(&config).unwrap();

        assert!(figure.bandpass_legend.is_empty());
        assert!(!figure.caption.mentions("color coded"));
    }

    #[test]
    fn test_missing_data_file_is_an_error() {
        let dir = fixture_data_dir();
        fs::remove_file(dir.path().join(GPI_FILE)).unwrap();
        let err = build_figure(&config_for(&dir)).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_end_to_end_render_and_caption() {
        let dir = fixture_data_dir();
        let out = tempfile::tempdir().unwrap();
        let figure = build_figure(&config_for(&dir)).unwrap();

        let figure_path = out.path().join("flux_ratio_plot.svg");
        figure.render(&figure_path).unwrap();
        fs::write(out.path().join("auto_caption.txt"), figure.caption.text()).unwrap();

        assert!(figure_path.exists());
        let caption = fs::read_to_string(out.path().join("auto_caption.txt")).unwrap();
        assert!(caption.starts_with("** This short caption is auto-generated."));
    }
}
