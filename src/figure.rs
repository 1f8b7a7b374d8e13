//! Figure element model and plotters rendering
//!
//! Sources describe what to draw (lines, scatter points, shaded bands,
//! text) in data coordinates; this module owns the fixed log-log axes and
//! turns the element lists into an SVG or bitmap artifact.

use std::iter;
use std::path::Path;

use chrono::Local;
use plotters::coord::combinators::LogCoord;
use plotters::coord::Shift;
use plotters::element::{DynElement, IntoDynElement};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use thiserror::Error;

use crate::caption::Caption;
use crate::palette::{PURE_RED, TAN};

/// Separation axis range in arcseconds
pub const X_RANGE: (f64, f64) = (0.07, 5.0);

/// Contrast axis range
pub const Y_RANGE: (f64, f64) = (1e-11, 1e-3);

const FIGURE_SIZE: (u32, u32) = (900, 750);

/// Base font size for curve labels
pub const LABEL_FONT: u32 = 15;

/// Default contrast curve line width
pub const CURVE_WIDTH: u32 = 2;

type LogLogChart<'a, 'b, DB> =
    ChartContext<'a, DB, Cartesian2d<LogCoord<f64>, LogCoord<f64>>>;

/// Errors from figure rendering
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// A plotted curve or line segment
#[derive(Debug, Clone)]
pub struct LineSpec {
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub width: u32,
    pub style: LineStyle,
    pub legend: Option<String>,
}

impl LineSpec {
    pub fn new(points: Vec<(f64, f64)>, color: RGBColor) -> Self {
        Self {
            points,
            color,
            width: CURVE_WIDTH,
            style: LineStyle::Solid,
            legend: None,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.style = LineStyle::Dashed;
        self
    }

    pub fn dotted(mut self) -> Self {
        self.style = LineStyle::Dotted;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Diamond,
    TriangleUp,
    TriangleDown,
}

/// A scatter series of planet points
#[derive(Debug, Clone)]
pub struct ScatterSpec {
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub marker: Marker,
    /// Marker radius in pixels
    pub size: i32,
    /// Draw a black edge around each marker
    pub outlined: bool,
    pub alpha: f64,
    pub legend: Option<String>,
}

impl ScatterSpec {
    pub fn new(points: Vec<(f64, f64)>, color: RGBColor, marker: Marker) -> Self {
        Self {
            points,
            color,
            marker,
            size: 5,
            outlined: false,
            alpha: 1.0,
            legend: None,
        }
    }

    pub fn size(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    pub fn outlined(mut self) -> Self {
        self.outlined = true;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn legend(mut self, label: impl Into<String>) -> Self {
        self.legend = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// A text label anchored in data coordinates
#[derive(Debug, Clone)]
pub struct Annotation {
    pub text: String,
    pub at: (f64, f64),
    pub color: RGBColor,
    pub font_size: u32,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub bold: bool,
}

impl Annotation {
    pub fn new(text: impl Into<String>, at: (f64, f64), color: RGBColor) -> Self {
        Self {
            text: text.into(),
            at,
            color,
            font_size: LABEL_FONT,
            h_align: HAlign::Left,
            v_align: VAlign::Center,
            bold: false,
        }
    }

    pub fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A shaded region between two curves sharing x samples
#[derive(Debug, Clone)]
pub struct BandSpec {
    pub upper: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub alpha: f64,
}

/// Everything needed to render the figure and its caption
#[derive(Debug, Clone)]
pub struct FluxRatioFigure {
    /// Shaded regions, drawn first
    pub bands: Vec<BandSpec>,
    /// Connector and callout lines drawn beneath the curves
    pub underlays: Vec<LineSpec>,
    /// Contrast curves and requirement lines
    pub curves: Vec<LineSpec>,
    /// Planet scatter series
    pub scatters: Vec<ScatterSpec>,
    /// Text labels
    pub annotations: Vec<Annotation>,
    /// Manual bandpass legend entries, empty when color coding is off
    pub bandpass_legend: Vec<(&'static str, RGBColor)>,
    /// Stamp DRAFT and today's date on the figure
    pub draft: bool,
    pub caption: Caption,
}

impl FluxRatioFigure {
    pub fn new(caption: Caption) -> Self {
        Self {
            bands: Vec::new(),
            underlays: Vec::new(),
            curves: Vec::new(),
            scatters: Vec::new(),
            annotations: Vec::new(),
            bandpass_legend: Vec::new(),
            draft: false,
            caption,
        }
    }

    /// Render the figure to `path`, picking the backend from the extension
    pub fn render(&self, path: &Path) -> Result<(), FigureError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_svg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
            self.draw_on(&root)
                .map_err(|e| FigureError::Backend(e.to_string()))
        } else {
            let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
            self.draw_on(&root)
                .map_err(|e| FigureError::Backend(e.to_string()))
        }
    }

    fn draw_on<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(70)
            .build_cartesian_2d(
                (X_RANGE.0..X_RANGE.1).log_scale(),
                (Y_RANGE.0..Y_RANGE.1).log_scale(),
            )?;

        chart
            .configure_mesh()
            .x_desc("Separation [arcsec]")
            .y_desc("Contrast: Flux ratio to host star")
            // Scalar tick labels instead of powers of ten on the x axis
            .x_label_formatter(&|x| {
                let label = format!("{x:.2}");
                label
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_string()
            })
            .y_label_formatter(&|y| format!("{y:.0e}"))
            .light_line_style(TAN.mix(0.1))
            .bold_line_style(TAN.mix(0.1))
            .axis_desc_style(("sans-serif", 18))
            .draw()?;

        for band in &self.bands {
            let mut outline: Vec<(f64, f64)> = band.upper.clone();
            outline.extend(band.lower.iter().rev().copied());
            chart.draw_series(iter::once(Polygon::new(
                outline,
                band.color.mix(band.alpha),
            )))?;
        }

        for line in &self.underlays {
            draw_line(&mut chart, line)?;
        }
        for line in &self.curves {
            draw_line(&mut chart, line)?;
        }
        for scatter in &self.scatters {
            draw_scatter(&mut chart, scatter)?;
        }
        for annotation in &self.annotations {
            draw_annotation(&mut chart, annotation)?;
        }

        let has_series_legends = self.curves.iter().any(|c| c.legend.is_some())
            || self.scatters.iter().any(|s| s.legend.is_some());
        if has_series_legends {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", 13))
                .draw()?;
        }

        self.draw_bandpass_legend(&mut chart)?;

        if self.draft {
            let date = Local::now().date_naive();
            let stamp = Annotation::new(
                format!("DRAFT  {date} "),
                (X_RANGE.1, Y_RANGE.0 * 2.0),
                PURE_RED,
            )
            .align(HAlign::Right, VAlign::Bottom)
            .bold();
            draw_annotation(&mut chart, &stamp)?;
        }

        root.present()?;
        Ok(())
    }

    /// Manually drawn bandpass legend in the upper left
    fn draw_bandpass_legend<DB: DrawingBackend>(
        &self,
        chart: &mut LogLogChart<'_, '_, DB>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        if self.bandpass_legend.is_empty() {
            return Ok(());
        }

        // Log axis: legend rows step down by a constant factor
        let row_factor = 0.55f64;
        let title_y = 5.5e-4;
        let first_row_y = title_y * row_factor;
        let last_row_y = first_row_y * row_factor.powi(self.bandpass_legend.len() as i32 - 1);
        let box_top = title_y / row_factor.sqrt();
        let box_bottom = last_row_y * row_factor;

        chart.draw_series(iter::once(Rectangle::new(
            [(0.073, box_top), (0.21, box_bottom)],
            WHITE.mix(0.85).filled(),
        )))?;
        chart.draw_series(iter::once(Rectangle::new(
            [(0.073, box_top), (0.21, box_bottom)],
            BLACK.stroke_width(1),
        )))?;

        let title = Annotation::new("Bandpass", (0.077, title_y), BLACK)
            .font_size(14)
            .bold();
        draw_annotation(chart, &title)?;

        let mut row_y = first_row_y;
        for (label, color) in &self.bandpass_legend {
            chart.draw_series(iter::once(PathElement::new(
                vec![(0.077, row_y), (0.095, row_y)],
                color.stroke_width(3),
            )))?;
            let entry = Annotation::new(*label, (0.1, row_y), BLACK).font_size(13);
            draw_annotation(chart, &entry)?;
            row_y *= row_factor;
        }
        Ok(())
    }
}

fn draw_line<'a, DB: DrawingBackend + 'a>(
    chart: &mut LogLogChart<'a, '_, DB>,
    spec: &LineSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = spec.color.stroke_width(spec.width);
    let points = spec.points.iter().copied();

    let anno = match spec.style {
        LineStyle::Solid => chart.draw_series(LineSeries::new(points, style))?,
        LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(points, 10, 6, style))?,
        LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(points, 2, 5, style))?,
    };

    if let Some(label) = &spec.legend {
        let color = spec.color;
        anno.label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    Ok(())
}

fn draw_scatter<'a, DB: DrawingBackend + 'a>(
    chart: &mut LogLogChart<'a, '_, DB>,
    spec: &ScatterSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let fill: ShapeStyle = spec.color.mix(spec.alpha).filled();
    let edge: ShapeStyle = if spec.outlined {
        BLACK.stroke_width(1)
    } else {
        spec.color.mix(spec.alpha).stroke_width(1)
    };
    let size = spec.size;
    let points = spec.points.iter().copied();

    let anno = match spec.marker {
        Marker::Circle => chart.draw_series(points.map(|c| {
            EmptyElement::at(c) + Circle::new((0, 0), size, fill) + Circle::new((0, 0), size, edge)
        }))?,
        Marker::Square => chart.draw_series(points.map(|c| {
            EmptyElement::at(c)
                + Rectangle::new([(-size, -size), (size, size)], fill)
                + Rectangle::new([(-size, -size), (size, size)], edge)
        }))?,
        Marker::Diamond => chart.draw_series(points.map(|c| {
            EmptyElement::at(c)
                + Polygon::new(diamond_outline(size), fill)
                + PathElement::new(closed(diamond_outline(size)), edge)
        }))?,
        Marker::TriangleUp => chart.draw_series(points.map(|c| {
            EmptyElement::at(c)
                + Polygon::new(triangle_outline(size, false), fill)
                + PathElement::new(closed(triangle_outline(size, false)), edge)
        }))?,
        Marker::TriangleDown => chart.draw_series(points.map(|c| {
            EmptyElement::at(c)
                + Polygon::new(triangle_outline(size, true), fill)
                + PathElement::new(closed(triangle_outline(size, true)), edge)
        }))?,
    };

    if let Some(label) = &spec.legend {
        let color = spec.color;
        let marker = spec.marker;
        anno.label(label)
            .legend(move |(x, y)| legend_marker(marker, (x + 8, y), color));
    }
    Ok(())
}

fn diamond_outline(size: i32) -> Vec<(i32, i32)> {
    vec![(0, -size), (size, 0), (0, size), (-size, 0)]
}

/// Screen y grows downward, so `flipped` points the triangle down
fn triangle_outline(size: i32, flipped: bool) -> Vec<(i32, i32)> {
    if flipped {
        vec![(-size, -size), (size, -size), (0, size)]
    } else {
        vec![(-size, size), (size, size), (0, -size)]
    }
}

fn closed(mut outline: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    if let Some(&first) = outline.first() {
        outline.push(first);
    }
    outline
}

/// Legend swatch matching a scatter series marker
fn legend_marker<DB: DrawingBackend>(
    marker: Marker,
    at: (i32, i32),
    color: RGBColor,
) -> DynElement<'static, DB, (i32, i32)> {
    let (x, y) = at;
    let style = color.filled();
    match marker {
        Marker::Circle => Circle::new(at, 4, style).into_dyn(),
        Marker::Square => Rectangle::new([(x - 4, y - 4), (x + 4, y + 4)], style).into_dyn(),
        Marker::Diamond => {
            Polygon::new(vec![(x, y - 4), (x + 4, y), (x, y + 4), (x - 4, y)], style).into_dyn()
        }
        Marker::TriangleUp => TriangleMarker::new(at, 4, style).into_dyn(),
        Marker::TriangleDown => {
            Polygon::new(vec![(x - 4, y - 4), (x + 4, y - 4), (x, y + 4)], style).into_dyn()
        }
    }
}

fn draw_annotation<DB: DrawingBackend>(
    chart: &mut LogLogChart<'_, '_, DB>,
    spec: &Annotation,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let mut font = ("sans-serif", spec.font_size).into_font();
    if spec.bold {
        font = font.style(FontStyle::Bold);
    }
    let h_pos = match spec.h_align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let v_pos = match spec.v_align {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Bottom => VPos::Bottom,
    };
    let style = font.color(&spec.color).pos(Pos::new(h_pos, v_pos));

    chart.draw_series(iter::once(Text::new(spec.text.clone(), spec.at, style)))?;
    Ok(())
}
