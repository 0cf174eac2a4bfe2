//! Dual-axis temperature / closing-price chart rendered with Plotters.
//!
//! Left axis: average, high, and low temperature on a fixed `[0, 40]` degC scale.
//! Right axis: closing price, snapped outward to whole thousands.
//! Both share a date axis padded by five days on each side.
//!
//! The output backend is picked from the file extension: `.svg` goes through
//! Plotters' SVG backend, everything else through the bitmap backend (PNG,
//! JPEG, ... as supported by the encoder).

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use tracing::info;

use crate::domain::{ChartOptions, JoinedRecord};
use crate::error::AppError;

/// Fixed temperature scale (degC).
pub const TEMP_RANGE: (f64, f64) = (0.0, 40.0);
/// Date-axis padding on both sides.
pub const DATE_PADDING_DAYS: i64 = 5;
/// Granularity the price axis is snapped to.
pub const PRICE_STEP: f64 = 1000.0;

/// Top-left corner of the price legend as fractions of the plotting area
/// (from the left edge, from the top edge).
pub const PRICE_LEGEND_ANCHOR: (f64, f64) = (0.023, 0.165);

/// DejaVu Sans, bundled so rendering does not depend on system fonts.
static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);

/// A render-ready chart description.
///
/// All series and bounds are computed up front in [`PriceTempChart::from_records`],
/// so drawing is a pure function of this value.
#[derive(Debug, Clone)]
pub struct PriceTempChart {
    pub avg: Vec<(f64, f64)>,
    pub max: Vec<(f64, f64)>,
    pub min: Vec<(f64, f64)>,
    pub close: Vec<(f64, f64)>,
    /// Date bounds as days since CE.
    pub x_bounds: [f64; 2],
    pub temp_bounds: [f64; 2],
    pub price_bounds: [f64; 2],
}

impl PriceTempChart {
    pub fn from_records(records: &[JoinedRecord]) -> Result<Self, AppError> {
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Err(AppError::insufficient_data("Cannot draw a chart without joined records."));
        };

        let (lo, hi) = price_axis_range(records.iter().map(|r| r.close_price));

        Ok(Self {
            avg: series(records, |r| r.avg_temp),
            max: series(records, |r| r.max_temp),
            min: series(records, |r| r.min_temp),
            close: series(records, |r| r.close_price),
            x_bounds: date_axis_range(first.date, last.date),
            temp_bounds: [TEMP_RANGE.0, TEMP_RANGE.1],
            price_bounds: [lo, hi],
        })
    }

    /// Draw onto any Plotters drawing area and flush it.
    ///
    /// Temperature series get an upper-left legend; the price series gets its
    /// own legend inside the plot at [`PRICE_LEGEND_ANCHOR`].
    pub fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>, options: &ChartOptions) -> Result<(), AppError> {
        root.fill(&WHITE).map_err(render_err)?;
        let frame = root
            .titled(&options.title, ("sans-serif", 18).into_font())
            .map_err(render_err)?;

        let [x0, x1] = self.x_bounds;
        let [t0, t1] = self.temp_bounds;
        let [p0, p1] = self.price_bounds;

        {
            let mut chart = chart_frame(&frame, x0..x1, t0..t1)?.set_secondary_coord(x0..x1, p0..p1);

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Temperature[degC]")
                .x_labels(8)
                .x_label_formatter(&|v| format_day(*v))
                .label_style(("sans-serif", 10).into_font())
                .draw()
                .map_err(render_err)?;

            chart
                .configure_secondary_axes()
                .y_desc("Price[yen]")
                .draw()
                .map_err(render_err)?;

            // Temperature lines stay thin; legend samples are drawn thicker so
            // the colours remain readable.
            let temps = [
                (&self.avg, ORANGE, "Average Temperature"),
                (&self.max, RED, "High Temperature"),
                (&self.min, BLUE, "Low Temperature"),
            ];
            for (points, color, label) in temps {
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(1)))
                    .map_err(render_err)?
                    .label(label)
                    .legend(move |(x, y)| legend_swatch(x, y, color));
            }

            // Unlabelled here: the price legend is drawn separately below.
            chart
                .draw_secondary_series(LineSeries::new(self.close.iter().copied(), DARK_GREEN.stroke_width(2)))
                .map_err(render_err)?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(("sans-serif", 10).into_font())
                .draw()
                .map_err(render_err)?;

            // Same frame and layout, so this context's plotting area coincides
            // with the one above. It only carries the price legend entry.
            let mut price = chart_frame(&frame, x0..x1, p0..p1)?;
            let (w, h) = price.plotting_area().dim_in_pixel();
            let anchor = SeriesLabelPosition::Coordinate(
                (f64::from(w) * PRICE_LEGEND_ANCHOR.0).round() as i32,
                (f64::from(h) * PRICE_LEGEND_ANCHOR.1).round() as i32,
            );

            price
                .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), DARK_GREEN.stroke_width(2)))
                .map_err(render_err)?
                .label("Stock Price")
                .legend(|(x, y)| legend_swatch(x, y, DARK_GREEN));

            price
                .configure_series_labels()
                .position(anchor)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(("sans-serif", 10).into_font())
                .draw()
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)
    }
}

/// Render `records` to `path`.
///
/// The image is drawn into a temporary file next to `path` and renamed into
/// place only once drawing succeeded, so a failed run leaves no partial chart.
pub fn render(records: &[JoinedRecord], path: &Path, options: &ChartOptions) -> Result<(), AppError> {
    let chart = PriceTempChart::from_records(records)?;
    register_fonts()?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    // The bitmap encoder picks the image format from the extension.
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let staged = tempfile::Builder::new()
        .prefix(".corrcoef-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| AppError::io(format!("Failed to create chart '{}': {e}", path.display())))?;

    let size = (options.width, options.height);
    if is_svg(path) {
        chart.draw(SVGBackend::new(staged.path(), size).into_drawing_area(), options)?;
    } else {
        chart.draw(BitMapBackend::new(staged.path(), size).into_drawing_area(), options)?;
    }

    staged
        .persist(path)
        .map_err(|e| AppError::io(format!("Failed to write chart '{}': {e}", path.display())))?;

    info!(path = %path.display(), points = records.len(), "wrote chart");
    Ok(())
}

/// Register the bundled font under the family name every text style uses.
///
/// Plotters is built without system font lookup, so text can only be drawn
/// with fonts registered here.
fn register_fonts() -> Result<(), AppError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();

    let ok = *REGISTERED.get_or_init(|| {
        [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic, FontStyle::Oblique]
            .into_iter()
            .all(|style| register_font("sans-serif", style, FONT_BYTES).is_ok())
    });
    if ok {
        Ok(())
    } else {
        Err(AppError::render("Failed to load the bundled chart font."))
    }
}

fn chart_frame<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    x: Range<f64>,
    y: Range<f64>,
) -> Result<ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>, AppError> {
    ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x, y)
        .map_err(render_err)
}

fn legend_swatch(x: i32, y: i32, color: RGBColor) -> PathElement<(i32, i32)> {
    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
}

/// `[floor(min / 1000) * 1000, ceil(max / 1000) * 1000]`.
///
/// If every price sits on the same multiple of 1000 the range would collapse,
/// so it is widened by one step.
pub fn price_axis_range(prices: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = prices
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p), hi.max(p)));

    let lo = (min / PRICE_STEP).floor() * PRICE_STEP;
    let hi = (max / PRICE_STEP).ceil() * PRICE_STEP;
    if hi > lo { (lo, hi) } else { (lo, lo + PRICE_STEP) }
}

/// `[first - 5 days, last + 5 days]` as day numbers.
pub fn date_axis_range(first: NaiveDate, last: NaiveDate) -> [f64; 2] {
    let pad = DATE_PADDING_DAYS as f64;
    [day_number(first) - pad, day_number(last) + pad]
}

fn series(records: &[JoinedRecord], value: fn(&JoinedRecord) -> f64) -> Vec<(f64, f64)> {
    records.iter().map(|r| (day_number(r.date), value(r))).collect()
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn format_day(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn render_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("Chart rendering failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<JoinedRecord> {
        (1..=20)
            .map(|d| JoinedRecord {
                date: ymd(2021, 6, d),
                avg_temp: 20.0 + d as f64 * 0.3,
                max_temp: 25.0 + d as f64 * 0.3,
                min_temp: 15.0 + d as f64 * 0.3,
                close_price: 4200.0 + d as f64 * 35.0,
            })
            .collect()
    }

    #[test]
    fn price_axis_snaps_to_thousands() {
        assert_eq!(price_axis_range([4210.0, 4890.0, 5120.0]), (4000.0, 6000.0));
        assert_eq!(price_axis_range([105.0]), (0.0, 1000.0));
    }

    #[test]
    fn price_axis_never_collapses() {
        assert_eq!(price_axis_range([3000.0, 3000.0]), (3000.0, 4000.0));
    }

    #[test]
    fn date_axis_is_padded_by_five_days() {
        let [lo, hi] = date_axis_range(ymd(2021, 3, 1), ymd(2021, 3, 31));
        assert_eq!(format_day(lo), "2021-02-24");
        assert_eq!(format_day(hi), "2021-04-05");
    }

    #[test]
    fn chart_bounds_follow_records() {
        let chart = PriceTempChart::from_records(&sample()).unwrap();
        assert_eq!(chart.temp_bounds, [0.0, 40.0]);
        assert_eq!(chart.price_bounds, [4000.0, 5000.0]);
        assert_eq!(chart.avg.len(), 20);
        assert_eq!(chart.close[0].1, 4235.0);
        assert_eq!(chart.x_bounds[0], chart.avg[0].0 - 5.0);
    }

    #[test]
    fn empty_records_cannot_be_charted() {
        let err = PriceTempChart::from_records(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn renders_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.png");
        render(&sample(), &path, &ChartOptions::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn renders_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.svg");
        render(&sample(), &path, &ChartOptions::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<svg"));
        assert!(text.contains("Itoen(2593)StockPrice vs. Temperature"));
        assert!(text.contains("Price[yen]"));
    }

    #[test]
    fn price_has_its_own_legend() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.svg");
        render(&sample(), &path, &ChartOptions::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        for label in ["Average Temperature", "High Temperature", "Low Temperature", "Stock Price"] {
            assert_eq!(text.matches(label).count(), 1, "{label}");
        }
    }

    #[test]
    fn renders_png_twice_in_one_process() {
        let dir = TempDir::new().unwrap();
        for name in ["a.png", "b.png"] {
            let path = dir.path().join(name);
            render(&sample(), &path, &ChartOptions::default()).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
        // Only the two charts; staging files are renamed away.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn failed_render_leaves_previous_file_untouched() {
        let dir = TempDir::new().unwrap();
        // No encoder exists for this extension, so saving the bitmap fails.
        let path = dir.path().join("graph.nope");
        std::fs::write(&path, "previous").unwrap();

        let err = render(&sample(), &path, &ChartOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_render_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.nope");

        let err = render(&sample(), &path, &ChartOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("graph.png");
        let err = render(&sample(), &path, &ChartOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!path.exists());
    }
}
