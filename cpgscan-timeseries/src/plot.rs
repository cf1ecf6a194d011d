use std::path::Path;

use svg::Document;
use svg::node::element::{Group, Line, Path as SvgPath, Polygon, Rectangle, Text};

use crate::errors::TimeSeriesResult;
use crate::models::Metric;
use crate::rolling::{Band, min_max};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 90.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;

const DAILY_COLOUR: &str = "#0173b2";
const ROLLING_COLOUR: &str = "#de8f05";
const BAND_COLOUR: &str = "green";
const EARLY_COLOUR: &str = "#d55e00";
const LATE_COLOUR: &str = "#029e73";
const GRID_COLOUR: &str = "#dddddd";

const MAX_TICKS: usize = 50;
const REDUCTION_TICKS: [u32; 6] = [0, 20, 40, 60, 80, 100];

///
/// One metric of the correlation table, plotted against cumulative infections.
///
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub metric: Metric,
    pub window: usize,
    pub cases: Vec<f64>,
    pub daily: Vec<f64>,
    pub rolling: Vec<Option<f64>>,
    pub band: Vec<Option<Band>>,
}

struct Frame {
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, value: f64) -> f64 {
        MARGIN_LEFT + value / self.x_max * Self::plot_width()
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (self.y_max - value) / (self.y_max - self.y_min) * Self::plot_height()
    }
}

fn polyline(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let op = if i == 0 { "M" } else { "L" };
        d.push_str(&format!("{op} {x:.2},{y:.2} "));
    }
    d.trim_end().to_string()
}

fn label(x: f64, y: f64, text: impl Into<String>, anchor: &str) -> Text {
    Text::new(text)
        .set("x", x)
        .set("y", y)
        .set("font-family", "sans-serif")
        .set("font-size", 11)
        .set("text-anchor", anchor)
}

/// A step of 1, 2 or 5 times a power of ten giving roughly `target` ticks.
fn nice_step(span: f64, target: f64) -> f64 {
    let raw = span / target;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual > 5.0 {
        10.0
    } else if residual > 2.0 {
        5.0
    } else if residual > 1.0 {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

///
/// Ticks `start + i * step` up to `end`, at most `MAX_TICKS + 1` of them.
///
fn ticks(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0 && start.is_finite() && end >= start) {
        return vec![];
    }
    let n = (((end - start) / step).floor() as usize).min(MAX_TICKS);
    (0..=n).map(|i| start + i as f64 * step).collect()
}

fn infections_label(value: f64) -> String {
    if value >= 1e6 {
        format!("{}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{}k", value / 1e3)
    } else {
        format!("{value}")
    }
}

///
/// Render the daily values, the moving average with its confidence band, the shaded early
/// and late thirds of the infection axis and a secondary percent-reduction axis.
///
pub fn render_chart(series: &ChartSeries) -> Document {
    let x_max = series.cases.iter().copied().fold(0.0, f64::max).max(1.0);
    let (mut y_min, mut y_max) = min_max(&series.daily).unwrap_or((0.0, 1.0));
    if y_max == y_min {
        let pad = (y_max.abs() * 1e-6).max(0.5);
        y_min -= pad;
        y_max += pad;
    }
    let frame = Frame { x_max, y_min, y_max };

    let mut plot = Group::new();

    // early and late thirds of the infection axis
    let third = frame.x(x_max / 3.0);
    plot = plot
        .add(
            Rectangle::new()
                .set("x", frame.x(0.0))
                .set("y", MARGIN_TOP)
                .set("width", third - frame.x(0.0))
                .set("height", Frame::plot_height())
                .set("fill", EARLY_COLOUR)
                .set("fill-opacity", 0.1),
        )
        .add(
            Rectangle::new()
                .set("x", third)
                .set("y", MARGIN_TOP)
                .set("width", frame.x(x_max) - third)
                .set("height", Frame::plot_height())
                .set("fill", LATE_COLOUR)
                .set("fill-opacity", 0.1),
        );

    plot = plot.add(axes(&frame, series.metric));

    let band: Vec<(f64, Band)> = series
        .cases
        .iter()
        .zip(&series.band)
        .filter_map(|(x, b)| b.map(|b| (*x, b)))
        .collect();
    if !band.is_empty() {
        let upper = band.iter().map(|(x, b)| (frame.x(*x), frame.y(b.upper)));
        let lower = band.iter().rev().map(|(x, b)| (frame.x(*x), frame.y(b.lower)));
        let points = upper
            .chain(lower)
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        plot = plot.add(
            Polygon::new()
                .set("points", points)
                .set("fill", BAND_COLOUR)
                .set("fill-opacity", 0.3),
        );
    }

    let daily: Vec<(f64, f64)> = series
        .cases
        .iter()
        .zip(&series.daily)
        .map(|(x, y)| (frame.x(*x), frame.y(*y)))
        .collect();
    plot = plot.add(
        SvgPath::new()
            .set("d", polyline(&daily))
            .set("stroke", DAILY_COLOUR)
            .set("stroke-width", 0.75)
            .set("fill", "none"),
    );

    let rolling: Vec<(f64, f64)> = series
        .cases
        .iter()
        .zip(&series.rolling)
        .filter_map(|(x, y)| y.map(|y| (frame.x(*x), frame.y(y))))
        .collect();
    if !rolling.is_empty() {
        plot = plot.add(
            SvgPath::new()
                .set("d", polyline(&rolling))
                .set("stroke", ROLLING_COLOUR)
                .set("stroke-width", 1.25)
                .set("fill", "none"),
        );
    }

    Document::new()
        .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT))
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .add(
            Rectangle::new()
                .set("width", WIDTH)
                .set("height", HEIGHT)
                .set("fill", "white"),
        )
        .add(plot)
        .add(legend(series.window))
}

fn axes(frame: &Frame, metric: Metric) -> Group {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut group = Group::new().set("stroke-width", 1);

    let x_step = nice_step(frame.x_max, 8.0);
    for tick in ticks(0.0, frame.x_max, x_step) {
        let x = frame.x(tick);
        group = group
            .add(grid_line(x, top, x, bottom))
            .add(label(x, bottom + 18.0, infections_label(tick), "middle"));
    }

    let y_step = nice_step(frame.y_max - frame.y_min, 6.0);
    let y_start = (frame.y_min / y_step).ceil() * y_step;
    for tick in ticks(y_start, frame.y_max, y_step) {
        let y = frame.y(tick);
        group = group
            .add(grid_line(left, y, right, y))
            .add(label(left - 6.0, y + 4.0, value_label(tick), "end"));
    }

    // 0% reduction sits at the series maximum, 100% at its minimum
    for percent in REDUCTION_TICKS {
        let value = frame.y_max - f64::from(percent) / 100.0 * (frame.y_max - frame.y_min);
        let y = frame.y(value) + 4.0;
        group = group.add(label(right + 6.0, y, format!("{percent}%"), "start"));
    }

    group
        .add(
            SvgPath::new()
                .set(
                    "d",
                    format!("M {left},{top} L {left},{bottom} L {right},{bottom} L {right},{top}"),
                )
                .set("stroke", "black")
                .set("fill", "none"),
        )
        .add(label(
            (left + right) / 2.0,
            HEIGHT - 15.0,
            "Number of Infections",
            "middle",
        ))
        .add(
            label(0.0, 0.0, metric.axis_label(), "middle")
                .set("transform", format!("translate(20,{}) rotate(-90)", (top + bottom) / 2.0)),
        )
        .add(
            label(0.0, 0.0, metric.reduction_label(), "middle").set(
                "transform",
                format!("translate({},{}) rotate(90)", WIDTH - 20.0, (top + bottom) / 2.0),
            ),
        )
}

fn value_label(value: f64) -> String {
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn grid_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", GRID_COLOUR)
}

fn legend(window: usize) -> Group {
    let entries = [
        (DAILY_COLOUR, "Daily average values".to_string()),
        (ROLLING_COLOUR, format!("{window}-days Moving Average")),
        (BAND_COLOUR, "95% Confidence Interval".to_string()),
    ];

    let x = WIDTH - MARGIN_RIGHT - 190.0;
    let mut group = Group::new();
    for (i, (colour, text)) in entries.into_iter().enumerate() {
        let y = MARGIN_TOP + 15.0 + i as f64 * 16.0;
        group = group
            .add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y - 8.0)
                    .set("width", 14)
                    .set("height", 8)
                    .set("fill", colour),
            )
            .add(label(x + 20.0, y, text, "start"));
    }
    group
}

///
/// Write a rendered chart, creating the parent directory when needed.
///
pub fn save_chart<P: AsRef<Path>>(path: P, document: &Document) -> TimeSeriesResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    svg::save(path, document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn series() -> ChartSeries {
        ChartSeries {
            metric: Metric::CpgCount,
            window: 3,
            cases: vec![0.0, 555.0, 654.0, 941.0],
            daily: vec![2000.0, 1990.0, 1980.0, 1970.0],
            rolling: vec![None, None, Some(1990.0), Some(1980.0)],
            band: vec![
                None,
                None,
                Some(Band {
                    lower: 1985.0,
                    upper: 1995.0,
                }),
                Some(Band {
                    lower: 1975.0,
                    upper: 1985.0,
                }),
            ],
        }
    }

    #[rstest]
    #[case(1000.0, 8.0, 200.0)]
    #[case(160_000_000.0, 8.0, 20_000_000.0)]
    #[case(0.05, 6.0, 0.01)]
    fn test_nice_step(#[case] span: f64, #[case] target: f64, #[case] expected: f64) {
        assert!((nice_step(span, target) - expected).abs() < expected * 1e-9);
    }

    #[rstest]
    #[case(20_000_000.0, "20M")]
    #[case(2_500.0, "2.5k")]
    #[case(0.0, "0")]
    fn test_infections_label(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(infections_label(value), expected);
    }

    #[rstest]
    #[case(1990.5, "1990.5")]
    #[case(2.0, "2")]
    fn test_value_label(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(value_label(value), expected);
    }

    #[rstest]
    fn test_ticks_are_evenly_spaced() {
        assert_eq!(ticks(0.0, 1000.0, 200.0), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0]);
        assert_eq!(ticks(5.0, 1.0, 1.0), Vec::<f64>::new());
        assert_eq!(ticks(0.0, 1.0, 0.0), Vec::<f64>::new());
    }

    #[rstest]
    fn test_ticks_are_capped() {
        // step far below the float spacing at 1e17
        let t = ticks(1e17, 1e17 + 1e6, 1.0);
        assert_eq!(t.len(), MAX_TICKS + 1);
    }

    #[rstest]
    #[case(vec![1e17, 1e17 + 64.0, 1e17 + 128.0])]
    #[case(vec![1e17, 1e17, 1e17])]
    fn test_render_chart_with_huge_values(#[case] daily: Vec<f64>) {
        let series = ChartSeries {
            metric: Metric::CpgCount,
            window: 3,
            cases: vec![0.0, 10.0, 20.0],
            rolling: vec![None; daily.len()],
            band: vec![None; daily.len()],
            daily,
        };
        let rendered = render_chart(&series).to_string();
        assert!(rendered.contains("Number of CpGs"));
    }

    #[rstest]
    fn test_polyline() {
        assert_eq!(polyline(&[(1.0, 2.0), (3.0, 4.5)]), "M 1.00,2.00 L 3.00,4.50");
    }

    #[rstest]
    fn test_render_chart_contents(series: ChartSeries) {
        let rendered = render_chart(&series).to_string();

        for needle in [
            DAILY_COLOUR,
            ROLLING_COLOUR,
            EARLY_COLOUR,
            LATE_COLOUR,
            "Number of CpGs",
            "Percentage reduction in no. of CpGs",
            "3-days Moving Average",
            "100%",
        ] {
            assert!(rendered.contains(needle), "missing {needle}");
        }
        assert!(rendered.contains("<polygon"));
    }

    #[rstest]
    fn test_save_chart(series: ChartSeries) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("charts/Number_CG.svg");

        save_chart(&path, &render_chart(&series)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<svg"));
    }
}
