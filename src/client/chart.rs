use std::fmt::Write;

use crate::db::HydrographPoint;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 70.0;
const SERIES_COLOR: &str = "#1f77b4";

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
}

/// Water level series with threshold reference lines
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub station: String,
    pub points: Vec<(String, f64)>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl LineChart {
    /// Thresholds come from the first point; the store repeats them per row
    pub fn from_points(station: &str, points: &[HydrographPoint]) -> Self {
        let reference_lines = points
            .first()
            .map(|first| {
                [
                    ("Warning", first.warning, "orange"),
                    ("Danger", first.danger, "red"),
                    ("HFL", first.hfl, "purple"),
                ]
                .into_iter()
                .filter_map(|(label, value, color)| {
                    value.map(|value| ReferenceLine { label, value, color })
                })
                .collect()
            })
            .unwrap_or_default();

        Self {
            station: station.to_string(),
            points: points.iter().map(|p| (p.datetime.clone(), p.level)).collect(),
            reference_lines,
        }
    }

    /// Y range covering every level and threshold, padded 5% each side
    pub fn y_domain(&self) -> (f64, f64) {
        let values = self
            .points
            .iter()
            .map(|(_, v)| *v)
            .chain(self.reference_lines.iter().map(|r| r.value));

        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }

        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        (min - pad, max + pad)
    }

    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let (w, h) = (width as f64, height as f64);
        let plot_w = (w - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_h = (h - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let (y_min, y_max) = self.y_domain();

        let x_at = |i: usize| -> f64 {
            if self.points.len() <= 1 {
                MARGIN_LEFT + plot_w / 2.0
            } else {
                MARGIN_LEFT + plot_w * i as f64 / (self.points.len() - 1) as f64
            }
        };
        let y_at = |v: f64| -> f64 { MARGIN_TOP + plot_h * (y_max - v) / (y_max - y_min) };

        let mut svg = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = writeln!(svg, "  <title>{}</title>", escape(&self.station));
        let _ = writeln!(
            svg,
            r##"  <rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{plot_w:.1}" height="{plot_h:.1}" fill="none" stroke="#cccccc" stroke-dasharray="3 3"/>"##
        );
        let _ = writeln!(
            svg,
            r#"  <text x="16" y="{:.1}" transform="rotate(-90 16 {:.1})" text-anchor="middle" font-size="12">Water Level (m)</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0
        );

        for tick in 0..=4 {
            let v = y_min + (y_max - y_min) * tick as f64 / 4.0;
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{v:.2}</text>"#,
                MARGIN_LEFT - 6.0,
                y_at(v) + 3.0
            );
        }

        for line in &self.reference_lines {
            let y = y_at(line.value);
            let _ = writeln!(
                svg,
                r#"  <line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}"/>"#,
                MARGIN_LEFT + plot_w,
                line.color
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11" fill="{}">{}</text>"#,
                MARGIN_LEFT + plot_w - 4.0,
                y - 4.0,
                line.color,
                line.label
            );
        }

        let coords: Vec<String> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="{SERIES_COLOR}" stroke-width="2"/>"#,
            coords.join(" ")
        );

        for (i, (label, v)) in self.points.iter().enumerate() {
            let (x, y) = (x_at(i), y_at(*v));
            let _ = writeln!(
                svg,
                r#"  <circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{SERIES_COLOR}"><title>{} {v} m</title></circle>"#,
                escape(label)
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{x:.1}" y="{:.1}" transform="rotate(-30 {x:.1} {:.1})" text-anchor="end" font-size="10">{}</text>"#,
                MARGIN_TOP + plot_h + 14.0,
                MARGIN_TOP + plot_h + 14.0,
                escape(label)
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// What the chart panel shows for a selection
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Prompt(&'static str),
    Placeholder(&'static str),
    Chart(LineChart),
}

impl ChartView {
    pub fn build(station: Option<&str>, points: &[HydrographPoint]) -> Self {
        match station.filter(|s| !s.is_empty()) {
            None => ChartView::Prompt("Select a station to view hydrograph"),
            Some(_) if points.is_empty() => ChartView::Placeholder("Loading hydrograph..."),
            Some(station) => ChartView::Chart(LineChart::from_points(station, points)),
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
