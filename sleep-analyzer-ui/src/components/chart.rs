//! Chart Components
//!
//! Heart-rate line chart and stepped hypnogram using HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::{ChartAxis, HeartRateChart, HypnogramChart};

const HEART_RATE_COLOR: &str = "#ef4444"; // red-500
const HYPNOGRAM_COLOR: &str = "#8b5cf6"; // violet-500

/// Plot area inside the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(canvas_width: f64, canvas_height: f64) -> Self {
        let (margin_left, margin_right, margin_top, margin_bottom) = (60.0, 20.0, 20.0, 40.0);
        Self {
            left: margin_left,
            top: margin_top,
            width: canvas_width - margin_left - margin_right,
            height: canvas_height - margin_top - margin_bottom,
        }
    }

    /// X of sample `index` out of `count`, evenly spaced edge to edge
    fn x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.left;
        }
        self.left + index as f64 / (count - 1) as f64 * self.width
    }

    /// Y of `value` on `axis`; values outside the axis sit on its edge
    fn y(&self, value: f64, axis: ChartAxis) -> f64 {
        let clamped = value.clamp(axis.min, axis.max);
        self.top + (axis.max - clamped) / (axis.max - axis.min) * self.height
    }
}

/// Corner points of a stepped line through `points`
fn step_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for (i, &(x, y)) in points.iter().enumerate() {
        if i > 0 {
            let (_, prev_y) = points[i - 1];
            out.push((x, prev_y));
        }
        out.push((x, y));
    }
    out
}

/// Heart-rate trend chart
#[component]
pub fn HeartRateCanvas(
    #[prop(into)]
    data: Signal<Option<HeartRateChart>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let chart = data.get();
        if let (Some(canvas), Some(chart)) = (canvas_ref.get(), chart) {
            draw_heart_rate(&canvas, &chart);
        }
    });

    view! {
        <canvas node_ref=canvas_ref width="800" height="300" class="w-full h-64 rounded-lg" />
    }
}

/// Hypnogram chart
#[component]
pub fn HypnogramCanvas(
    #[prop(into)]
    data: Signal<Option<HypnogramChart>>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let chart = data.get();
        if let (Some(canvas), Some(chart)) = (canvas_ref.get(), chart) {
            draw_hypnogram(&canvas, &chart);
        }
    });

    view! {
        <canvas node_ref=canvas_ref width="800" height="300" class="w-full h-64 rounded-lg" />
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Background, horizontal grid and Y labels
fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    area: PlotArea,
    ticks: &[(f64, String)],
    axis: ChartAxis,
) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    for (value, label) in ticks {
        let y = area.y(*value, axis);
        ctx.begin_path();
        ctx.move_to(area.left, y);
        ctx.line_to(area.left + area.width, y);
        ctx.stroke();

        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(label, 5.0, y + 4.0);
    }
}

/// Time labels under the plot, every `every`th sample
fn draw_time_labels(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    area: PlotArea,
    times: &[&str],
    every: usize,
) {
    ctx.set_fill_style(&"#9ca3af".into());
    ctx.set_font("12px sans-serif");
    let height = canvas.height() as f64;

    for (i, time) in times.iter().enumerate().step_by(every.max(1)) {
        let x = area.x(i, times.len());
        let _ = ctx.fill_text(time, x - 15.0, height - 10.0);
    }
}

fn draw_heart_rate(canvas: &HtmlCanvasElement, chart: &HeartRateChart) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let area = PlotArea::new(canvas.width() as f64, canvas.height() as f64);
    let axis = chart.axis;

    let ticks: Vec<(f64, String)> = (0..=4)
        .map(|i| {
            let value = axis.min + i as f64 * (axis.max - axis.min) / 4.0;
            (value, format!("{:.0}", value))
        })
        .collect();
    draw_frame(&ctx, canvas, area, &ticks, axis);

    let count = chart.points.len();
    ctx.set_stroke_style(&HEART_RATE_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, point) in chart.points.iter().enumerate() {
        let (x, y) = (area.x(i, count), area.y(point.rate as f64, axis));
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&HEART_RATE_COLOR.into());
    for (i, point) in chart.points.iter().enumerate() {
        ctx.begin_path();
        let _ = ctx.arc(
            area.x(i, count),
            area.y(point.rate as f64, axis),
            3.0,
            0.0,
            std::f64::consts::PI * 2.0,
        );
        ctx.fill();
    }

    let times: Vec<&str> = chart.points.iter().map(|p| p.time.as_str()).collect();
    draw_time_labels(&ctx, canvas, area, &times, 1);
}

fn draw_hypnogram(canvas: &HtmlCanvasElement, chart: &HypnogramChart) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let area = PlotArea::new(canvas.width() as f64, canvas.height() as f64);
    let axis = chart.axis;

    let ticks: Vec<(f64, String)> = chart
        .stage_labels
        .iter()
        .enumerate()
        .map(|(ordinal, label)| (ordinal as f64, label.clone()))
        .collect();
    draw_frame(&ctx, canvas, area, &ticks, axis);

    let count = chart.points.len();
    let corners: Vec<(f64, f64)> = chart
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (area.x(i, count), area.y(p.stage as f64, axis)))
        .collect();

    ctx.set_stroke_style(&HYPNOGRAM_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, (x, y)) in step_points(&corners).into_iter().enumerate() {
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    // Half-hourly epochs; label the hours only
    let times: Vec<&str> = chart.points.iter().map(|p| p.time.as_str()).collect();
    draw_time_labels(&ctx, canvas, area, &times, 2);
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEART_RATE_AXIS: ChartAxis = ChartAxis { min: 50.0, max: 90.0 };

    #[test]
    fn test_y_clamps_to_axis() {
        let area = PlotArea::new(800.0, 300.0);
        assert_eq!(area.y(90.0, HEART_RATE_AXIS), area.top);
        assert_eq!(area.y(50.0, HEART_RATE_AXIS), area.top + area.height);
        assert_eq!(area.y(120.0, HEART_RATE_AXIS), area.y(90.0, HEART_RATE_AXIS));
        assert_eq!(area.y(20.0, HEART_RATE_AXIS), area.y(50.0, HEART_RATE_AXIS));
    }

    #[test]
    fn test_x_spans_plot() {
        let area = PlotArea::new(800.0, 300.0);
        assert_eq!(area.x(0, 9), area.left);
        assert_eq!(area.x(8, 9), area.left + area.width);
        assert_eq!(area.x(0, 1), area.left);
    }

    #[test]
    fn test_step_points() {
        let steps = step_points(&[(0.0, 1.0), (1.0, 2.0), (2.0, 2.0)]);
        assert_eq!(
            steps,
            vec![(0.0, 1.0), (1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 2.0)]
        );
        assert!(step_points(&[]).is_empty());
    }
}
