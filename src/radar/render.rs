//! SVG rendering of a [`RadarChart`]. The geometry is style agnostic; only
//! the spoke layer below differs between [`ChartStyle`]s.

use std::fmt::Write;

use super::error::RadarError;
use super::geometry::{ChartGeometry, ChartStyle, Point, RadarChart, RADIAL_MAX};

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 900.0;
const CENTER_X: f64 = WIDTH / 2.0;
const CENTER_Y: f64 = 440.0;
/// Pixels per score unit.
const SCALE: f64 = 25.0;
const BACKGROUND: &str = "#1e1e1e";
const FOREGROUND: &str = "#ffffff";
const GRID: &str = "#808080";

fn screen(p: Point) -> (f64, f64) {
    (CENTER_X + p.x * SCALE, CENTER_Y - p.y * SCALE)
}

fn anchor_for(x: f64) -> &'static str {
    if x > 0.5 {
        "start"
    } else if x < -0.5 {
        "end"
    } else {
        "middle"
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_svg(chart: &RadarChart) -> Result<String, RadarError> {
    let g = &chart.geometry;
    let mut svg = String::new();

    writeln!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
        w = WIDTH,
        h = HEIGHT
    )?;
    writeln!(svg, r##"  <rect width="100%" height="100%" fill="{}"/>"##, BACKGROUND)?;

    if let Some(title) = &g.title {
        writeln!(
            svg,
            r##"  <text x="{}" y="36" text-anchor="middle" font-size="22" font-weight="bold" fill="{}">{}</text>"##,
            CENTER_X,
            FOREGROUND,
            escape(title)
        )?;
    }

    draw_grid(&mut svg, g)?;

    match g.style {
        ChartStyle::Lollipop => draw_lollipops(&mut svg, g)?,
        ChartStyle::Spoke => draw_spokes(&mut svg, g)?,
        ChartStyle::FilledPolygon => draw_polygon(&mut svg, g)?,
    }

    draw_markers(&mut svg, g)?;
    draw_compass(&mut svg, g)?;
    draw_legend(&mut svg, g)?;

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn draw_grid(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    for &tick in g.radial_ticks.iter().filter(|&&t| t > 0) {
        let r = f64::from(tick) * SCALE;
        writeln!(
            svg,
            r##"  <circle class="grid" cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-opacity="0.3"/>"##,
            CENTER_X, CENTER_Y, r, GRID
        )?;
        writeln!(
            svg,
            r##"  <text x="{}" y="{:.1}" font-size="10" fill="{}">{}</text>"##,
            CENTER_X + 3.0,
            CENTER_Y - r - 2.0,
            FOREGROUND,
            tick
        )?;
    }

    for tick in &g.angular_ticks {
        let (x, y) = screen(g.direction.project(tick.theta, RADIAL_MAX));
        writeln!(
            svg,
            r##"  <line x1="{}" y1="{}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-opacity="0.3"/>"##,
            CENTER_X, CENTER_Y, x, y, GRID
        )?;
        let (lx, ly) = screen(tick.position);
        writeln!(
            svg,
            r##"  <text class="tick" x="{:.2}" y="{:.2}" text-anchor="{}" dominant-baseline="middle" font-size="10" fill="{}">{}</text>"##,
            lx,
            ly,
            anchor_for(tick.position.x),
            FOREGROUND,
            escape(&tick.label)
        )?;
    }
    Ok(())
}

fn draw_lollipops(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    for spoke in &g.spokes {
        let (x, y) = screen(spoke.tip);
        writeln!(
            svg,
            r##"  <line class="bar" x1="{}" y1="{}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="9" stroke-opacity="0.8"/>"##,
            CENTER_X, CENTER_Y, x, y, spoke.color
        )?;
    }
    Ok(())
}

fn draw_spokes(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    for spoke in &g.spokes {
        let (x, y) = screen(spoke.tip);
        writeln!(
            svg,
            r##"  <line class="spoke" x1="{}" y1="{}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2"/>"##,
            CENTER_X, CENTER_Y, x, y, spoke.color
        )?;
    }
    if g.spokes.len() > 1 {
        writeln!(
            svg,
            r##"  <polyline class="outline" points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"##,
            outline_points(g, true),
            FOREGROUND
        )?;
    }
    Ok(())
}

fn draw_polygon(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    writeln!(
        svg,
        r##"  <polygon class="area" points="{}" fill="#4682B4" fill-opacity="0.35" stroke="#4682B4" stroke-width="2"/>"##,
        outline_points(g, false)
    )?;
    Ok(())
}

/// Tip coordinates in angle order; `close` repeats the first point.
fn outline_points(g: &ChartGeometry, close: bool) -> String {
    let mut points: Vec<String> = g
        .spokes
        .iter()
        .map(|s| {
            let (x, y) = screen(s.tip);
            format!("{:.2},{:.2}", x, y)
        })
        .collect();
    if close {
        if let Some(first) = points.first().cloned() {
            points.push(first);
        }
    }
    points.join(" ")
}

fn draw_markers(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    for spoke in &g.spokes {
        let (x, y) = screen(spoke.tip);
        writeln!(
            svg,
            r##"  <circle class="marker" cx="{:.2}" cy="{:.2}" r="5" fill="{}" stroke="{}" stroke-width="2"><title>{}: {}</title></circle>"##,
            x,
            y,
            spoke.color,
            FOREGROUND,
            escape(&spoke.category),
            spoke.score
        )?;
        let (vx, vy) = screen(spoke.value_label.position);
        writeln!(
            svg,
            r##"  <text class="value" x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="10" font-weight="bold" fill="{}">{}</text>"##,
            vx, vy, FOREGROUND, spoke.value_label.text
        )?;
    }
    Ok(())
}

fn draw_compass(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    for label in &g.compass {
        let (x, y) = screen(label.position);
        writeln!(
            svg,
            r##"  <text class="compass" x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="18" font-weight="bold" fill="#87CEEB">{}</text>"##,
            x, y, label.text
        )?;
    }
    Ok(())
}

fn draw_legend(svg: &mut String, g: &ChartGeometry) -> Result<(), RadarError> {
    let top = HEIGHT - 28.0 * g.legend.len() as f64 - 10.0;
    for (i, entry) in g.legend.iter().enumerate() {
        let y = top + 28.0 * i as f64;
        writeln!(
            svg,
            r##"  <rect x="30" y="{}" width="18" height="18" fill="{}" stroke="{}"/>"##,
            y, entry.color, FOREGROUND
        )?;
        writeln!(
            svg,
            r##"  <text x="56" y="{}" font-size="13" fill="{}">{}</text>"##,
            y + 14.0,
            FOREGROUND,
            escape(&entry.label)
        )?;
    }
    Ok(())
}
