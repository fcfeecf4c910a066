//! Round-table layout of a finished seating.
//!
//! Guests are placed at equally spaced points on a circle, in seat
//! order, starting at the top and going clockwise. [`render_svg`] draws
//! the table as a standalone SVG document.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use crate::sa::Seating;

/// One seat on the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatPosition {
    pub name: String,
    /// Angle in radians, measured counter-clockwise from the +x axis.
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

/// Places `names` evenly on a circle of `radius` centred at the origin.
///
/// Uses y-up coordinates. Seat 0 is at the top, and later seats
/// follow clockwise.
pub fn circle_layout<S: AsRef<str>>(names: &[S], radius: f64) -> Vec<SeatPosition> {
    let n = names.len();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
            SeatPosition {
                name: name.as_ref().to_string(),
                angle,
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            }
        })
        .collect()
}

/// Renders a seating as a square SVG image `size` pixels wide.
pub fn render_svg(seating: &Seating, size: u32) -> String {
    let size = f64::from(size.max(100));
    let center = size / 2.0;
    let table_radius = size * 0.28;
    let label_radius = size * 0.40;

    let seats = circle_layout(&seating.guests, table_radius);
    let labels = circle_layout(&seating.guests, label_radius);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"##
    );
    let _ = writeln!(
        svg,
        r##"  <circle cx="{center}" cy="{center}" r="{table_radius:.1}" fill="none" stroke="#888" stroke-width="2"/>"##
    );
    for (seat, label) in seats.iter().zip(&labels) {
        // SVG y grows downwards.
        let (sx, sy) = (center + seat.x, center - seat.y);
        let (lx, ly) = (center + label.x, center - label.y);
        let _ = writeln!(
            svg,
            r##"  <circle cx="{sx:.1}" cy="{sy:.1}" r="{r:.1}" fill="#4a7ab5"/>"##,
            r = size * 0.02
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{lx:.1}" y="{ly:.1}" font-family="sans-serif" font-size="{fs:.0}" text-anchor="middle" dominant-baseline="middle">{name}</text>"##,
            fs = size * 0.03,
            name = escape(&seat.name)
        );
    }
    let _ = writeln!(
        svg,
        r##"  <text x="{center}" y="{center}" font-family="sans-serif" font-size="{fs:.0}" text-anchor="middle">familiarity {score}</text>"##,
        fs = size * 0.035,
        score = seating.score
    );
    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_on_circle_equally_spaced() {
        let names = ["a", "b", "c", "d", "e"];
        let seats = circle_layout(&names, 2.0);
        assert_eq!(seats.len(), 5);
        for s in &seats {
            assert!((s.x.hypot(s.y) - 2.0).abs() < 1e-12);
        }
        for w in seats.windows(2) {
            let gap = (w[0].angle - w[1].angle) - TAU / 5.0;
            assert!(gap.abs() < 1e-12);
        }
        assert_eq!(seats[3].name, "d");
    }

    #[test]
    fn test_first_seat_on_top() {
        let seats = circle_layout(&["x", "y"], 1.0);
        assert!(seats[0].x.abs() < 1e-12 && (seats[0].y - 1.0).abs() < 1e-12);
        assert!((seats[1].y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_svg_lists_guests_in_order() {
        let seating = Seating {
            guests: vec!["Ann".into(), "B<o>".into(), "Cy".into()],
            score: 9.0,
        };
        let svg = render_svg(&seating, 400);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        let ann = svg.find(">Ann<").unwrap();
        let bo = svg.find(">B&lt;o&gt;<").unwrap();
        let cy = svg.find(">Cy<").unwrap();
        assert!(ann < bo && bo < cy);
        assert!(svg.contains("familiarity 9"));
    }
}
