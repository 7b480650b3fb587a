//! Clipping shapes to the drawing window.
//!
//! Everything is clipped in layer units before the pixel transform, so a
//! vertex never lands further from the canvas than the window margin. Rings
//! go through Sutherland-Hodgman, polylines through Liang-Barsky.

use geo_types::Coord;

use crate::extent::Extent;
use crate::geometry::{Polygon, Shape};

/// Clips `shape` to `window`, or `None` when nothing of it is left.
pub(super) fn clip_shape(shape: &Shape, window: &Extent) -> Option<Shape> {
    match shape {
        Shape::Points(points) => {
            let inside: Vec<_> = points
                .iter()
                .copied()
                .filter(|p| window.contains_point(*p))
                .collect();
            (!inside.is_empty()).then_some(Shape::Points(inside))
        }
        Shape::Lines(lines) => {
            let parts: Vec<_> = lines
                .iter()
                .flat_map(|line| clip_line(line, window))
                .collect();
            (!parts.is_empty()).then_some(Shape::Lines(parts))
        }
        Shape::Polygons(polygons) => {
            let parts: Vec<_> = polygons
                .iter()
                .filter_map(|polygon| clip_polygon(polygon, window))
                .collect();
            (!parts.is_empty()).then_some(Shape::Polygons(parts))
        }
    }
}

fn clip_polygon(polygon: &Polygon, window: &Extent) -> Option<Polygon> {
    let exterior = clip_ring(&polygon.exterior, window)?;
    let holes = polygon
        .holes
        .iter()
        .filter_map(|hole| clip_ring(hole, window))
        .collect();
    Some(Polygon { exterior, holes })
}

/// Clips a ring against the four window edges in turn. The result is closed.
fn clip_ring(ring: &[Coord<f64>], window: &Extent) -> Option<Vec<Coord<f64>>> {
    let open = match ring {
        [first, rest @ .., last] if first == last && !rest.is_empty() => &ring[..ring.len() - 1],
        _ => ring,
    };
    let (west, east) = (window.west(), window.east());
    let (south, north) = (window.south(), window.north());

    let mut output = clip_against_edge(open, |p| p.x >= west, |a, b| at_x(a, b, west));
    output = clip_against_edge(&output, |p| p.x <= east, |a, b| at_x(a, b, east));
    output = clip_against_edge(&output, |p| p.y >= south, |a, b| at_y(a, b, south));
    output = clip_against_edge(&output, |p| p.y <= north, |a, b| at_y(a, b, north));

    let first = *output.first()?;
    if output.len() < 3 {
        return None;
    }
    output.push(first);
    Some(output)
}

fn clip_against_edge<F, I>(ring: &[Coord<f64>], inside: F, intersect: I) -> Vec<Coord<f64>>
where
    F: Fn(&Coord<f64>) -> bool,
    I: Fn(&Coord<f64>, &Coord<f64>) -> Coord<f64>,
{
    let mut output = Vec::with_capacity(ring.len() + 4);
    let Some(mut prev) = ring.last() else {
        return output;
    };
    for current in ring {
        match (inside(prev), inside(current)) {
            (true, true) => output.push(*current),
            (true, false) => output.push(intersect(prev, current)),
            (false, true) => {
                output.push(intersect(prev, current));
                output.push(*current);
            }
            (false, false) => {}
        }
        prev = current;
    }
    output
}

/// Point of segment `a`-`b` on the vertical line `x`. The segment must cross it.
fn at_x(a: &Coord<f64>, b: &Coord<f64>, x: f64) -> Coord<f64> {
    let t = (x - a.x) / (b.x - a.x);
    Coord {
        x,
        y: a.y + t * (b.y - a.y),
    }
}

/// Point of segment `a`-`b` on the horizontal line `y`. The segment must cross it.
fn at_y(a: &Coord<f64>, b: &Coord<f64>, y: f64) -> Coord<f64> {
    let t = (y - a.y) / (b.y - a.y);
    Coord {
        x: a.x + t * (b.x - a.x),
        y,
    }
}

/// Splits a polyline into the runs that lie inside `window`.
fn clip_line(line: &[Coord<f64>], window: &Extent) -> Vec<Vec<Coord<f64>>> {
    let mut parts = Vec::new();
    let mut current: Vec<Coord<f64>> = Vec::new();

    for segment in line.windows(2) {
        match clip_segment(segment[0], segment[1], window) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    flush(&mut parts, &mut current);
                    current.push(start);
                }
                current.push(end);
            }
            None => flush(&mut parts, &mut current),
        }
    }
    flush(&mut parts, &mut current);
    parts
}

fn flush(parts: &mut Vec<Vec<Coord<f64>>>, current: &mut Vec<Coord<f64>>) {
    if current.len() >= 2 {
        parts.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Liang-Barsky. Unclipped endpoints are returned unchanged.
fn clip_segment(
    a: Coord<f64>,
    b: Coord<f64>,
    window: &Extent,
) -> Option<(Coord<f64>, Coord<f64>)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let edges = [
        (-dx, a.x - window.west()),
        (dx, window.east() - a.x),
        (-dy, a.y - window.south()),
        (dy, window.north() - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // parallel to this edge
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let at = |t: f64| Coord {
        x: a.x + t * dx,
        y: a.y + t * dy,
    };
    let start = if t0 > 0.0 { at(t0) } else { a };
    let end = if t1 < 1.0 { at(t1) } else { b };
    Some((start, end))
}
