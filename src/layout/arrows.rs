use egui::{Pos2, Rect};

/// Horizontal clearance that decides which routing topology applies and
/// how far a loopback swings past the bars.
pub const ARROW_PADDING: f32 = 14.0;

/// Corner radius of the rounded elbow.
const CORNER_RADIUS: f32 = 8.0;

/// Vertical clearance under / above a bar before a loopback turns.
const LOOP_CLEARANCE: f32 = 6.0;

/// Quarter-circle sampling resolution.
const ARC_STEPS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowTopology {
    /// Single rounded elbow from the source down (or up) and across to
    /// the target.
    Elbow,
    /// Four-segment detour around the prerequisite bar when the dependent
    /// starts at or before it.
    Loopback,
}

/// A routed dependency connector between two bars. The polyline runs from
/// the prerequisite's right-center to the dependent's left-center.
#[derive(Debug, Clone)]
pub struct ArrowPath {
    pub topology: ArrowTopology,
    pub points: Vec<Pos2>,
}

/// Route the connector between a prerequisite bar and a dependent bar.
///
/// Recomputed from scratch on every call: the applicable topology can flip
/// while the endpoint bars are being dragged across each other.
pub fn route(from: Rect, to: Rect) -> ArrowPath {
    let start = Pos2::new(from.right(), from.center().y);
    let end = Pos2::new(to.left(), to.center().y);

    if to.left() >= from.left() + ARROW_PADDING {
        elbow(start, end)
    } else {
        loopback(from, to, start, end)
    }
}

fn elbow(start: Pos2, end: Pos2) -> ArrowPath {
    let dy = end.y - start.y;
    if dy.abs() <= CORNER_RADIUS {
        // Same display row: a plain horizontal connector.
        return ArrowPath {
            topology: ArrowTopology::Elbow,
            points: vec![start, end],
        };
    }

    // Vertical leg toward the target row, then a quarter circle whose
    // winding follows the travel direction, then the horizontal leg.
    let down = dy > 0.0;
    let sign = if down { 1.0 } else { -1.0 };
    let mut points = vec![start, Pos2::new(start.x, end.y - sign * CORNER_RADIUS)];
    let center = Pos2::new(start.x + CORNER_RADIUS, end.y - sign * CORNER_RADIUS);
    for step in 1..=ARC_STEPS {
        let t = step as f32 / ARC_STEPS as f32 * std::f32::consts::FRAC_PI_2;
        points.push(Pos2::new(
            center.x - CORNER_RADIUS * t.cos(),
            center.y + sign * CORNER_RADIUS * t.sin(),
        ));
    }
    points.push(end);
    ArrowPath {
        topology: ArrowTopology::Elbow,
        points,
    }
}

fn loopback(from: Rect, to: Rect, start: Pos2, end: Pos2) -> ArrowPath {
    let down = end.y >= start.y;
    let clear_y = if down {
        from.bottom() + LOOP_CLEARANCE
    } else {
        from.top() - LOOP_CLEARANCE
    };
    let swing_x = to.left() - ARROW_PADDING;
    let points = vec![
        start,
        Pos2::new(start.x, clear_y),
        Pos2::new(swing_x, clear_y),
        Pos2::new(swing_x, end.y),
        end,
    ];
    ArrowPath {
        topology: ArrowTopology::Loopback,
        points,
    }
}

/// Arrowhead triangle at the path's target anchor, pointing right.
pub fn arrowhead(tip: Pos2, size: f32) -> Vec<Pos2> {
    vec![
        tip,
        Pos2::new(tip.x - size, tip.y - size * 0.6),
        Pos2::new(tip.x - size, tip.y + size * 0.6),
    ]
}
