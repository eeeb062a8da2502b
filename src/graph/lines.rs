use std::f64::consts::PI;

use super::viewport::Viewport;
use crate::config::TOUCHING_CIRCLE_GAP;
use crate::geometry::{ArcSegment, Path, Point};
use crate::layout::{LayoutNode, NodeKey};

const SELF_ARC_START: f64 = PI / 6.0;
const SELF_ARC_END: f64 = -PI * 4.0 / 6.0;
const SELF_ARC_OFFSET: f64 = 1.02;
const SELF_ARC_RADIUS: f64 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Another occurrence of the focused class.
    Same,
    /// Focused class is the subject.
    Right,
    /// Focused class is the object.
    Left,
    Both,
    SelfLoop,
}

impl LineKind {
    pub fn arrow_at_start(self) -> bool {
        self == Self::Both
    }

    pub fn arrow_at_end(self) -> bool {
        self != Self::Same
    }

    pub fn carries_predicates(self) -> bool {
        self != Self::Same
    }
}

/// Partners of the focused node, grouped by how the arrow is drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RelationSets {
    pub same: Vec<NodeKey>,
    pub right: Vec<NodeKey>,
    pub left: Vec<NodeKey>,
    pub both: Vec<NodeKey>,
    pub self_loop: Vec<NodeKey>,
}

impl RelationSets {
    pub fn iter(&self) -> impl Iterator<Item = (LineKind, NodeKey)> + '_ {
        fn group(kind: LineKind, keys: &[NodeKey]) -> impl Iterator<Item = (LineKind, NodeKey)> + '_ {
            keys.iter().map(move |&key| (kind, key))
        }
        group(LineKind::Same, &self.same)
            .chain(group(LineKind::Right, &self.right))
            .chain(group(LineKind::Left, &self.left))
            .chain(group(LineKind::Both, &self.both))
            .chain(group(LineKind::SelfLoop, &self.self_loop))
    }
}

/// Screen-space arrow between the focused node and `partner`.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationLine {
    pub kind: LineKind,
    pub partner: NodeKey,
    pub path: Path,
    /// Marks a centre-to-centre arrow between touching circles, or the
    /// middle of a self loop.
    pub kink: Option<Point>,
}

impl RelationLine {
    /// Where the predicate popup is anchored.
    pub fn anchor(&self) -> Option<Point> {
        self.kink.or_else(|| {
            let points = self.path.flatten(1).into_iter().next()?;
            Some(points.first()?.midpoint(*points.last()?))
        })
    }
}

pub(crate) fn relation_line(
    kind: LineKind,
    focused: &LayoutNode,
    partner: &LayoutNode,
    viewport: &Viewport,
) -> Option<RelationLine> {
    let (start, end, kink) = match kind {
        LineKind::Right | LineKind::Both => directed(focused, partner, viewport, true)?,
        LineKind::Left => directed(partner, focused, viewport, true)?,
        LineKind::Same => directed(focused, partner, viewport, false)?,
        LineKind::SelfLoop => return self_loop(focused, partner, viewport),
    };
    Some(RelationLine {
        kind,
        partner: partner.key,
        path: Path::new(start).line_to(end),
        kink,
    })
}

fn centre(node: &LayoutNode) -> Point {
    Point::new(node.x, node.y)
}

/// Edge to edge, or centre to centre with a kink when the circles touch.
fn directed(
    from: &LayoutNode,
    to: &LayoutNode,
    viewport: &Viewport,
    allow_touching: bool,
) -> Option<(Point, Point, Option<Point>)> {
    let dist = centre(from).distance(centre(to));
    if dist == 0.0 || !dist.is_finite() {
        return None;
    }

    let min_space = TOUCHING_CIRCLE_GAP / viewport.scale;
    if allow_touching && dist < from.r + to.r + min_space {
        let start = viewport.to_screen(centre(from));
        let end = viewport.to_screen(centre(to));
        return Some((start, end, Some(start.midpoint(end))));
    }

    let towards = |origin: &LayoutNode, target: &LayoutNode| {
        let t = origin.r / dist;
        Point::new(
            origin.x + (target.x - origin.x) * t,
            origin.y + (target.y - origin.y) * t,
        )
    };
    Some((
        viewport.to_screen(towards(from, to)),
        viewport.to_screen(towards(to, from)),
        None,
    ))
}

/// Arc hugging `node` from the four o'clock to the eleven o'clock position.
fn self_loop(focused: &LayoutNode, node: &LayoutNode, viewport: &Viewport) -> Option<RelationLine> {
    let r = node.r * SELF_ARC_OFFSET;
    let on_circle = |angle: f64| {
        viewport.to_screen(Point::new(node.x + r * angle.cos(), node.y + r * angle.sin()))
    };
    let start = on_circle(SELF_ARC_START);
    let end = on_circle(SELF_ARC_END);
    let radius = viewport.r(focused.r * SELF_ARC_RADIUS);

    let arc = ArcSegment::from_endpoints(start, end, radius, true, false)?;
    Some(RelationLine {
        kind: LineKind::SelfLoop,
        partner: node.key,
        path: Path::new(start).arc(radius, true, false, end),
        kink: Some(arc.point_at(0.5)),
    })
}
