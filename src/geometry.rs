//! Minimal 2D path model shared by relation arrows and tree connectors.

use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Horizontal(f64),
    Vertical(f64),
    /// Circular arc with SVG endpoint semantics.
    Arc {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new(start: Point) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(start)],
        }
    }

    pub fn line_to(mut self, to: Point) -> Self {
        self.commands.push(PathCommand::LineTo(to));
        self
    }

    pub fn horizontal(mut self, x: f64) -> Self {
        self.commands.push(PathCommand::Horizontal(x));
        self
    }

    pub fn vertical(mut self, y: f64) -> Self {
        self.commands.push(PathCommand::Vertical(y));
        self
    }

    pub fn arc(mut self, radius: f64, large_arc: bool, sweep: bool, to: Point) -> Self {
        self.commands.push(PathCommand::Arc {
            radius,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Same path shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Path {
        let shift = |point: Point| point.offset(dx, dy);
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(point) => PathCommand::MoveTo(shift(point)),
                PathCommand::LineTo(point) => PathCommand::LineTo(shift(point)),
                PathCommand::Horizontal(x) => PathCommand::Horizontal(x + dx),
                PathCommand::Vertical(y) => PathCommand::Vertical(y + dy),
                PathCommand::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => PathCommand::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to: shift(to),
                },
            })
            .collect();
        Path { commands }
    }

    /// Polylines approximating the path, one per `MoveTo`.
    pub fn flatten(&self, arc_segments: usize) -> Vec<Vec<Point>> {
        let mut polylines: Vec<Vec<Point>> = Vec::new();
        let mut cursor = Point::default();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(point) => {
                    cursor = point;
                    polylines.push(vec![point]);
                    continue;
                }
                PathCommand::LineTo(point) => cursor = point,
                PathCommand::Horizontal(x) => cursor = Point::new(x, cursor.y),
                PathCommand::Vertical(y) => cursor = Point::new(cursor.x, y),
                PathCommand::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => {
                    let arc = ArcSegment::from_endpoints(cursor, to, radius, large_arc, sweep);
                    let Some(line) = polylines.last_mut() else {
                        continue;
                    };
                    match arc {
                        Some(arc) => line.extend(arc.sample(arc_segments.max(1)).into_iter().skip(1)),
                        None => line.push(to),
                    }
                    cursor = to;
                    continue;
                }
            }
            if let Some(line) = polylines.last_mut() {
                line.push(cursor);
            }
        }
        polylines
    }

    /// Total drawn length; moves contribute nothing.
    pub fn total_length(&self) -> f64 {
        let mut length = 0.0;
        let mut cursor = Point::default();
        for command in &self.commands {
            let next = match *command {
                PathCommand::MoveTo(point) => {
                    cursor = point;
                    continue;
                }
                PathCommand::LineTo(point) => point,
                PathCommand::Horizontal(x) => Point::new(x, cursor.y),
                PathCommand::Vertical(y) => Point::new(cursor.x, y),
                PathCommand::Arc {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => {
                    length += ArcSegment::from_endpoints(cursor, to, radius, large_arc, sweep)
                        .map_or_else(|| cursor.distance(to), |arc| arc.length());
                    cursor = to;
                    continue;
                }
            };
            length += cursor.distance(next);
            cursor = next;
        }
        length
    }
}

/// Centre parameterisation of an SVG circular arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl ArcSegment {
    /// `None` when the endpoints coincide or the radius is zero.
    pub fn from_endpoints(
        from: Point,
        to: Point,
        radius: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Option<Self> {
        let half_x = (from.x - to.x) / 2.0;
        let half_y = (from.y - to.y) / 2.0;
        let half_sq = half_x * half_x + half_y * half_y;
        if half_sq == 0.0 || radius == 0.0 || !radius.is_finite() {
            return None;
        }

        let radius = radius.abs().max(half_sq.sqrt());
        let sign = if large_arc != sweep { 1.0 } else { -1.0 };
        let coef = sign * ((radius * radius - half_sq) / half_sq).max(0.0).sqrt();
        let cx_local = coef * half_y;
        let cy_local = -coef * half_x;
        let center = Point::new(cx_local + (from.x + to.x) / 2.0, cy_local + (from.y + to.y) / 2.0);

        let start_angle = (half_y - cy_local).atan2(half_x - cx_local);
        let end_angle = (-half_y - cy_local).atan2(-half_x - cx_local);
        let mut sweep_angle = end_angle - start_angle;
        if sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        } else if !sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        }

        Some(Self {
            center,
            radius,
            start_angle,
            sweep_angle,
        })
    }

    pub fn point_at(&self, t: f64) -> Point {
        let angle = self.start_angle + self.sweep_angle * t;
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn sample(&self, segments: usize) -> Vec<Point> {
        (0..=segments)
            .map(|step| self.point_at(step as f64 / segments as f64))
            .collect()
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep_angle.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn straight_path_length() {
        let path = Path::new(Point::new(0.0, 0.0)).horizontal(100.0).vertical(-50.0);
        assert_eq!(path.total_length(), 150.0);
        assert_eq!(
            path.flatten(8),
            vec![vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, -50.0)]]
        );
    }

    #[test]
    fn half_circle_arc() {
        let arc = ArcSegment::from_endpoints(Point::new(-10.0, 0.0), Point::new(10.0, 0.0), 10.0, false, true)
            .unwrap();
        assert!(arc.center.distance(Point::new(0.0, 0.0)) < 1e-9);
        assert!((arc.length() - PI * 10.0).abs() < 1e-9);

        let end = arc.point_at(1.0);
        assert!(end.distance(Point::new(10.0, 0.0)) < 1e-9);
    }

    #[test]
    fn large_arc_takes_the_long_way() {
        let from = Point::new(10.0, 0.0);
        let to = Point::new(0.0, 10.0);
        let small = ArcSegment::from_endpoints(from, to, 10.0, false, true).unwrap();
        let large = ArcSegment::from_endpoints(from, to, 10.0, true, true).unwrap();

        assert!((small.length() - PI * 5.0).abs() < 1e-9);
        assert!((large.length() - PI * 15.0).abs() < 1e-9);
        assert!(large.point_at(1.0).distance(to) < 1e-9);
    }

    #[test]
    fn coincident_arc_endpoints_are_skipped() {
        let point = Point::new(3.0, 4.0);
        assert!(ArcSegment::from_endpoints(point, point, 5.0, true, false).is_none());
        let path = Path::new(point).arc(5.0, true, false, point);
        assert_eq!(path.total_length(), 0.0);
    }

    #[test]
    fn translation_moves_every_command() {
        let path = Path::new(Point::new(0.0, 0.0)).horizontal(10.0).vertical(5.0);
        let moved = path.translated(1.0, 2.0);
        assert_eq!(moved.commands()[0], PathCommand::MoveTo(Point::new(1.0, 2.0)));
        assert_eq!(moved.commands()[1], PathCommand::Horizontal(11.0));
        assert_eq!(moved.commands()[2], PathCommand::Vertical(7.0));
        assert_eq!(moved.total_length(), path.total_length());
    }
}
