//! Front-chain sibling packing and smallest enclosing circle.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) struct Circle {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) r: f64,
}

impl Circle {
    pub(super) fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }
}

/// Deterministic linear congruential generator used for the enclosing
/// circle shuffle, so identical input always packs identically.
pub(super) struct Lcg {
    state: u64,
}

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub(super) fn new() -> Self {
        Self { state: 1 }
    }

    fn next(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        let mut m = items.len();
        while m > 0 {
            let i = (self.next() * m as f64) as usize;
            m -= 1;
            items.swap(m, i.min(m));
        }
    }
}

/// Packs `circles` around the origin without overlap and returns the radius
/// of the circle enclosing them all.
pub(super) fn pack_siblings(circles: &mut [Circle], rng: &mut Lcg) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let (first, second) = (circles[1], circles[0]);
    place(first, second, &mut circles[2]);

    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b, c) = (0usize, 1usize, 2usize);
    next[a] = b;
    prev[c] = b;
    next[b] = c;
    prev[a] = c;
    next[c] = a;
    prev[b] = a;

    let mut i = 3;
    'pack: while i < n {
        let c = i;
        let (first, second) = (circles[a], circles[b]);
        place(first, second, &mut circles[c]);

        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        let mut best = score(circles, &next, a);
        let mut node = next[c];
        while node != b {
            let candidate = score(circles, &next, node);
            if candidate < best {
                a = node;
                best = candidate;
            }
            node = next[node];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut node = next[b];
    while node != b {
        chain.push(circles[node]);
        node = next[node];
    }
    let enclosing = enclose(chain, rng);

    for circle in circles.iter_mut() {
        circle.x -= enclosing.x;
        circle.y -= enclosing.y;
    }
    enclosing.r
}

fn place(b: Circle, a: Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Smallest circle enclosing every circle of `circles`.
pub(super) fn enclose(mut circles: Vec<Circle>, rng: &mut Lcg) -> Circle {
    rng.shuffle(&mut circles);

    let mut basis: Vec<Circle> = Vec::new();
    let mut enclosing: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        if enclosing.is_some_and(|e| encloses_weak(&e, &p)) {
            i += 1;
            continue;
        }

        let Some(extended) = extend_basis(&basis, p) else {
            tracing::warn!(circles = circles.len(), "degenerate packing geometry, using bounding circle");
            return bounding_circle(&circles);
        };
        basis = extended;
        enclosing = enclose_basis(&basis);
        if enclosing.is_none() {
            return bounding_circle(&circles);
        }
        i = 0;
    }

    enclosing.unwrap_or_default()
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &bi in basis {
        if encloses_not(&p, &bi) && encloses_weak_all(&enclose_basis2(&bi, &p), basis) {
            return Some(vec![bi, p]);
        }
    }

    for (i, &bi) in basis.iter().enumerate() {
        for &bj in &basis[i + 1..] {
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && let Some(e) = enclose_basis3(&bi, &bj, &p)
                && encloses_weak_all(&e, basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Option<Circle> {
    match basis {
        [a] => Some(*a),
        [a, b] => Some(enclose_basis2(a, b)),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => None,
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l == 0.0 {
        return if a.r >= b.r { *a } else { *b };
    }

    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Option<Circle> {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });

    let circle = Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r);
    (circle.x.is_finite() && circle.y.is_finite() && circle.r.is_finite()).then_some(circle)
}

fn bounding_circle(circles: &[Circle]) -> Circle {
    if circles.is_empty() {
        return Circle::default();
    }

    let n = circles.len() as f64;
    let cx = circles.iter().map(|c| c.x).sum::<f64>() / n;
    let cy = circles.iter().map(|c| c.y).sum::<f64>() / n;
    let r = circles
        .iter()
        .map(|c| ((c.x - cx).powi(2) + (c.y - cy).powi(2)).sqrt() + c.r)
        .fold(0.0, f64::max);
    Circle::new(cx, cy, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_enclosed(outer: &Circle, inner: &Circle) {
        let distance = ((outer.x - inner.x).powi(2) + (outer.y - inner.y).powi(2)).sqrt();
        assert!(
            distance + inner.r <= outer.r + 1e-6,
            "{inner:?} escapes {outer:?}"
        );
    }

    #[test]
    fn packed_siblings_do_not_overlap() {
        let mut circles: Vec<Circle> = [1.0, 2.0, 0.5, 3.0, 1.5, 0.7, 2.2]
            .iter()
            .map(|&r| Circle::new(0.0, 0.0, r))
            .collect();
        let radius = pack_siblings(&mut circles, &mut Lcg::new());
        let outer = Circle::new(0.0, 0.0, radius);

        for (i, a) in circles.iter().enumerate() {
            assert_enclosed(&outer, a);
            for b in &circles[i + 1..] {
                let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(distance + 1e-6 >= a.r + b.r);
            }
        }
    }

    #[test]
    fn two_siblings_touch() {
        let mut circles = vec![Circle::new(0.0, 0.0, 1.0), Circle::new(0.0, 0.0, 2.0)];
        assert_eq!(pack_siblings(&mut circles, &mut Lcg::new()), 3.0);
        assert_eq!(circles[0].x, -2.0);
        assert_eq!(circles[1].x, 1.0);
    }

    #[test]
    fn coincident_circles_fail_soft() {
        let same = Circle::new(1.0, 1.0, 2.0);
        assert_eq!(enclose_basis2(&same, &same), same);

        let enclosing = enclose(vec![same, same, same], &mut Lcg::new());
        assert_enclosed(&Circle::new(enclosing.x, enclosing.y, enclosing.r + 1e-6), &same);
    }

    #[test]
    fn lcg_matches_reference_sequence() {
        let mut rng = Lcg::new();
        let first = rng.next();
        assert!((first - (1_015_568_748.0 / 4_294_967_296.0)).abs() < 1e-12);
    }
}
