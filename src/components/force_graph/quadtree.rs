//! Barnes-Hut quadtree for many-body repulsion.
//!
//! Each cell stores the summed charge of the points beneath it and their
//! charge-weighted centroid, so distant cells can be treated as one body.

/// Subdivision stops at this depth; deeper points share a leaf.
const MAX_DEPTH: usize = 32;

#[derive(Clone, Debug)]
enum Cell {
	Leaf(Vec<usize>),
	Branch([Option<usize>; 4]),
}

#[derive(Clone, Debug)]
struct Quad {
	x0: f64,
	y0: f64,
	/// Side length of the square cell.
	size: f64,
	/// Charge-weighted centroid.
	cx: f64,
	cy: f64,
	/// Summed charge.
	strength: f64,
	cell: Cell,
}

/// Charge contributions for one body, accumulated into its velocity.
pub struct ChargeQuery<'a> {
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub alpha: f64,
	pub theta2: f64,
	pub distance_min2: f64,
	pub distance_max2: f64,
	pub jiggle: &'a mut dyn FnMut() -> f64,
}

impl Quad {
	fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x0 && x <= self.x0 + self.size && y >= self.y0 && y <= self.y0 + self.size
	}
}

pub struct QuadTree<'p> {
	quads: Vec<Quad>,
	root: Option<usize>,
	points: &'p [(f64, f64)],
	strengths: &'p [f64],
}

impl<'p> QuadTree<'p> {
	/// Builds the tree over `points`, each carrying `strengths[i]`.
	pub fn new(points: &'p [(f64, f64)], strengths: &'p [f64]) -> Self {
		let mut tree = Self {
			quads: Vec::new(),
			root: None,
			points,
			strengths,
		};
		if points.is_empty() {
			return tree;
		}

		let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
		let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		let size = (x1 - x0).max(y1 - y0).max(1e-6);
		let indices: Vec<usize> = (0..points.len()).collect();
		tree.root = Some(tree.build(indices, x0, y0, size, 0));
		tree
	}

	fn build(&mut self, indices: Vec<usize>, x0: f64, y0: f64, size: f64, depth: usize) -> usize {
		let coincident = indices.windows(2).all(|w| self.points[w[0]] == self.points[w[1]]);
		if indices.len() == 1 || coincident || depth >= MAX_DEPTH {
			return self.push_leaf(indices, x0, y0, size);
		}

		let half = size / 2.0;
		let (mx, my) = (x0 + half, y0 + half);
		let mut buckets: [Vec<usize>; 4] = Default::default();
		for i in indices {
			let (x, y) = self.points[i];
			let q = usize::from(x >= mx) | (usize::from(y >= my) << 1);
			buckets[q].push(i);
		}

		let mut children = [None; 4];
		for (q, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			let cx0 = if q & 1 == 1 { mx } else { x0 };
			let cy0 = if q & 2 == 2 { my } else { y0 };
			children[q] = Some(self.build(bucket, cx0, cy0, half, depth + 1));
		}

		let (mut strength, mut weight, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
		for child in children.iter().flatten() {
			let c = &self.quads[*child];
			let w = c.strength.abs();
			strength += c.strength;
			weight += w;
			sx += w * c.cx;
			sy += w * c.cy;
		}
		let (cx, cy) = if weight > 0.0 {
			(sx / weight, sy / weight)
		} else {
			(mx, my)
		};
		self.quads.push(Quad {
			x0,
			y0,
			size,
			cx,
			cy,
			strength,
			cell: Cell::Branch(children),
		});
		self.quads.len() - 1
	}

	fn push_leaf(&mut self, indices: Vec<usize>, x0: f64, y0: f64, size: f64) -> usize {
		let (mut strength, mut weight, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
		for &i in &indices {
			let (x, y) = self.points[i];
			let s = self.strengths[i];
			let w = s.abs();
			strength += s;
			weight += w;
			sx += w * x;
			sy += w * y;
		}
		let (cx, cy) = if weight > 0.0 {
			(sx / weight, sy / weight)
		} else {
			self.points[indices[0]]
		};
		self.quads.push(Quad {
			x0,
			y0,
			size,
			cx,
			cy,
			strength,
			cell: Cell::Leaf(indices),
		});
		self.quads.len() - 1
	}

	/// Velocity change on body `q.index` from every other body.
	pub fn charge_on(&self, q: &mut ChargeQuery<'_>) -> (f64, f64) {
		let mut dv = (0.0, 0.0);
		if let Some(root) = self.root {
			self.visit(root, q, &mut dv);
		}
		dv
	}

	fn visit(&self, id: usize, q: &mut ChargeQuery<'_>, dv: &mut (f64, f64)) {
		let quad = &self.quads[id];
		if quad.strength == 0.0 {
			return;
		}

		// A cell holding the body itself is never collapsed into one charge.
		if !quad.contains(q.x, q.y) {
			let (dx, dy) = (quad.cx - q.x, quad.cy - q.y);
			let l = dx * dx + dy * dy;
			if quad.size * quad.size / q.theta2 < l {
				if l < q.distance_max2 {
					let (dx, dy, l) = separate(dx, dy, l, q);
					let w = quad.strength * q.alpha / l;
					dv.0 += dx * w;
					dv.1 += dy * w;
				}
				return;
			}
		}

		match &quad.cell {
			Cell::Branch(children) => {
				for child in children.iter().flatten() {
					self.visit(*child, q, dv);
				}
			}
			Cell::Leaf(indices) => {
				for &j in indices {
					if j == q.index {
						continue;
					}
					let (px, py) = self.points[j];
					let (dx, dy) = (px - q.x, py - q.y);
					let l = dx * dx + dy * dy;
					if l >= q.distance_max2 {
						continue;
					}
					let (dx, dy, l) = separate(dx, dy, l, q);
					let w = self.strengths[j] * q.alpha / l;
					dv.0 += dx * w;
					dv.1 += dy * w;
				}
			}
		}
	}
}

/// Nudges coincident points apart and softens very short distances.
fn separate(mut dx: f64, mut dy: f64, mut l: f64, q: &mut ChargeQuery<'_>) -> (f64, f64, f64) {
	if dx == 0.0 {
		dx = (q.jiggle)();
		l += dx * dx;
	}
	if dy == 0.0 {
		dy = (q.jiggle)();
		l += dy * dy;
	}
	if l < q.distance_min2 {
		l = (q.distance_min2 * l).sqrt();
	}
	(dx, dy, l)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn query(index: usize, x: f64, y: f64, jiggle: &mut dyn FnMut() -> f64) -> ChargeQuery<'_> {
		ChargeQuery {
			index,
			x,
			y,
			alpha: 1.0,
			theta2: 0.81,
			distance_min2: 1.0,
			distance_max2: f64::INFINITY,
			jiggle,
		}
	}

	#[test]
	fn two_bodies_repel_along_their_axis() {
		let points = [(0.0, 0.0), (10.0, 0.0)];
		let strengths = [-30.0, -30.0];
		let tree = QuadTree::new(&points, &strengths);
		let mut jiggle = || 1e-7;
		let (dvx, dvy) = tree.charge_on(&mut query(0, 0.0, 0.0, &mut jiggle));
		assert!(dvx < 0.0, "body 0 is pushed away from body 1: {dvx}");
		assert!(dvy.abs() < 1e-6);
		let (dvx, _) = tree.charge_on(&mut query(1, 10.0, 0.0, &mut jiggle));
		assert!(dvx > 0.0);
	}

	#[test]
	fn far_cluster_is_approximated_by_its_centroid() {
		let mut points = vec![(0.0, 0.0)];
		points.extend((0..8).map(|i| (1000.0 + i as f64, 1000.0)));
		let strengths = vec![-10.0; points.len()];
		let tree = QuadTree::new(&points, &strengths);
		let mut jiggle = || 1e-7;
		let (approx_x, approx_y) = tree.charge_on(&mut query(0, 0.0, 0.0, &mut jiggle));

		let exact: (f64, f64) = points[1..].iter().fold((0.0, 0.0), |acc, &(x, y)| {
			let l = x * x + y * y;
			(acc.0 + x * -10.0 / l, acc.1 + y * -10.0 / l)
		});
		assert!((approx_x - exact.0).abs() / exact.0.abs() < 0.01);
		assert!((approx_y - exact.1).abs() / exact.1.abs() < 0.01);
	}

	#[test]
	fn coincident_points_are_jiggled_apart() {
		let points = [(5.0, 5.0), (5.0, 5.0)];
		let strengths = [-30.0, -30.0];
		let tree = QuadTree::new(&points, &strengths);
		let mut jiggle = || 1e-7;
		let (dvx, dvy) = tree.charge_on(&mut query(0, 5.0, 5.0, &mut jiggle));
		assert!(dvx.is_finite() && dvy.is_finite());
		assert!(dvx != 0.0 || dvy != 0.0);
	}
}
