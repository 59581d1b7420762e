//! Forces acting on simulation bodies.
//!
//! Semantics follow the d3-force family: link springs, many-body charge,
//! centering, and radial/x/y positioning. All but centering act on velocity
//! scaled by the simulation's alpha.

use super::quadtree::{ChargeQuery, QuadTree};
use super::simulation::{Body, Lcg};

/// Spring pulling linked bodies toward a target distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	pub distance: f64,
	pub iterations: usize,
	links: Vec<(usize, usize)>,
	strengths: Vec<f64>,
	bias: Vec<f64>,
}

impl LinkForce {
	pub fn new(distance: f64) -> Self {
		Self {
			distance,
			iterations: 1,
			links: Vec::new(),
			strengths: Vec::new(),
			bias: Vec::new(),
		}
	}

	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	/// Replaces the links; pairs referring past `n` bodies or to themselves are dropped.
	pub fn set_links(&mut self, links: Vec<(usize, usize)>, n: usize) {
		self.links = links;
		self.initialize(n);
	}

	fn initialize(&mut self, n: usize) {
		self.links.retain(|&(s, t)| s < n && t < n && s != t);
		let mut degree = vec![0usize; n];
		for &(s, t) in &self.links {
			degree[s] += 1;
			degree[t] += 1;
		}
		self.strengths = self
			.links
			.iter()
			.map(|&(s, t)| 1.0 / degree[s].min(degree[t]) as f64)
			.collect();
		self.bias = self
			.links
			.iter()
			.map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
			.collect();
	}

	fn apply(&self, bodies: &mut [Body], alpha: f64, rng: &mut Lcg) {
		for _ in 0..self.iterations {
			for (i, &(s, t)) in self.links.iter().enumerate() {
				let (src, tgt) = (&bodies[s], &bodies[t]);
				let mut x = tgt.x + tgt.vx - src.x - src.vx;
				let mut y = tgt.y + tgt.vy - src.y - src.vy;
				if x == 0.0 {
					x = rng.jiggle();
				}
				if y == 0.0 {
					y = rng.jiggle();
				}
				let mut l = (x * x + y * y).sqrt();
				l = (l - self.distance) / l * alpha * self.strengths[i];
				x *= l;
				y *= l;

				let b = self.bias[i];
				bodies[t].vx -= x * b;
				bodies[t].vy -= y * b;
				bodies[s].vx += x * (1.0 - b);
				bodies[s].vy += y * (1.0 - b);
			}
		}
	}
}

/// Mutual charge between all bodies; negative strength repels.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	pub strength: f64,
	pub theta: f64,
	pub distance_min: f64,
	pub distance_max: f64,
}

impl ManyBodyForce {
	pub fn new(strength: f64) -> Self {
		Self {
			strength,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: f64::INFINITY,
		}
	}

	fn apply(&self, bodies: &mut [Body], alpha: f64, rng: &mut Lcg) {
		let points: Vec<(f64, f64)> = bodies.iter().map(|b| (b.x, b.y)).collect();
		let strengths = vec![self.strength; bodies.len()];
		let tree = QuadTree::new(&points, &strengths);
		let mut jiggle = || rng.jiggle();

		for (i, body) in bodies.iter_mut().enumerate() {
			let mut query = ChargeQuery {
				index: i,
				x: points[i].0,
				y: points[i].1,
				alpha,
				theta2: self.theta * self.theta,
				distance_min2: self.distance_min * self.distance_min,
				distance_max2: self.distance_max * self.distance_max,
				jiggle: &mut jiggle,
			};
			let (dvx, dvy) = tree.charge_on(&mut query);
			body.vx += dvx;
			body.vy += dvy;
		}
	}
}

/// Translates all bodies so their mean position sits on `(x, y)`.
#[derive(Clone, Debug)]
pub struct CenterForce {
	pub x: f64,
	pub y: f64,
	pub strength: f64,
}

impl CenterForce {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y, strength: 1.0 }
	}

	fn apply(&self, bodies: &mut [Body]) {
		if bodies.is_empty() {
			return;
		}
		let n = bodies.len() as f64;
		let (sx, sy) = bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let dx = (sx / n - self.x) * self.strength;
		let dy = (sy / n - self.y) * self.strength;
		for b in bodies {
			b.x -= dx;
			b.y -= dy;
		}
	}
}

/// Pulls bodies toward a circle of `radius` around `(x, y)`.
#[derive(Clone, Debug)]
pub struct RadialForce {
	pub radius: f64,
	pub x: f64,
	pub y: f64,
	pub strength: f64,
}

impl RadialForce {
	pub fn new(radius: f64, x: f64, y: f64) -> Self {
		Self {
			radius,
			x,
			y,
			strength: 0.1,
		}
	}

	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = strength;
		self
	}

	fn apply(&self, bodies: &mut [Body], alpha: f64) {
		for b in bodies {
			let dx = if b.x == self.x { 1e-6 } else { b.x - self.x };
			let dy = b.y - self.y;
			let r = (dx * dx + dy * dy).sqrt();
			let k = (self.radius - r) * self.strength * alpha / r;
			b.vx += dx * k;
			b.vy += dy * k;
		}
	}
}

/// Pulls bodies toward a coordinate on one axis.
#[derive(Clone, Debug)]
pub struct PositionForce {
	pub target: f64,
	pub strength: f64,
}

impl PositionForce {
	pub fn new(target: f64, strength: f64) -> Self {
		Self { target, strength }
	}
}

#[derive(Clone, Debug)]
pub enum Force {
	Link(LinkForce),
	ManyBody(ManyBodyForce),
	Center(CenterForce),
	Radial(RadialForce),
	X(PositionForce),
	Y(PositionForce),
}

impl Force {
	pub(super) fn initialize(&mut self, n: usize) {
		if let Force::Link(link) = self {
			link.initialize(n);
		}
	}

	pub(super) fn apply(&self, bodies: &mut [Body], alpha: f64, rng: &mut Lcg) {
		match self {
			Force::Link(f) => f.apply(bodies, alpha, rng),
			Force::ManyBody(f) => f.apply(bodies, alpha, rng),
			Force::Center(f) => f.apply(bodies),
			Force::Radial(f) => f.apply(bodies, alpha),
			Force::X(f) => {
				for b in bodies {
					b.vx += (f.target - b.x) * f.strength * alpha;
				}
			}
			Force::Y(f) => {
				for b in bodies {
					b.vy += (f.target - b.y) * f.strength * alpha;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bodies(points: &[(f64, f64)]) -> Vec<Body> {
		points.iter().map(|&(x, y)| Body::at(x, y)).collect()
	}

	#[test]
	fn link_pulls_stretched_pair_together() {
		let mut bs = bodies(&[(0.0, 0.0), (200.0, 0.0)]);
		let mut link = LinkForce::new(50.0);
		link.set_links(vec![(0, 1)], 2);
		Force::Link(link).apply(&mut bs, 1.0, &mut Lcg::default());
		assert!(bs[0].vx > 0.0);
		assert!(bs[1].vx < 0.0);
	}

	#[test]
	fn link_strength_uses_smaller_degree() {
		let mut link = LinkForce::new(50.0);
		link.set_links(vec![(0, 1), (0, 2), (0, 3), (9, 0), (2, 2)], 4);
		assert_eq!(link.links(), &[(0, 1), (0, 2), (0, 3)]);
		assert_eq!(link.strengths, vec![1.0, 1.0, 1.0]);
		assert_eq!(link.bias, vec![0.75, 0.75, 0.75]);
	}

	#[test]
	fn center_moves_mean_onto_target() {
		let mut bs = bodies(&[(0.0, 0.0), (10.0, 20.0)]);
		Force::Center(CenterForce::new(100.0, 100.0)).apply(&mut bs, 1.0, &mut Lcg::default());
		let mean_x = (bs[0].x + bs[1].x) / 2.0;
		let mean_y = (bs[0].y + bs[1].y) / 2.0;
		assert!((mean_x - 100.0).abs() < 1e-9);
		assert!((mean_y - 100.0).abs() < 1e-9);
	}

	#[test]
	fn radial_pushes_inner_bodies_outward() {
		let mut bs = bodies(&[(110.0, 100.0), (300.0, 100.0)]);
		Force::Radial(RadialForce::new(100.0, 100.0, 100.0).with_strength(0.5)).apply(
			&mut bs,
			1.0,
			&mut Lcg::default(),
		);
		assert!(bs[0].vx > 0.0, "inside the ring moves out");
		assert!(bs[1].vx < 0.0, "outside the ring moves in");
	}

	#[test]
	fn position_forces_act_per_axis() {
		let mut bs = bodies(&[(0.0, 0.0)]);
		Force::X(PositionForce::new(10.0, 0.02)).apply(&mut bs, 1.0, &mut Lcg::default());
		Force::Y(PositionForce::new(-10.0, 0.05)).apply(&mut bs, 1.0, &mut Lcg::default());
		assert!((bs[0].vx - 0.2).abs() < 1e-12);
		assert!((bs[0].vy + 0.5).abs() < 1e-12);
	}
}
