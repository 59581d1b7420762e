//! d3-style force simulation with alpha cooling.
//!
//! A [`Simulation`] owns the bodies and an ordered set of named forces. Each
//! [`Simulation::tick`] decays alpha toward its target, lets every force
//! adjust velocities, then integrates positions. The simulation stops itself
//! once alpha drops below `alpha_min`; [`Simulation::restart`] resumes it.

use std::f64::consts::PI;

use super::forces::Force;

pub const DEFAULT_ALPHA_MIN: f64 = 0.001;
pub const DEFAULT_VELOCITY_DECAY: f64 = 0.4;

/// Deterministic linear congruential generator used for jiggle.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Default for Lcg {
	fn default() -> Self {
		Self(1)
	}
}

impl Lcg {
	/// Uniform in [0, 1).
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// Tiny non-zero offset used to separate coincident bodies.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// A simulated point: position, velocity and an optional pin.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned coordinates; while set the body ignores forces on that axis.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl Body {
	/// A body the simulation will place on its next `set_bodies`.
	pub fn unplaced() -> Self {
		Self::at(f64::NAN, f64::NAN)
	}

	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	pub fn is_placed(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}

	pub fn pin(&mut self, x: f64, y: f64) {
		self.fx = Some(x);
		self.fy = Some(y);
	}

	pub fn unpin(&mut self) {
		self.fx = None;
		self.fy = None;
	}
}

/// Slot a force is registered under. Setting a slot again replaces its force.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForceSlot {
	Link,
	Charge,
	Center,
	Radial,
	X,
	Y,
}

#[derive(Clone, Debug)]
pub struct Simulation {
	bodies: Vec<Body>,
	forces: Vec<(ForceSlot, Force)>,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	running: bool,
	rng: Lcg,
}

impl Default for Simulation {
	fn default() -> Self {
		Self::new()
	}
}

impl Simulation {
	pub fn new() -> Self {
		Self {
			bodies: Vec::new(),
			forces: Vec::new(),
			alpha: 1.0,
			alpha_min: DEFAULT_ALPHA_MIN,
			alpha_decay: 1.0 - DEFAULT_ALPHA_MIN.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 1.0 - DEFAULT_VELOCITY_DECAY,
			running: true,
			rng: Lcg::default(),
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
		self.bodies.get_mut(index)
	}

	/// Replaces the body set. Unplaced bodies are laid out on a phyllotaxis
	/// spiral around the origin; placed ones keep position and velocity.
	pub fn set_bodies(&mut self, bodies: Vec<Body>) {
		self.bodies = bodies;
		let golden = PI * (3.0 - 5f64.sqrt());
		for (i, body) in self.bodies.iter_mut().enumerate() {
			if let Some(fx) = body.fx {
				body.x = fx;
			}
			if let Some(fy) = body.fy {
				body.y = fy;
			}
			if !body.is_placed() {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden;
				body.x = radius * angle.cos();
				body.y = radius * angle.sin();
			}
			if !body.vx.is_finite() || !body.vy.is_finite() {
				body.vx = 0.0;
				body.vy = 0.0;
			}
		}
		let n = self.bodies.len();
		for (_, force) in &mut self.forces {
			force.initialize(n);
		}
	}

	/// Installs (`Some`) or removes (`None`) the force in `slot`.
	pub fn set_force(&mut self, slot: ForceSlot, force: Option<Force>) {
		let existing = self.forces.iter().position(|(s, _)| *s == slot);
		match (existing, force) {
			(Some(i), Some(mut force)) => {
				force.initialize(self.bodies.len());
				self.forces[i].1 = force;
			}
			(None, Some(mut force)) => {
				force.initialize(self.bodies.len());
				self.forces.push((slot, force));
			}
			(Some(i), None) => {
				self.forces.remove(i);
			}
			(None, None) => {}
		}
	}

	pub fn force(&self, slot: ForceSlot) -> Option<&Force> {
		self.forces.iter().find(|(s, _)| *s == slot).map(|(_, f)| f)
	}

	/// Installed slots in application order.
	pub fn slots(&self) -> Vec<ForceSlot> {
		self.forces.iter().map(|(s, _)| *s).collect()
	}

	/// Hands body-index pairs to the link force, if one is installed.
	pub fn set_links(&mut self, links: Vec<(usize, usize)>) {
		let n = self.bodies.len();
		for (slot, force) in &mut self.forces {
			if let (ForceSlot::Link, Force::Link(link)) = (slot, force) {
				link.set_links(links, n);
				return;
			}
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	pub fn alpha_min(&self) -> f64 {
		self.alpha_min
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// One integration step regardless of the running state.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		for (_, force) in &self.forces {
			force.apply(&mut self.bodies, self.alpha, &mut self.rng);
		}

		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= self.velocity_decay;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= self.velocity_decay;
					body.y += body.vy;
				}
			}
		}
	}

	/// Frame callback: ticks while running and stops once cooled.
	/// Returns whether another frame is wanted.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.alpha_min {
			self.running = false;
		}
		self.running
	}
}
