//! Short-lived visual particles
//!
//! Velocities are pixels per second, gravity pixels per second squared.
//! `life` starts at 1.0 and falls by `decay` per second.

use glam::Vec2;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    /// Radius at full life
    pub size: f32,
    /// 0-1, decreases over time
    pub life: f32,
    /// Life lost per second
    pub decay: f32,
    /// Downward acceleration
    pub gravity: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: [f32; 4], size: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            size,
            life: 1.0,
            decay: 1.0,
            gravity: 0.0,
        }
    }

    /// Fade out over `seconds`
    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.decay = 1.0 / seconds.max(f32::EPSILON);
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Advance by `dt` seconds; returns whether the particle is still alive
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
        self.life -= self.decay * dt;
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Radius and color to draw with; both shrink with life
    pub fn draw_radius(&self) -> f32 {
        self.size * self.life.max(0.0)
    }

    pub fn draw_color(&self) -> [f32; 4] {
        let [r, g, b, a] = self.color;
        [r, g, b, a * self.life.clamp(0.0, 1.0)]
    }
}

/// Bounded particle pool; the oldest particle makes room for a new one
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max: usize,
}

impl ParticleSystem {
    pub fn new(max: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max.min(256)),
            max,
        }
    }

    pub fn spawn(&mut self, particle: Particle) {
        if self.max == 0 {
            return;
        }
        if self.particles.len() >= self.max {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Step every particle and drop the dead ones, keeping spawn order
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.update(dt));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spark(x: f32) -> Particle {
        Particle::new(Vec2::new(x, 0.0), Vec2::ZERO, [1.0; 4], 10.0).with_lifetime(0.5)
    }

    #[test]
    fn test_particle_falls_under_gravity() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(60.0, 0.0), [1.0; 4], 5.0)
            .with_gravity(300.0)
            .with_lifetime(1.0);
        assert!(p.update(0.1));
        assert!((p.pos.x - 6.0).abs() < 1e-4);
        assert!((p.vel.y - 30.0).abs() < 1e-4);
        p.update(0.1);
        assert!(p.pos.y > 0.0);
    }

    #[test]
    fn test_particle_dies_after_lifetime() {
        let mut p = spark(0.0);
        assert!(p.update(0.25));
        assert!((p.draw_radius() - 5.0).abs() < 1e-4);
        assert!(!p.update(0.3));
    }

    #[test]
    fn test_system_evicts_oldest_when_full() {
        let mut system = ParticleSystem::new(3);
        for i in 0..5 {
            system.spawn(spark(i as f32));
        }
        assert_eq!(system.len(), 3);
        let xs: Vec<f32> = system.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_system_with_zero_cap_stays_empty() {
        let mut system = ParticleSystem::new(0);
        system.spawn(spark(0.0));
        assert!(system.is_empty());
    }

    #[test]
    fn test_system_removes_dead_and_keeps_order() {
        let mut system = ParticleSystem::new(10);
        system.spawn(spark(0.0));
        system.spawn(spark(1.0).with_lifetime(2.0));
        system.spawn(spark(2.0).with_lifetime(2.0));
        system.update(0.6);
        let xs: Vec<f32> = system.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    proptest! {
        #[test]
        fn prop_life_strictly_decreases(
            decay in 0.1f32..5.0,
            steps in proptest::collection::vec(0.001f32..0.1, 1..50),
        ) {
            let mut p = spark(0.0).with_decay(decay);
            for dt in steps {
                let before = p.life;
                let alive = p.update(dt);
                prop_assert!(p.life < before);
                prop_assert_eq!(alive, p.life > 0.0);
                if !alive {
                    break;
                }
            }
        }
    }
}
