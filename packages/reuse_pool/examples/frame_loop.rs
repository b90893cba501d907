//! Example demonstrating a per-frame loop that recycles its short-lived objects.
//!
//! Particles are borrowed from a `PoolRegistry` when spawned and recycled when they expire,
//! and the per-frame list of expired particles is itself recycled via a `ListPool`.

use reuse_pool::{ListPool, PoolRegistry, Poolable, Registration};

#[derive(Debug, Default)]
struct Particle {
    age: u32,
    position: (f32, f32),
}

impl Poolable for Particle {
    fn reset(&mut self) {
        self.age = 0;
        self.position = (0.0, 0.0);
    }
}

const LIFETIME_FRAMES: u32 = 3;
const SPAWN_PER_FRAME: usize = 4;

fn main() {
    println!("=== PoolRegistry: frame loop ===");

    let mut registry = PoolRegistry::new();
    registry.register_with(
        Registration::<Particle>::new()
            .preallocate(SPAWN_PER_FRAME)
            .limit(64),
    );

    let mut lists = ListPool::new();
    let mut alive: Vec<Particle> = Vec::new();

    for frame in 0..10_u16 {
        for _ in 0..SPAWN_PER_FRAME {
            let mut particle = registry.get::<Particle>().unwrap();
            particle.position = (f32::from(frame), 0.0);
            alive.push(particle);
        }

        let mut expired = lists.get::<Particle>();

        for particle in &mut alive {
            particle.age += 1;
        }

        let (done, still_alive): (Vec<_>, Vec<_>) = alive
            .drain(..)
            .partition(|particle| particle.age >= LIFETIME_FRAMES);
        alive = still_alive;
        expired.extend(done);

        let expired_count = expired.len();
        lists.recycle(expired, &mut registry).unwrap();

        println!(
            "frame {frame}: {} alive, {expired_count} expired, {} idle in pool",
            alive.len(),
            registry.pooled_count::<Particle>().unwrap()
        );
    }
}
