//! Example demonstrating a `SyncPoolRegistry` shared between worker threads.

use std::thread;

use reuse_pool::{Poolable, Registration, SyncPoolRegistry};

#[derive(Default)]
struct Buffer {
    bytes: Vec<u8>,
}

impl Poolable for Buffer {
    fn reset(&mut self) {
        // Keep the allocation, drop the contents.
        self.bytes.clear();
    }
}

fn main() {
    println!("=== SyncPoolRegistry: shared between threads ===");

    let registry = SyncPoolRegistry::new();
    registry.register_with(Registration::<Buffer>::new().preallocate(8).limit(32));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let registry = registry.clone();

            thread::spawn(move || {
                for message in 0..1000 {
                    let mut buffer = registry.get::<Buffer>().unwrap();
                    buffer
                        .bytes
                        .extend_from_slice(format!("worker {worker} message {message}").as_bytes());
                    registry.recycle(buffer).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    println!(
        "Idle buffers after all workers finished: {}",
        registry.pooled_count::<Buffer>().unwrap()
    );
}
