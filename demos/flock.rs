//! Headless flocking demo.
//!
//! Runs the serial engine, then the GPU engine if an adapter is
//! available, and prints per-flock summary statistics. A renderer would
//! consume the same state this demo prints.
//!
//! Run with: `cargo run --example flock --release [population] [ticks]`

use boidsim::prelude::*;

fn summarize(label: &str, state: &[BoidState]) {
    if state.is_empty() {
        println!("{label}: empty flock");
        return;
    }
    let mean_speed: f32 =
        state.iter().map(|b| b.velocity.length()).sum::<f32>() / state.len() as f32;
    let centroid = state.iter().map(|b| b.position).sum::<Vec2>() / state.len() as f32;
    println!(
        "{label}: {} boids, mean speed {:.6}, centroid ({:+.3}, {:+.3})",
        state.len(),
        mean_speed,
        centroid.x,
        centroid.y
    );
}

fn main() -> Result<(), FlockError> {
    let mut args = std::env::args().skip(1);
    let population: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_POPULATION);
    let ticks: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(240);

    let config = FlockConfig::default();
    println!("=== boidsim demo ===");
    println!("Population: {population}, ticks: {ticks}");
    println!();

    let mut serial = init(Backend::Serial, config, population)?;
    for _ in 0..ticks {
        serial.step();
    }
    summarize("serial", &serial.current_state()?);

    match init(Backend::Gpu, config, population) {
        Ok(mut gpu) => {
            for _ in 0..ticks {
                gpu.step();
            }
            summarize("gpu   ", &gpu.current_state()?);
        }
        Err(e) => println!("gpu   : unavailable ({e})"),
    }

    Ok(())
}
