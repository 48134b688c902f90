//! Walkthrough of the basic map operations, printing the level layout.
//!
//! Run with:
//!   RUST_LOG=nexus_skipmap=trace cargo run --features demo --bin skipmap_demo

use nexus_skipmap::SkipMap;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let map: SkipMap<i64, String> = SkipMap::new();
    map.insert(1, "one".into());
    map.insert(3, "three".into());
    map.insert(25, "twenty-five".into());
    map.insert(15, "fifteen".into());
    map.insert(5, "five".into());
    print!("{map}");

    for key in [15, 100] {
        match map.get(&key) {
            Some(value) => println!("Searching for {key}: {value}"),
            None => println!("Searching for {key}: not found"),
        }
    }

    for key in [3, 25] {
        println!("Deleting {key}: {}", map.delete(&key));
    }

    println!("After deletions (size {}):", map.len());
    print!("{map}");

    if let Err(err) = map.verify() {
        eprintln!("integrity check failed: {err}");
        std::process::exit(1);
    }
}
