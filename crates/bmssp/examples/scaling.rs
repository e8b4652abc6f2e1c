//! Scaling demo for the BMSSP solver
//!
//! Builds graphs of increasing size, solves them with both BMSSP and the
//! reference Dijkstra, and prints a wall-clock scaling table.

use std::time::Instant;

use bmssp::{bmssp_single_source, bmssp_single_source_with, dijkstra, Graph, SolverConfig, INFINITY};

fn main() {
    println!("=== BMSSP scaling demo ===\n");

    sample_distances();

    println!("\n=== Parameter presets ===\n");
    println!("small graphs      k=50   t=1  (level 1 derived)");
    println!("medium graphs     k=100  t=1  (level 2 derived)");
    println!("large graphs      k=200  t=1");
    println!("paper asymptotics SolverConfig::for_size(n)");

    println!("\n=== Scaling ===\n");
    scaling_table();
}

/// Path with long-range chords, deterministic so runs are comparable.
fn chorded_path(n: u64) -> Graph {
    let mut g = Graph::new();
    for v in 0..n - 1 {
        g.add_edge(v, v + 1, 1.0).unwrap();
    }
    for i in (0..n).step_by(10) {
        let j = (i + n / 2) % n;
        if i != j {
            g.add_edge(i, j, 2.5).unwrap();
        }
    }
    g
}

fn sample_distances() {
    let mut g = Graph::new();
    for (u, v, w) in [
        (0, 1, 2.0),
        (0, 2, 5.0),
        (1, 3, 4.0),
        (2, 3, 1.0),
        (1, 4, 1.0),
        (3, 5, 3.0),
        (4, 5, 2.0),
    ] {
        g.add_edge(u, v, w).unwrap();
    }

    let dist = bmssp_single_source(&g, 0, INFINITY).unwrap();
    println!("shortest distances from vertex 0:");
    for v in 0..6 {
        println!("  vertex {v}: {:.0}", dist.get(v));
    }
}

fn scaling_table() {
    println!("n\tbmssp (µs)\tdijkstra (µs)\tpulls\tbase cases");
    println!("----\t----------\t-------------\t-----\t----------");

    for &n in &[200u64, 500, 1000, 2000, 5000] {
        let g = chorded_path(n);
        let config = SolverConfig::for_size(n as usize);

        let start = Instant::now();
        let (dist, stats) = bmssp_single_source_with(&g, 0, INFINITY, &config).unwrap();
        let bmssp_us = start.elapsed().as_micros();

        let start = Instant::now();
        let reference = dijkstra(&g, 0);
        let dijkstra_us = start.elapsed().as_micros();

        // Sanity: the demo is worthless if the answers drift apart.
        for v in 0..n {
            assert!((dist.get(v) - reference.get(v)).abs() < 1e-9);
        }

        println!(
            "{n}\t{bmssp_us}\t\t{dijkstra_us}\t\t{}\t{}",
            stats.pulls, stats.basecase_calls
        );
    }
}
