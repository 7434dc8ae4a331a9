// Copyright 2020 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
mod logger;

mod chart;
mod config;
mod stats;

use crate::config::Config;
use crate::logger::Logger;
use crate::stats::StatsFile;

use log::{debug, info};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// rendered on every run in addition to the requested statistic
const DEFAULT_STATS: &[&str] = &["Cache Misses", "Evictions Capacity"];

pub fn main() {
    let config = Config::new();

    Logger::new()
        .label("cache_compare")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    info!("cache-compare {} initializing...", VERSION);
    config.print();

    let data1 = load(config.file1());
    let data2 = load(config.file2());

    render(&config, &data1, &data2, config.stat());
    for stat in DEFAULT_STATS {
        if *stat != config.stat() {
            render(&config, &data1, &data2, stat);
        }
    }
}

fn load(path: &str) -> StatsFile {
    let data = stats::parse_stats_file(path).unwrap_or_else(|e| {
        fatal!("failed to read {}: {}", path, e);
    });
    debug!("parsed {} benchmarks from {}", data.len(), path);
    data
}

fn render(config: &Config, data1: &StatsFile, data2: &StatsFile, stat: &str) {
    if let Err(e) = chart::render_comparison(
        data1,
        data2,
        config.name1(),
        config.name2(),
        stat,
        config.use_percentage(),
    ) {
        fatal!("failed to render {}: {}", stat, e);
    }
}
