// Copyright 2020 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Parser for comma-delimited cache benchmark statistics files.
//!
//! The format is line-oriented. The first line is a header and always
//! discarded. A line with at most two fields and a non-empty first field
//! names a benchmark; everything after the first underscore in the name is
//! ignored, so `foo_v2` and `foo_v3` both record under `foo`. A line with
//! three or more fields records a statistic (`name,total,percentage`) for
//! the most recently named benchmark. Anything else is skipped.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::Path;

/// A single named counter for one benchmark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatValue {
    pub total: f64,
    pub percentage: f64,
}

/// Statistics for one benchmark, keyed by statistic name.
pub type BenchmarkRecord = HashMap<String, StatValue>;

/// All benchmarks from one input file, keyed by truncated benchmark name.
pub type StatsFile = BTreeMap<String, BenchmarkRecord>;

pub fn parse_stats_file<P: AsRef<Path>>(path: P) -> io::Result<StatsFile> {
    Ok(parse_stats(&fs::read_to_string(path)?))
}

/// Parse file content into per-benchmark statistics.
///
/// Unparsable numeric fields degrade to `0.0` rather than erroring. This is
/// deliberate: upstream tooling emits placeholders like `N/A` and a lenient
/// zero keeps the remaining columns comparable.
pub fn parse_stats(content: &str) -> StatsFile {
    let mut result = StatsFile::new();
    let mut current: Option<String> = None;

    // skip the header line
    for line in content.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();

        if parts.len() <= 2 && !parts[0].trim().is_empty() {
            let name = match parts[0].find('_') {
                Some(index) => &parts[0][..index],
                None => parts[0],
            };
            // a repeated section for the same truncated name keeps
            // accumulating into the existing record
            result.entry(name.to_string()).or_default();
            current = Some(name.to_string());
        } else if let Some(ref bench) = current {
            if parts.len() < 3 {
                continue;
            }
            let total = parts[1].trim().parse().unwrap_or(0.0);
            let percentage = if parts[2].ends_with('%') {
                parts[2].trim_end_matches('%').trim().parse().unwrap_or(0.0)
            } else {
                parts[2].trim().parse().unwrap_or(0.0)
            };
            result
                .entry(bench.clone())
                .or_default()
                .insert(parts[0].to_string(), StatValue { total, percentage });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(file: &StatsFile, bench: &str, stat: &str) -> StatValue {
        file[bench][stat]
    }

    // `bench_a` and `bench_b` share the prefix `bench`, so both sections
    // land in the same record and the later `Cache Hits` wins
    #[test]
    fn test_parse_basic() {
        let content = "header\n\
                       bench_a\n\
                       Cache Hits,100,80%\n\
                       Cache Misses,20,20%\n\
                       bench_b\n\
                       Cache Hits,50,50%\n";
        let file = parse_stats(content);

        assert_eq!(file.len(), 1);
        assert_eq!(
            value(&file, "bench", "Cache Hits"),
            StatValue {
                total: 50.0,
                percentage: 50.0
            }
        );
        assert_eq!(
            value(&file, "bench", "Cache Misses"),
            StatValue {
                total: 20.0,
                percentage: 20.0
            }
        );
    }

    #[test]
    fn test_truncation_merges_sections() {
        let content = "header\n\
                       foo_v2\n\
                       Cache Hits,100,80%\n\
                       foo_v3\n\
                       Cache Misses,20,20%\n";
        let file = parse_stats(content);

        assert_eq!(file.len(), 1);
        let record = &file["foo"];
        assert_eq!(record.len(), 2);
        assert_eq!(record["Cache Hits"].total, 100.0);
        assert_eq!(record["Cache Misses"].total, 20.0);
    }

    #[test]
    fn test_repeated_statistic_overwrites() {
        let content = "header\n\
                       foo_v2\n\
                       Cache Hits,100,80%\n\
                       foo_v3\n\
                       Cache Hits,110,82%\n";
        let file = parse_stats(content);

        assert_eq!(file["foo"].len(), 1);
        assert_eq!(
            value(&file, "foo", "Cache Hits"),
            StatValue {
                total: 110.0,
                percentage: 82.0
            }
        );
    }

    #[test]
    fn test_numeric_leniency() {
        let content = "header\n\
                       bench\n\
                       Cache Hits,N/A,12.5%\n\
                       Cache Misses,20,garbage\n\
                       Evictions Capacity,5,7\n";
        let file = parse_stats(content);

        assert_eq!(value(&file, "bench", "Cache Hits").total, 0.0);
        assert_eq!(value(&file, "bench", "Cache Hits").percentage, 12.5);
        assert_eq!(value(&file, "bench", "Cache Misses").percentage, 0.0);
        // a bare number without the % suffix is taken as-is
        assert_eq!(value(&file, "bench", "Evictions Capacity").percentage, 7.0);
    }

    #[test]
    fn test_header_discarded_unconditionally() {
        // the first line looks like a valid benchmark name but is dropped
        let content = "bench\nCache Hits,1,1%\n";
        let file = parse_stats(content);
        assert!(file.is_empty());
    }

    #[test]
    fn test_statistic_before_name_ignored() {
        let content = "header\n\
                       Cache Hits,100,80%\n\
                       bench\n\
                       Cache Misses,20,20%\n";
        let file = parse_stats(content);

        assert_eq!(file.len(), 1);
        assert!(!file["bench"].contains_key("Cache Hits"));
        assert!(file["bench"].contains_key("Cache Misses"));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let content = "header\n\n  \nbench\n\nCache Hits,1,2%\n\n";
        let file = parse_stats(content);

        assert_eq!(value(&file, "bench", "Cache Hits").percentage, 2.0);
    }

    #[test]
    fn test_name_line_with_second_field() {
        let content = "header\nbench_a,unused\nCache Hits,1,2%\n";
        let file = parse_stats(content);

        assert!(file.contains_key("bench"));
        assert_eq!(value(&file, "bench", "Cache Hits").total, 1.0);
    }

    #[test]
    fn test_empty_first_field_not_a_name() {
        // fewer than three fields with an empty name matches neither rule
        let content = "header\nbench\n,1\nCache Hits,1,2%\n";
        let file = parse_stats(content);

        assert_eq!(file.len(), 1);
        assert_eq!(file["bench"].len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let content = "header\n\
                       bench_a\n\
                       Cache Hits,100,80%\n\
                       bench_b\n\
                       Cache Hits,50,50%\n";
        assert_eq!(parse_stats(content), parse_stats(content));
    }
}
