// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Strategy microbenchmarks.
//!
//! Criterion view of one full pass per strategy at a few buffer sizes, as a
//! cross-check on the harness's own averaged timings.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use readbench_core::Strategy;
use std::time::Duration;

/// Backing file size for every pass.
const FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Buffer sizes to benchmark (in bytes).
const BUFFER_SIZES: &[usize] = &[4096, 65536, 1024 * 1024];

fn bench_full_pass(c: &mut Criterion) {
    let file = tempfile::NamedTempFile::new().expect("Failed to create backing file");
    file.as_file()
        .set_len(FILE_SIZE)
        .expect("Failed to size backing file");

    for strategy in Strategy::defaults() {
        let mut group = c.benchmark_group(strategy.name());
        group.measurement_time(Duration::from_secs(3));
        group.throughput(Throughput::Bytes(FILE_SIZE));

        for &size in BUFFER_SIZES {
            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
                let mut buffer = vec![0u8; size];
                b.iter(|| {
                    let mut handle = strategy
                        .setup(file.path(), size)
                        .expect("Failed to set up strategy");
                    let consumed = handle.run(black_box(&mut buffer)).expect("Pass failed");
                    handle.teardown().expect("Teardown failed");
                    consumed
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench_full_pass);
criterion_main!(benches);
