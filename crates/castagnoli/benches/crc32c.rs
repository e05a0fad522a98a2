//! CRC32C benchmarks.
//!
//! Run: `cargo bench -p castagnoli`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p castagnoli`

use castagnoli::{Engine, bitwise};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const SIZES: [usize; 7] = [64, 256, 1024, 4096, 16384, 65536, 1048576];

/// Smaller sizes for the table-less path.
const BITWISE_SIZES: [usize; 4] = [16, 64, 256, 1024];

fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32c/dispatch");
  eprintln!("crc32c selection: {}", castagnoli::introspect::selection());

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(castagnoli::value(data)));
    });
  }

  group.finish();
}

/// Every engine this machine can run, bypassing the cached selection.
fn bench_engines(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32c/engines");

  for engine in Engine::available() {
    let name = engine.name().to_string();
    for size in SIZES {
      let data = vec![0xA5u8; size];
      group.throughput(Throughput::Bytes(size as u64));
      group.bench_with_input(BenchmarkId::new(&name, size), &data, |b, data| {
        b.iter(|| core::hint::black_box(engine.extend(0, data)));
      });
    }
  }

  group.finish();
}

fn bench_bitwise(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32c/bitwise");

  for size in BITWISE_SIZES {
    let data = vec![0xABu8; size];
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(!bitwise::compute(!0, data)));
    });
  }

  group.finish();
}

/// Reference crate for comparison.
fn bench_crc32c_crate(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32c/crc32c-crate");

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(crc32c::crc32c(data)));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_dispatch, bench_engines, bench_bitwise, bench_crc32c_crate);
criterion_main!(benches);
