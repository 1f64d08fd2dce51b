use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion, BenchmarkId};

use osprim::OpenFlags;

fn bench_stat(c: &mut Criterion) {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("target").to_str().unwrap().to_owned();
  let handle = osprim::open(&path, OpenFlags::WRITE | OpenFlags::CREATE, 0o644).unwrap();
  osprim::close(handle).unwrap();

  c.bench_function("stat", |b| {
    b.iter(|| black_box(osprim::stat(black_box(&path)).unwrap()));
  });
}

fn bench_write_read(c: &mut Criterion) {
  let mut group = c.benchmark_group("write_read");
  let dir = tempfile::tempdir().unwrap();

  for size in [64usize, 4096, 65536] {
    let path = dir.path().join(format!("rt-{size}")).to_str().unwrap().to_owned();
    let payload = vec![0x5Au8; size];
    let mut back = vec![0u8; size];

    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| {
        let flags = OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE;
        let handle = osprim::open(&path, flags, 0o644).unwrap();
        black_box(osprim::write(handle, &payload).unwrap());
        osprim::close(handle).unwrap();

        let handle = osprim::open(&path, OpenFlags::READ, 0).unwrap();
        black_box(osprim::read(handle, &mut back).unwrap());
        osprim::close(handle).unwrap();
      });
    });
  }

  group.finish();
}

fn bench_getenv(c: &mut Criterion) {
  c.bench_function("getenv_present", |b| {
    b.iter(|| black_box(osprim::getenv(black_box("PATH"))));
  });
  c.bench_function("getenv_absent", |b| {
    b.iter(|| black_box(osprim::getenv(black_box("OSPRIM_BENCH_UNSET"))));
  });
}

criterion_group!(benches, bench_stat, bench_write_read, bench_getenv);
criterion_main!(benches);
