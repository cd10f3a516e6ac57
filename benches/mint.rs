use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use noid::service::{MintService, Minter, check_digit};
use noid::storage::memory::MemoryStorage;

// Minting from an in-memory minter, one identifier per iteration.
// Masks are wide enough that the stream never runs out during a run.
fn minter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("mint");
    group.throughput(Throughput::Elements(1));

    for template in ["foo.seeeeeeeeee", "foo.reeeeeeeeee", "foo.reeeeeeeeeek", "zeee"] {
        let mut minter = Minter::new(template).unwrap();
        group.bench_function(template, |b| {
            b.iter(|| black_box(minter.mint().unwrap()));
        });
    }

    group.finish();
}

fn check_digit_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_digit");
    let noid = "ark:/13030/foo.reedeedeedeed";
    group.throughput(Throughput::Bytes(noid.len() as u64));

    group.bench_function("compute", |b| {
        b.iter(|| check_digit(black_box(noid)));
    });

    group.finish();
}

// Full load, mint, save cycle against the memory backend.
fn service_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = MintService::new(Arc::new(MemoryStorage::new()));
    rt.block_on(service.init("foo.reeeeeeeeeek")).unwrap();

    let service = &service;

    let mut group = c.benchmark_group("service");
    group.throughput(Throughput::Elements(100));

    group.bench_function("next_100", |b| {
        b.to_async(&rt)
            .iter(|| async move { service.next(100).await.unwrap() });
    });

    group.finish();
}

criterion_group!(benches, minter_benchmark, check_digit_benchmark, service_benchmark);
criterion_main!(benches);
