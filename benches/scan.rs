use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use tailwatch::watcher::contains_keyword;

// A chunk the size of one poll read, with the keyword either absent or
// placed near the end (worst case for the forward scan).
fn make_chunk(len: usize, keyword: Option<&[u8]>) -> Vec<u8> {
    let mut chunk: Vec<u8> = (0..len).map(|i| b'a' + (i % 23) as u8).collect();
    if let Some(keyword) = keyword {
        let at = len - keyword.len();
        chunk[at..].copy_from_slice(keyword);
    }
    chunk
}

fn bench_scan_miss(c: &mut Criterion) {
    let chunk = make_chunk(4096, None);

    let mut group = c.benchmark_group("scan_throughput");
    group.throughput(Throughput::Bytes(chunk.len() as u64));
    group.bench_function("miss_4k", |b| {
        b.iter(|| contains_keyword(black_box(&chunk), black_box(b"ERROR")));
    });
    group.finish();
}

fn bench_scan_hit_at_end(c: &mut Criterion) {
    let chunk = make_chunk(4096, Some(b"ERROR"));

    let mut group = c.benchmark_group("scan_throughput");
    group.throughput(Throughput::Bytes(chunk.len() as u64));
    group.bench_function("hit_at_end_4k", |b| {
        b.iter(|| contains_keyword(black_box(&chunk), black_box(b"ERROR")));
    });
    group.finish();
}

criterion_group!(benches, bench_scan_miss, bench_scan_hit_at_end);
criterion_main!(benches);
