//! Benchmark: `jsonwatch::StreamParser` over chunked sources
#![allow(missing_docs)]

use std::{cell::Cell, hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::{executor::block_on, stream};
use jsonwatch::{StreamParser, chunk_utils::produce_chunks};

/// A deterministic document of records, at least `target_len` bytes long.
fn make_json_payload(target_len: usize) -> String {
    let mut s = String::from("{\"records\":[");
    let mut i = 0usize;
    while s.len() < target_len {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!(
            "{{\"id\":{i},\"score\":{}.5e-1,\"name\":\"record é {i}\",\"ok\":{},\"tags\":null}}",
            i * 7,
            i % 2 == 0
        ));
        i += 1;
    }
    s.push_str("]}");
    s
}

/// Parses `payload` split into `parts` fragments, optionally watching every
/// record's name, and returns the number of notifications.
fn run_stream_parser(payload: &str, parts: usize, watchers: usize) -> usize {
    let calls = Cell::new(0usize);
    let mut parser = StreamParser::new(stream::iter(produce_chunks(payload, parts)));
    for i in 0..watchers {
        parser.watch(&format!("records.{i}.name"), |_, _| calls.set(calls.get() + 1));
    }
    block_on(parser.run()).unwrap();
    calls.get()
}

fn bench_stream_parser(c: &mut Criterion) {
    let payload = make_json_payload(10_000);

    let mut group = c.benchmark_group("stream_parser_split");

    for &parts in &[1usize, 100, 1_000, 5_000] {
        for &watchers in &[0usize, 10, 100] {
            group.bench_with_input(
                BenchmarkId::new(parts.to_string(), watchers),
                &watchers,
                |b, &w| {
                    b.iter(|| {
                        let count = run_stream_parser(black_box(&payload), parts, w);
                        black_box(count);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_stream_parser
}
criterion_main!(benches);
