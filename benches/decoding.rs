//! Upstream payload benchmarks
//!
//! Measures the non-I/O work done per relayed request: building the
//! upstream request body and decoding the upstream response.
//!
//! Run with: `cargo bench`

use chat_relay::upstream::{UpstreamOutcome, UpstreamRequest};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn completion_body(content_len: usize) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": "gen-bench",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "x".repeat(content_len) },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    }))
    .expect("bench body should serialize")
}

/// Benchmark decoding of completion and error bodies
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_upstream_response");

    for len in [16, 1_024, 16_384] {
        let body = completion_body(len);
        group.bench_with_input(BenchmarkId::new("completion", len), &body, |b, body| {
            b.iter(|| UpstreamOutcome::from_slice(black_box(body)));
        });
    }

    let error_body = br#"{"error":{"message":"rate limited","code":429}}"#;
    group.bench_function("rejected", |b| {
        b.iter(|| UpstreamOutcome::from_slice(black_box(error_body)));
    });

    group.finish();
}

/// Benchmark serialization of the outbound request body
fn bench_encode(c: &mut Criterion) {
    let message = "Explain the borrow checker in one paragraph.".repeat(8);

    c.bench_function("encode_upstream_request", |b| {
        b.iter(|| {
            let request = UpstreamRequest::user_message("openai/gpt-3.5-turbo", black_box(&*message));
            serde_json::to_vec(&request)
        });
    });
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
