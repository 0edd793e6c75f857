//! Criterion benchmarks for the relay envelope codec.
//!
//! Every relay request pays for two JSON decodes (envelope, then payload) and
//! two JSON encodes on the way back.  These benchmarks track that cost for a
//! small payload and for one sized like a real assistant request.
//!
//! Run with:
//! ```bash
//! cargo bench --package skill-relay-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skill_relay_core::{
    decode_inner_request, decode_request, encode_inner_response, encode_response,
    SkillRequestFrame, SkillResponseFrame,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn small_payload() -> serde_json::Value {
    serde_json::json!({ "x": 1 })
}

/// Roughly the shape and size of an assistant intent request.
fn intent_payload() -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "session": {
            "new": false,
            "sessionId": "amzn1.echo-api.session.0000",
            "application": { "applicationId": "amzn1.ask.skill.0000" },
            "attributes": { "counter": 7, "lastIntent": "AMAZON.HelpIntent" },
            "user": { "userId": "amzn1.ask.account.AAAA" }
        },
        "context": {
            "System": {
                "device": { "deviceId": "amzn1.ask.device.BBBB", "supportedInterfaces": {} },
                "apiEndpoint": "https://api.amazonalexa.com"
            }
        },
        "request": {
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.CCCC",
            "timestamp": "2024-01-01T00:00:00Z",
            "locale": "en-US",
            "intent": {
                "name": "PlayGameIntent",
                "confirmationStatus": "NONE",
                "slots": {
                    "difficulty": { "name": "difficulty", "value": "hard" },
                    "players": { "name": "players", "value": "2" }
                }
            }
        }
    })
}

fn frame_bytes(payload: &serde_json::Value) -> Vec<u8> {
    let frame = SkillRequestFrame::new("1.0", "SkillRequestMessage", "bench", payload.to_string());
    serde_json::to_vec(&frame).expect("fixture frame must serialize")
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// Benchmarks decoding an inbound frame down to the payload value.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_request");
    for (name, payload) in [("small", small_payload()), ("intent", intent_payload())] {
        let bytes = frame_bytes(&payload);
        group.bench_with_input(BenchmarkId::new("payload", name), &bytes, |b, bytes| {
            b.iter(|| {
                let frame = decode_request(black_box(bytes)).unwrap();
                decode_inner_request::<serde_json::Value>(&frame.request_payload).unwrap()
            })
        });
    }
    group.finish();
}

/// Benchmarks encoding a handler result into outbound frame bytes.
fn bench_encode(c: &mut Criterion) {
    let request = SkillRequestFrame::new("1.0", "SkillRequestMessage", "bench", "{}");
    let mut group = c.benchmark_group("encode_response");
    for (name, payload) in [("small", small_payload()), ("intent", intent_payload())] {
        group.bench_with_input(BenchmarkId::new("payload", name), &payload, |b, payload| {
            b.iter(|| {
                let inner = encode_inner_response(black_box(payload)).unwrap();
                encode_response(&SkillResponseFrame::success(&request, inner))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
