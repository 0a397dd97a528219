use std::fmt::Write;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use lead_inspector::{analysis, csv_codec, sqlite_codec};
use tempfile::TempDir;

fn generate_leads(rows: usize) -> String {
    let mut text = String::from(
        "name,email,company,headline,follower_count,total_posts,heyreach_is_connection",
    );
    for i in 0..rows {
        let headline = if i % 4 == 0 { "" } else { "\"Engineer, Platform\"" };
        let connected = if i % 2 == 0 { "True" } else { "False" };
        write!(
            text,
            "\nLead {i},lead{i}@example.com,Company {c},{headline},{f},{p},{connected}",
            c = i % 50,
            f = i * 7,
            p = i % 5,
        )
        .expect("format row");
    }
    text
}

fn bench_decode_and_analyze(c: &mut Criterion) {
    let text = generate_leads(20_000);

    c.bench_function("csv_decode_20k", |b| {
        b.iter(|| csv_codec::decode(&text).expect("decode"));
    });

    let dataset = csv_codec::decode(&text).expect("decode");
    c.bench_function("analyze_builtin_20k", |b| {
        b.iter(|| analysis::analyze_builtin(&dataset));
    });

    c.bench_function("sqlite_encode_decode_20k", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().expect("temp dir");
                let path = dir.path().join("table.db");
                (dir, path)
            },
            |(_dir, path)| {
                sqlite_codec::encode(&path, &dataset).expect("encode");
                sqlite_codec::decode(&path).expect("decode")
            },
            BatchSize::PerIteration,
        );
    });
}

criterion_group!(benches, bench_decode_and_analyze);
criterion_main!(benches);
