use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use normalize_estree::{ConvertOptions, check_and_convert, convert_tree, parse};

const UNIT: &str = r#"
import { readFile } from "fs";

export async function load(paths: string[], limit = 10): Promise<number> {
    let total = 0;
    for (const [i, path] of paths.entries()) {
        if (i >= limit) break;
        const text = await readFile(path, "utf8") as string;
        total += text.split(/\r?\n/g).length;
    }
    return total;
}

export class Counter {
    constructor(count) { this.count = count; }
    get value() { return this.count; }
    *steps(n) { for (let i = 0; i < n; i++) yield `${this.count}:${i}`; }
}
"#;

/// `copies` repetitions of a small module with distinct export names.
fn source(copies: usize) -> String {
    let mut out = String::with_capacity(UNIT.len() * copies);
    for i in 0..copies {
        let unit = UNIT
            .replace("load", &format!("load{}", i))
            .replace("Counter", &format!("Counter{}", i));
        out.push_str(&unit);
    }
    out
}

fn bench_convert(c: &mut Criterion) {
    let options = ConvertOptions::default();
    let mut group = c.benchmark_group("convert");
    for copies in [1, 10, 100] {
        let text = source(copies);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_and_convert", copies), &text, |b, s| {
            b.iter(|| check_and_convert(black_box(s), &options))
        });
        let tree = parse(&text).expect("parse failed");
        group.bench_with_input(BenchmarkId::new("convert_only", copies), &text, |b, s| {
            b.iter(|| convert_tree(&tree, black_box(s), &options))
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let text = source(10);
    let program = check_and_convert(&text, &ConvertOptions::default()).expect("convert failed");
    c.bench_function("serialize_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&program)))
    });
}

criterion_group!(benches, bench_convert, bench_serialize);
criterion_main!(benches);
