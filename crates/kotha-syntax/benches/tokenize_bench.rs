//! Benchmarks for whole-text Kotha tokenization.
//!
//! Run with: cargo bench -p kotha-syntax

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kotha_syntax::{KothaTokenizer, Tokenizer};
use std::hint::black_box;

const SAMPLE: &str = r#"// guessing game
main function {
    dhoro target = random(1, 100);
    dhoro guess = 0;
    /* keep asking
       until correct */
    jotokkhon (guess != target) {
        nao(guess);
        jodi (guess < target) { dekhaw("too low"); }
        noyto (guess > target) { dekhaw("too high"); }
        othoba { dekhaw("correct: \"" + guess + "\""); }
    }
    ferot 0.5;
}
"#;

fn program(lines: usize) -> String {
    SAMPLE.lines().cycle().take(lines).collect::<Vec<_>>().join("\n")
}

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = KothaTokenizer::default();
    let mut group = c.benchmark_group("tokenize");
    for lines in [16, 256, 4096] {
        let text = program(lines);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &text, |b, text| {
            b.iter(|| black_box(tokenizer.tokenize(black_box(text))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
