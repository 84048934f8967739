use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use studyquiz_core::parser::parse_bank_str;
use studyquiz_core::pool::{normalize_pool, PoolFilter};
use studyquiz_core::sampler::sample_session;

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_bank_toml(5);
    let medium_toml = generate_bank_toml(50);
    let large_toml = generate_bank_toml(200);

    group.bench_function("5_per_type", |b| {
        b.iter(|| parse_bank_str(black_box(&small_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("50_per_type", |b| {
        b.iter(|| parse_bank_str(black_box(&medium_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("200_per_type", |b| {
        b.iter(|| parse_bank_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn bench_normalize_and_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_and_sample");

    let bank = parse_bank_str(&generate_bank_toml(200), "bench.toml".as_ref())
        .expect("generated bank parses");
    let filter = PoolFilter::default();
    let chapter_filter = PoolFilter {
        chapter: Some("Chapter 1".into()),
        ..Default::default()
    };

    group.bench_function("normalize_all", |b| {
        b.iter(|| normalize_pool(black_box(&bank.questions), black_box(&filter)))
    });

    group.bench_function("normalize_chapter", |b| {
        b.iter(|| normalize_pool(black_box(&bank.questions), black_box(&chapter_filter)))
    });

    let pool = normalize_pool(&bank.questions, &filter);
    group.bench_function("sample_10_of_600", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| sample_session(black_box(&pool), 10, &mut rng))
    });

    group.finish();
}

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[subject]
id = "bench"
name = "Benchmark"

[[chapters]]
id = "ch1"
name = "Chapter 1"
order = 1

[[chapters]]
id = "ch2"
name = "Chapter 2"
order = 2
"#,
    );
    for i in 0..n {
        let chapter = if i % 2 == 0 { "Chapter 1" } else { "Chapter 2" };
        s.push_str(&format!(
            r#"
[[text]]
id = "t{i}"
chapter = "{chapter}"
question = "Describe finding {i}"
answer = "finding {i} is described by several words of canonical text"

[[multiple_choice]]
id = "mc{i}"
chapter = "{chapter}"
question = "Pick option for {i}"
options = ["first", "second", "third", "fourth"]
correct_answer = {correct}
explanation = "Option {correct} is right"

[[true_false]]
id = "tf{i}"
chapter = "{chapter}"
question = "Statement {i} holds"
correct_answer = {truth}
"#,
            correct = i % 4,
            truth = i % 2 == 0,
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_normalize_and_sample);
criterion_main!(benches);
