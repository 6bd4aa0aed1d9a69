use criterion::{criterion_group, criterion_main, Criterion};
use docsearch_core::tokenizer::tokenize;
use docsearch_core::{build, search, DocumentStore};

fn sample_text(words: usize) -> String {
    const VOCAB: &[&str] = &["Hello", "world,", "security!", "modern", "is", "important", "in", "the", "42"];
    (0..words).map(|i| VOCAB[i % VOCAB.len()]).collect::<Vec<_>>().join(" ")
}

fn bench_tokenize(c: &mut Criterion) {
    let text = sample_text(10_000);
    c.bench_function("tokenize_10k_words", |b| b.iter(|| tokenize(&text).count()));
}

fn bench_build_and_search(c: &mut Criterion) {
    let mut store = DocumentStore::new();
    for i in 0..1_000 {
        store.insert(format!("doc{i}"), sample_text(200 + i % 50)).expect("ids available");
    }
    c.bench_function("build_1k_docs", |b| b.iter(|| build(&store)));

    let index = build(&store);
    c.bench_function("search_common_term", |b| b.iter(|| search(&index, "security")));
}

criterion_group!(benches, bench_tokenize, bench_build_and_search);
criterion_main!(benches);
