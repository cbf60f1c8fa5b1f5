//! Benchmarks for contamination detection and deduplication
//!
//! Run with: cargo bench -p filter

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use filter::{ContaminationDetector, Deduplicator, dedup, strip_gutenberg_boilerplate};
use std::hint::black_box;
use tempus_core::{DedupConfig, Document, Source};

fn generate_passage(idx: usize, variation: usize) -> String {
  let base = format!(
    "It was in the autumn of 1887 that the carriage drew up before the house. \
         This is passage number {} concerning the estate and its tenants. \
         The steward kept careful accounts of every harvest and every rent paid.",
    idx
  );
  if variation > 0 {
    format!("{} A further remark, number {}.", base, variation)
  } else {
    base
  }
}

fn create_documents(count: usize, duplicate_every: usize) -> Vec<Document> {
  (0..count)
    .map(|i| {
      let text = if duplicate_every > 0 && i % duplicate_every == 0 {
        generate_passage(0, 0)
      } else {
        generate_passage(i, 0)
      };
      let source = if i % 2 == 0 { Source::Gutenberg } else { Source::ChroniclingAmerica };
      Document::new(format!("doc-{}", i), text, source)
    })
    .collect()
}

fn bench_classify(c: &mut Criterion) {
  let mut group = c.benchmark_group("classify");
  let Ok(detector) = ContaminationDetector::standard() else {
    return;
  };

  for size in [1_000, 10_000, 100_000].iter() {
    let text = generate_passage(1, 0).repeat(*size / 200 + 1);
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
      b.iter(|| detector.classify_text(black_box(text), black_box(1913)));
    });
  }

  let contaminated = format!("{} The radar station reported at 1944.", generate_passage(2, 0));
  group.bench_function("contaminated", |b| {
    b.iter(|| detector.classify_text(black_box(&contaminated), black_box(1913)));
  });

  group.finish();
}

fn bench_simhash(c: &mut Criterion) {
  let mut group = c.benchmark_group("simhash");

  for size in [100, 500, 1000, 2000].iter() {
    let content = "word ".repeat(*size);
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
      b.iter(|| dedup::simhash(black_box(content)));
    });
  }

  group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
  let mut group = c.benchmark_group("fingerprint");

  for size in [100, 1000, 10_000].iter() {
    let doc = Document::new("bench", "the harvest was plentiful ".repeat(*size / 26 + 1), Source::Gutenberg);
    group.throughput(Throughput::Bytes(doc.text.len() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
      b.iter(|| dedup::fingerprint(black_box(doc)));
    });
  }

  group.finish();
}

fn bench_jaccard_similarity(c: &mut Criterion) {
  let mut group = c.benchmark_group("jaccard_similarity");

  let similar1 = generate_passage(1, 0);
  let similar2 = generate_passage(1, 3);
  group.bench_function("similar_texts", |b| {
    b.iter(|| dedup::jaccard_similarity(black_box(&similar1), black_box(&similar2)));
  });

  let different1 = "The prisoner was indicted for stealing a silver watch";
  let different2 = "Shipping news from the harbour and prices of grain";
  group.bench_function("different_texts", |b| {
    b.iter(|| dedup::jaccard_similarity(black_box(different1), black_box(different2)));
  });

  group.finish();
}

fn bench_dedupe(c: &mut Criterion) {
  let mut group = c.benchmark_group("dedupe");

  for size in [100, 1000, 5000].iter() {
    let documents = create_documents(*size, 10);
    group.bench_with_input(BenchmarkId::new("exact", size), &documents, |b, documents| {
      b.iter(|| dedup::dedupe(black_box(documents.clone())));
    });

    let near = Deduplicator::new(&DedupConfig {
      near_duplicates: true,
      ..Default::default()
    });
    group.bench_with_input(BenchmarkId::new("near", size), &documents, |b, documents| {
      b.iter(|| near.dedupe(black_box(documents.clone())));
    });
  }

  group.finish();
}

fn bench_strip_boilerplate(c: &mut Criterion) {
  let mut group = c.benchmark_group("strip_boilerplate");

  let text = format!(
    "The Project Gutenberg EBook\n*** START OF THIS PROJECT GUTENBERG EBOOK ***\n{}\n*** END OF THIS PROJECT GUTENBERG EBOOK ***\n",
    generate_passage(1, 0).repeat(200)
  );
  group.throughput(Throughput::Bytes(text.len() as u64));
  group.bench_function("book", |b| {
    b.iter(|| strip_gutenberg_boilerplate(black_box(&text)));
  });

  group.finish();
}

criterion_group!(
  benches,
  bench_classify,
  bench_simhash,
  bench_fingerprint,
  bench_jaccard_similarity,
  bench_dedupe,
  bench_strip_boilerplate
);
criterion_main!(benches);
