use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use tempus_core::{DedupConfig, Document};
use tracing::debug;

const FNV_PRIME: u64 = 0x100000001b3;
const FNV_OFFSET: u64 = 0xcbf29ce484222325;

/// SimHash is split into this many 8-bit bands for candidate lookup. Two hashes
/// within Hamming distance 7 always share at least one band.
const SIMHASH_BANDS: usize = 8;

/// Normalized-content signature used as the deduplication key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.0
  }
}

impl std::fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&hex::encode(self.0))
  }
}

/// Collapse whitespace runs to single spaces and lowercase
pub fn normalize(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for word in text.split_whitespace() {
    if !out.is_empty() {
      out.push(' ');
    }
    out.extend(word.chars().flat_map(char::to_lowercase));
  }
  out
}

/// SHA-256 of the normalized text
pub fn fingerprint(document: &Document) -> Fingerprint {
  Fingerprint(Sha256::digest(normalize(&document.text).as_bytes()).into())
}

/// Compute 64-bit SimHash for locality-sensitive hashing
pub fn simhash(text: &str) -> u64 {
  let tokens = tokenize(text);
  let mut vector = [0i32; 64];

  for token in tokens {
    let hash = fnv1a_hash(token);
    for (i, v) in vector.iter_mut().enumerate() {
      if (hash >> i) & 1 == 1 {
        *v += 1;
      } else {
        *v -= 1;
      }
    }
  }

  let mut result = 0u64;
  for (i, &v) in vector.iter().enumerate() {
    if v > 0 {
      result |= 1 << i;
    }
  }
  result
}

/// Compute Hamming distance between two SimHashes
pub fn hamming_distance(a: u64, b: u64) -> u32 {
  (a ^ b).count_ones()
}

/// FNV-1a hash for individual tokens
fn fnv1a_hash(s: &str) -> u64 {
  let mut hash = FNV_OFFSET;
  for byte in s.bytes() {
    hash ^= byte as u64;
    hash = hash.wrapping_mul(FNV_PRIME);
  }
  hash
}

fn tokenize(text: &str) -> Vec<&str> {
  text
    .split(|c: char| !c.is_alphanumeric() && c != '_')
    .filter(|s| s.len() >= 3)
    .collect()
}

/// Compute Jaccard similarity between two texts
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
  let tokens_a: HashSet<&str> = tokenize(a).into_iter().collect();
  let tokens_b: HashSet<&str> = tokenize(b).into_iter().collect();

  if tokens_a.is_empty() && tokens_b.is_empty() {
    return 1.0;
  }

  let intersection = tokens_a.intersection(&tokens_b).count();
  let union = tokens_a.union(&tokens_b).count();

  if union == 0 {
    return 1.0;
  }

  intersection as f32 / union as f32
}

/// Adaptive threshold based on content length
pub fn adaptive_threshold(content_len: usize) -> u32 {
  match content_len {
    0..=50 => 2,
    51..=200 => 3,
    201..=500 => 4,
    _ => 5,
  }
}

fn bands(hash: u64) -> impl Iterator<Item = (usize, u8)> {
  (0..SIMHASH_BANDS).map(move |i| (i, (hash >> (i * 8)) as u8))
}

/// Why a document was dropped
#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateMatch {
  /// Same normalized content
  Exact,
  /// Same document id as an earlier document
  SameId,
  /// SimHash similarity (with distance and Jaccard confirmation)
  Simhash { distance: u32, jaccard: f32 },
  /// No match
  None,
}

impl DuplicateMatch {
  pub fn is_duplicate(&self) -> bool {
    !matches!(self, DuplicateMatch::None)
  }
}

/// Near-duplicate check between two normalized texts
pub struct DuplicateChecker {
  jaccard_threshold: f32,
}

impl Default for DuplicateChecker {
  fn default() -> Self {
    Self::new()
  }
}

impl DuplicateChecker {
  pub fn new() -> Self {
    Self { jaccard_threshold: 0.8 }
  }

  pub fn with_threshold(mut self, threshold: f32) -> Self {
    self.jaccard_threshold = threshold;
    self
  }

  pub fn is_near_duplicate(&self, new_content: &str, new_simhash: u64, existing: &str, existing_simhash: u64) -> DuplicateMatch {
    let distance = hamming_distance(new_simhash, existing_simhash);
    let threshold = adaptive_threshold(new_content.len());

    if distance <= threshold {
      // SimHash collisions are confirmed by token overlap
      let jaccard = jaccard_similarity(new_content, existing);
      if jaccard >= self.jaccard_threshold {
        return DuplicateMatch::Simhash { distance, jaccard };
      }
    }

    DuplicateMatch::None
  }
}

/// Result of a dedup pass
#[derive(Debug, Clone)]
pub struct Deduped {
  /// Survivors, in input order
  pub kept: Vec<Document>,
  pub dropped: usize,
}

/// Per-document data computed in parallel before the sequential pass
struct Signature {
  fingerprint: Fingerprint,
  normalized: Option<String>,
  simhash: u64,
}

/// First-occurrence-wins duplicate removal
///
/// "First" is decided by (source priority, input position), never by which
/// worker finished first, so the result is deterministic under parallelism.
pub struct Deduplicator {
  near_duplicates: bool,
  checker: DuplicateChecker,
}

impl Default for Deduplicator {
  fn default() -> Self {
    Self::new(&DedupConfig::default())
  }
}

impl Deduplicator {
  pub fn new(config: &DedupConfig) -> Self {
    Self {
      near_duplicates: config.near_duplicates,
      checker: DuplicateChecker::new().with_threshold(config.jaccard_threshold),
    }
  }

  pub fn dedupe(&self, documents: Vec<Document>) -> Deduped {
    let signatures: Vec<Signature> = documents
      .par_iter()
      .map(|doc| {
        let normalized = normalize(&doc.text);
        let fingerprint = Fingerprint(Sha256::digest(normalized.as_bytes()).into());
        if self.near_duplicates {
          let simhash = simhash(&normalized);
          Signature {
            fingerprint,
            normalized: Some(normalized),
            simhash,
          }
        } else {
          Signature {
            fingerprint,
            normalized: None,
            simhash: 0,
          }
        }
      })
      .collect();

    let mut order: Vec<usize> = (0..documents.len()).collect();
    order.sort_by_key(|&i| (documents[i].source.priority(), i));

    let mut seen_fingerprints: HashSet<Fingerprint> = HashSet::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut band_index: HashMap<(usize, u8), Vec<usize>> = HashMap::new();
    let mut is_dropped = vec![false; documents.len()];

    for i in order {
      let doc = &documents[i];
      let sig = &signatures[i];

      let verdict = if seen_ids.contains(doc.id.as_str()) {
        DuplicateMatch::SameId
      } else if seen_fingerprints.contains(&sig.fingerprint) {
        DuplicateMatch::Exact
      } else {
        self.near_match(sig, &signatures, &band_index)
      };

      if verdict.is_duplicate() {
        debug!(id = %doc.id, source = %doc.source, ?verdict, "Dropping duplicate");
        is_dropped[i] = true;
        continue;
      }

      seen_ids.insert(doc.id.as_str());
      seen_fingerprints.insert(sig.fingerprint);
      if self.near_duplicates {
        for band in bands(sig.simhash) {
          band_index.entry(band).or_default().push(i);
        }
      }
    }

    let dropped = is_dropped.iter().filter(|d| **d).count();
    let kept = documents
      .into_iter()
      .zip(is_dropped)
      .filter_map(|(doc, is_dropped)| (!is_dropped).then_some(doc))
      .collect();

    Deduped { kept, dropped }
  }

  fn near_match(&self, sig: &Signature, signatures: &[Signature], band_index: &HashMap<(usize, u8), Vec<usize>>) -> DuplicateMatch {
    let Some(content) = sig.normalized.as_deref() else {
      return DuplicateMatch::None;
    };

    let mut candidates: Vec<usize> = bands(sig.simhash)
      .filter_map(|band| band_index.get(&band))
      .flatten()
      .copied()
      .collect();
    candidates.sort_unstable();
    candidates.dedup();

    for j in candidates {
      let other = &signatures[j];
      let Some(existing) = other.normalized.as_deref() else {
        continue;
      };
      let result = self.checker.is_near_duplicate(content, sig.simhash, existing, other.simhash);
      if result.is_duplicate() {
        return result;
      }
    }

    DuplicateMatch::None
  }
}

/// Exact-duplicate removal with default settings: `(kept, dropped_count)`
pub fn dedupe(documents: Vec<Document>) -> (Vec<Document>, usize) {
  let Deduped { kept, dropped } = Deduplicator::default().dedupe(documents);
  (kept, dropped)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempus_core::Source;

  fn doc(id: &str, text: &str, source: Source) -> Document {
    Document::new(id, text, source)
  }

  fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.id.as_str()).collect()
  }

  #[test]
  fn test_simhash_identical() {
    let text = "The quick brown fox jumps over the lazy dog";
    assert_eq!(simhash(text), simhash(text));
  }

  #[test]
  fn test_simhash_similar() {
    let hash1 = simhash("The quick brown fox jumps over the lazy dog");
    let hash2 = simhash("The quick brown fox jumps over a lazy dog");
    let distance = hamming_distance(hash1, hash2);
    assert!(distance < 10, "Distance was {}", distance);
  }

  #[test]
  fn test_hamming_distance() {
    assert_eq!(hamming_distance(0b1010, 0b1010), 0);
    assert_eq!(hamming_distance(0b1010, 0b0101), 4);
  }

  #[test]
  fn test_jaccard_similar() {
    let sim = jaccard_similarity("hello world foo bar", "hello world foo baz");
    assert!(sim > 0.5);
    assert!(sim < 1.0);
  }

  #[test]
  fn test_adaptive_threshold() {
    assert_eq!(adaptive_threshold(10), 2);
    assert_eq!(adaptive_threshold(100), 3);
    assert_eq!(adaptive_threshold(300), 4);
    assert_eq!(adaptive_threshold(1000), 5);
  }

  #[test]
  fn test_normalize() {
    assert_eq!(normalize("  The   KING\n\trode  "), "the king rode");
    assert_eq!(normalize(""), "");
  }

  #[test]
  fn test_fingerprint_ignores_case_and_spacing() {
    let a = doc("a", "The King rode\n to London.", Source::Gutenberg);
    let b = doc("b", "the king   rode to london.", Source::Caselaw);
    let c = doc("c", "the queen rode to london.", Source::Caselaw);
    assert_eq!(fingerprint(&a), fingerprint(&b));
    assert_ne!(fingerprint(&a), fingerprint(&c));
    assert_eq!(fingerprint(&a).to_string().len(), 64);
  }

  #[test]
  fn test_first_occurrence_by_source_priority() {
    let docs = vec![
      doc("news-1", "The harvest was plentiful.", Source::ChroniclingAmerica),
      doc("book-1", "The harvest  was plentiful.", Source::Gutenberg),
      doc("case-1", "The court adjourned.", Source::Caselaw),
    ];
    let (kept, dropped) = dedupe(docs);
    assert_eq!(dropped, 1);
    assert_eq!(ids(&kept), vec!["book-1", "case-1"]);
  }

  #[test]
  fn test_first_occurrence_by_arrival_within_source() {
    let docs = vec![
      doc("a", "Same text.", Source::Oldbailey),
      doc("b", "Same text.", Source::Oldbailey),
      doc("c", "same TEXT.", Source::Oldbailey),
    ];
    let (kept, dropped) = dedupe(docs);
    assert_eq!(dropped, 2);
    assert_eq!(ids(&kept), vec!["a"]);
  }

  #[test]
  fn test_repeated_id_is_dropped() {
    let docs = vec![
      doc("t17800112-1", "First trial text.", Source::Oldbailey),
      doc("t17800112-1", "A different trial text.", Source::Oldbailey),
    ];
    let (kept, dropped) = dedupe(docs);
    assert_eq!(dropped, 1);
    assert_eq!(kept[0].text, "First trial text.");
  }

  #[test]
  fn test_dedupe_is_idempotent() {
    let docs = vec![
      doc("a", "One.", Source::Gutenberg),
      doc("b", "one.", Source::Caselaw),
      doc("c", "Two.", Source::Caselaw),
      doc("c", "Three.", Source::Caselaw),
    ];
    let (kept, dropped) = dedupe(docs);
    assert_eq!(dropped, 2);
    let (again, dropped_again) = dedupe(kept.clone());
    assert_eq!(dropped_again, 0);
    assert_eq!(again, kept);
  }

  #[test]
  fn test_near_duplicates_are_opt_in() {
    let base = "It was the best of times, it was the worst of times, it was the age of wisdom, \
                it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity";
    let variant = format!("{}!", base);
    let docs = vec![doc("a", base, Source::Gutenberg), doc("b", &variant, Source::Gutenberg)];

    let (kept, dropped) = dedupe(docs.clone());
    assert_eq!((kept.len(), dropped), (2, 0));

    let config = DedupConfig {
      near_duplicates: true,
      ..Default::default()
    };
    let result = Deduplicator::new(&config).dedupe(docs);
    assert_eq!(result.dropped, 1);
    assert_eq!(ids(&result.kept), vec!["a"]);

    let again = Deduplicator::new(&config).dedupe(result.kept);
    assert_eq!(again.dropped, 0);
  }

  #[test]
  fn test_near_duplicate_checker_rejects_unrelated() {
    let a = normalize("The user prefers using TypeScript over JavaScript");
    let b = normalize("Database connection pooling configuration settings");
    let checker = DuplicateChecker::new();
    let result = checker.is_near_duplicate(&b, simhash(&b), &a, simhash(&a));
    assert_eq!(result, DuplicateMatch::None);
  }

  #[test]
  fn test_text_is_not_mutated() {
    let docs = vec![doc("a", "  Mixed CASE text  ", Source::Gutenberg)];
    let (kept, _) = dedupe(docs);
    assert_eq!(kept[0].text, "  Mixed CASE text  ");
  }
}
