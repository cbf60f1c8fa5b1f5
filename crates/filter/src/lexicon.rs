//! Static lexicon backing the contamination detectors.
//!
//! Terms carry the year they were first attested in the sense that matters
//! (the event, person, invention or coinage). A term is anachronistic for a
//! cutoff when `first_use > cutoff`, so one table serves every cutoff year.
//!
//! Coverage is deliberately incomplete: text describing a later era without
//! any listed term or explicit date passes the detectors. Bump
//! [`LEXICON_VERSION`] whenever entries change so manifests record which table
//! filtered them.

use serde::Serialize;

pub const LEXICON_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermCategory {
  Event,
  Person,
  Technology,
  Concept,
}

impl TermCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      TermCategory::Event => "event",
      TermCategory::Person => "person",
      TermCategory::Technology => "technology",
      TermCategory::Concept => "concept",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexiconEntry {
  /// Lowercase; words separated by single spaces
  pub term: &'static str,
  pub first_use: i32,
  pub category: TermCategory,
}

const fn entry(term: &'static str, first_use: i32, category: TermCategory) -> LexiconEntry {
  LexiconEntry {
    term,
    first_use,
    category,
  }
}

use TermCategory::{Concept, Event, Person, Technology};

static TERMS: &[LexiconEntry] = &[
  // Events
  entry("world war", 1914, Event),
  entry("world war i", 1939, Event),
  entry("world war 1", 1939, Event),
  entry("wwi", 1939, Event),
  entry("world war ii", 1939, Event),
  entry("world war 2", 1939, Event),
  entry("wwii", 1941, Event),
  entry("second world war", 1939, Event),
  entry("russian revolution", 1917, Event),
  entry("bolshevik revolution", 1917, Event),
  entry("league of nations", 1918, Event),
  entry("great depression", 1930, Event),
  entry("attack on pearl harbor", 1941, Event),
  entry("wright brothers", 1903, Event),
  entry("d-day", 1918, Event),
  entry("cold war", 1945, Event),
  entry("korean war", 1950, Event),
  entry("vietnam war", 1955, Event),
  entry("bay of pigs", 1961, Event),
  entry("cuban missile crisis", 1962, Event),
  entry("moon landing", 1960, Event),
  entry("apollo 11", 1969, Event),
  entry("sputnik", 1957, Event),
  // People
  entry("adolf hitler", 1920, Person),
  entry("hitler", 1920, Person),
  entry("benito mussolini", 1914, Person),
  entry("mussolini", 1914, Person),
  entry("joseph stalin", 1917, Person),
  entry("stalin", 1917, Person),
  entry("albert einstein", 1905, Person),
  entry("fdr", 1932, Person),
  entry("mao zedong", 1927, Person),
  entry("mao tse-tung", 1927, Person),
  entry("fidel castro", 1953, Person),
  entry("john f. kennedy", 1946, Person),
  entry("john f kennedy", 1946, Person),
  entry("jfk", 1960, Person),
  entry("martin luther king jr", 1955, Person),
  entry("nelson mandela", 1952, Person),
  // Technology
  entry("telephone", 1876, Technology),
  entry("phonograph", 1877, Technology),
  entry("typewriter", 1868, Technology),
  entry("electric light", 1878, Technology),
  entry("light bulb", 1879, Technology),
  entry("incandescent lamp", 1879, Technology),
  entry("gramophone", 1887, Technology),
  entry("automobile", 1895, Technology),
  entry("motor car", 1895, Technology),
  entry("internal combustion engine", 1884, Technology),
  entry("x-ray", 1896, Technology),
  entry("moving picture", 1896, Technology),
  entry("cinema", 1899, Technology),
  entry("wireless telegraphy", 1898, Technology),
  entry("aeroplane", 1903, Technology),
  entry("airplane", 1907, Technology),
  entry("radio", 1907, Technology),
  entry("atomic bomb", 1914, Technology),
  entry("radio broadcast", 1920, Technology),
  entry("television", 1927, Technology),
  entry("penicillin", 1929, Technology),
  entry("nylon", 1938, Technology),
  entry("radar", 1940, Technology),
  entry("jet engine", 1943, Technology),
  entry("jet aircraft", 1944, Technology),
  entry("antibiotic", 1944, Technology),
  entry("nuclear weapon", 1945, Technology),
  entry("electronic computer", 1946, Technology),
  entry("tv set", 1946, Technology),
  entry("hydrogen bomb", 1947, Technology),
  entry("transistor", 1948, Technology),
  entry("laser", 1960, Technology),
  entry("microchip", 1965, Technology),
  entry("internet", 1974, Technology),
  entry("e-mail", 1979, Technology),
  entry("email", 1979, Technology),
  entry("website", 1993, Technology),
  entry("smartphone", 1997, Technology),
  // Concepts
  entry("electron", 1891, Concept),
  entry("radioactivity", 1896, Concept),
  entry("theory of relativity", 1906, Concept),
  entry("soviet", 1917, Concept),
  entry("bolshevism", 1917, Concept),
  entry("fascism", 1921, Concept),
  entry("fascist", 1921, Concept),
  entry("soviet union", 1922, Concept),
  entry("ussr", 1922, Concept),
  entry("quantum mechanics", 1925, Concept),
  entry("nazi", 1930, Concept),
  entry("nazism", 1934, Concept),
  entry("existentialism", 1941, Concept),
  entry("united nations", 1942, Concept),
  entry("genocide", 1944, Concept),
];

/// Structural pattern classes, cutoff-independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
  YearReference,
  ModernDate,
  UrlOrEmail,
  ModernCurrency,
  ModernAnnotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEntry {
  /// Human-readable name used in reasons
  pub label: &'static str,
  pub pattern: &'static str,
  pub category: PatternCategory,
}

const fn pattern(label: &'static str, pattern: &'static str, category: PatternCategory) -> PatternEntry {
  PatternEntry {
    label,
    pattern,
    category,
  }
}

/// Standalone 4-digit ASCII token; range filtering happens in the detector
pub static YEAR_TOKEN: PatternEntry = pattern("year reference", r"\b([0-9]{4})\b", PatternCategory::YearReference);

static ARTIFACTS: &[PatternEntry] = &[
  pattern("url", r"(?i)\bhttps?://|\bwww\.[a-z0-9-]+\.", PatternCategory::UrlOrEmail),
  pattern(
    "email address",
    r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}",
    PatternCategory::UrlOrEmail,
  ),
  pattern(
    "web domain",
    r"(?i)\b[a-z0-9-]+\.(?:com|org|net|gov|edu)\b",
    PatternCategory::UrlOrEmail,
  ),
  pattern("iso date", r"\b[0-9]{4}-[0-9]{2}-[0-9]{2}\b", PatternCategory::ModernDate),
  pattern(
    "numeric date",
    r"\b[0-9]{1,2}/[0-9]{1,2}/(?:19|20)[0-9]{2}\b",
    PatternCategory::ModernDate,
  ),
  pattern("currency amount", r"\$[0-9]{1,3}(?:,[0-9]{3})+", PatternCategory::ModernCurrency),
];

static ANNOTATIONS: &[PatternEntry] = &[
  pattern(
    "editorial note",
    r"(?i)\[\s*(?:transcriber'?s?|editor'?s?|ed\.)\s*note",
    PatternCategory::ModernAnnotation,
  ),
  pattern("copyright notice", r"(?i)©|\bcopyright\s*\(c\)", PatternCategory::ModernAnnotation),
  pattern(
    "citation residue",
    r"(?i)\b(?:retrieved\s+from|accessed\s+on)\b",
    PatternCategory::ModernAnnotation,
  ),
  pattern("digitization credit", r"(?i)\bdigiti[sz]ed\s+by\b", PatternCategory::ModernAnnotation),
  pattern(
    "proofreading credit",
    r"(?i)\bdistributed\s+proofread(?:ers|ing)\b",
    PatternCategory::ModernAnnotation,
  ),
];

/// Header that marks a Project Gutenberg edition
pub const GUTENBERG_HEADER: &str = "project gutenberg";

/// Markers of a modern introduction or apparatus in a Gutenberg edition
static EDITION_MARKERS: &[&str] = &[
  "introduction by",
  "edited by",
  "annotated by",
  "foreword by",
  "notes by",
];

/// Versioned term table plus the structural pattern tables
#[derive(Debug, Clone)]
pub struct Lexicon {
  version: u32,
  terms: Vec<LexiconEntry>,
}

impl Default for Lexicon {
  fn default() -> Self {
    Self::standard()
  }
}

impl Lexicon {
  /// The built-in table
  pub fn standard() -> Self {
    Self {
      version: LEXICON_VERSION,
      terms: TERMS.to_vec(),
    }
  }

  /// Custom term table (patterns stay built-in)
  pub fn from_entries(version: u32, terms: Vec<LexiconEntry>) -> Self {
    Self { version, terms }
  }

  pub fn version(&self) -> u32 {
    self.version
  }

  pub fn terms(&self) -> &[LexiconEntry] {
    &self.terms
  }

  /// Entries that fire for `cutoff_year`, in declaration order
  pub fn anachronisms_for(&self, cutoff_year: i32) -> impl Iterator<Item = &LexiconEntry> {
    self.terms.iter().filter(move |e| e.first_use > cutoff_year)
  }

  pub fn year_token(&self) -> &'static PatternEntry {
    &YEAR_TOKEN
  }

  pub fn artifacts(&self) -> &'static [PatternEntry] {
    ARTIFACTS
  }

  pub fn annotations(&self) -> &'static [PatternEntry] {
    ANNOTATIONS
  }

  pub fn edition_markers(&self) -> &'static [&'static str] {
    EDITION_MARKERS
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn test_terms_are_normalized() {
    for entry in TERMS {
      assert_eq!(entry.term, entry.term.to_lowercase(), "{} must be lowercase", entry.term);
      assert_eq!(entry.term, entry.term.trim());
      assert!(!entry.term.contains("  "), "{} has a double space", entry.term);
    }
  }

  #[test]
  fn test_terms_are_unique() {
    let mut seen = HashSet::new();
    for entry in TERMS {
      assert!(seen.insert(entry.term), "duplicate term {}", entry.term);
    }
  }

  #[test]
  fn test_anachronisms_follow_earliest_use_rule() {
    let lexicon = Lexicon::standard();
    let for_1913: Vec<_> = lexicon.anachronisms_for(1913).map(|e| e.term).collect();
    assert!(for_1913.contains(&"hitler"));
    assert!(!for_1913.contains(&"telephone"));

    assert!(for_1913.contains(&"television"));
    assert!(for_1913.contains(&"john f kennedy"));
    assert!(!for_1913.contains(&"albert einstein"));

    let for_1900: Vec<_> = lexicon.anachronisms_for(1900).map(|e| e.term).collect();
    assert!(for_1900.contains(&"wright brothers"));
    assert!(for_1900.contains(&"albert einstein"));

    let for_1850: Vec<_> = lexicon.anachronisms_for(1850).map(|e| e.term).collect();
    assert!(for_1850.contains(&"telephone"));
    assert!(for_1850.len() > for_1913.len());
  }

  #[test]
  fn test_lowering_cutoff_never_shrinks_the_set() {
    let lexicon = Lexicon::standard();
    let mut previous: HashSet<&str> = lexicon.anachronisms_for(2000).map(|e| e.term).collect();
    for cutoff in (1800..2000).rev().step_by(7) {
      let current: HashSet<&str> = lexicon.anachronisms_for(cutoff).map(|e| e.term).collect();
      assert!(previous.is_subset(&current), "cutoff {} dropped terms", cutoff);
      previous = current;
    }
  }
}
