//! Temporal contamination detection.
//!
//! Four independent detectors run over a document's text and their findings
//! are unioned. A document is contaminated if any detector fires. Reasons are
//! reported in detector order (terms, years, artifacts, annotations) and by
//! first match position within each detector.

use crate::lexicon::{GUTENBERG_HEADER, Lexicon, PatternEntry};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tempus_core::{ContaminationResult, DetectorConfig, Document, Error, Result};

/// What one detector saw at one position
struct Finding {
  position: usize,
  reason: String,
  term: Option<&'static str>,
  year: Option<i32>,
}

impl Finding {
  fn at(position: usize, reason: String) -> Self {
    Self {
      position,
      reason,
      term: None,
      year: None,
    }
  }
}

struct CompiledTerm {
  term: &'static str,
  first_use: i32,
  regex: Regex,
}

struct CompiledPattern {
  label: &'static str,
  regex: Regex,
}

/// Compiled detectors for one lexicon and configuration
///
/// Construction compiles every pattern once; `classify` is then a pure
/// function of its inputs and safe to call from many threads.
pub struct ContaminationDetector {
  lexicon_version: u32,
  config: DetectorConfig,
  terms: Vec<CompiledTerm>,
  year: Regex,
  artifacts: Vec<CompiledPattern>,
  annotations: Vec<CompiledPattern>,
  edition_markers: Vec<CompiledPattern>,
}

fn compile(pattern: &str) -> Result<Regex> {
  Regex::new(pattern).map_err(|e| Error::Pattern(format!("{}: {}", pattern, e)))
}

/// Whole-word, case-insensitive; inner spaces match any whitespace run
fn term_pattern(term: &str) -> String {
  let words: Vec<String> = term.split(' ').map(regex::escape).collect();
  format!(r"\b{}\b", words.join(r"\s+"))
}

fn compile_term(term: &str) -> Result<Regex> {
  RegexBuilder::new(&term_pattern(term))
    .case_insensitive(true)
    .build()
    .map_err(|e| Error::Pattern(format!("{}: {}", term, e)))
}

fn compile_patterns(entries: &[PatternEntry]) -> Result<Vec<CompiledPattern>> {
  entries
    .iter()
    .map(|e| {
      Ok(CompiledPattern {
        label: e.label,
        regex: compile(e.pattern)?,
      })
    })
    .collect()
}

/// The first `chars` characters of `text`
fn prefix(text: &str, chars: usize) -> &str {
  match text.char_indices().nth(chars) {
    Some((end, _)) => &text[..end],
    None => text,
  }
}

impl ContaminationDetector {
  pub fn new(lexicon: &Lexicon, config: DetectorConfig) -> Result<Self> {
    let terms = lexicon
      .terms()
      .iter()
      .map(|e| {
        Ok(CompiledTerm {
          term: e.term,
          first_use: e.first_use,
          regex: compile_term(e.term)?,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    let edition_markers = lexicon
      .edition_markers()
      .iter()
      .map(|marker| {
        Ok(CompiledPattern {
          label: *marker,
          regex: compile_term(marker)?,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      lexicon_version: lexicon.version(),
      config,
      terms,
      year: compile(lexicon.year_token().pattern)?,
      artifacts: compile_patterns(lexicon.artifacts())?,
      annotations: compile_patterns(lexicon.annotations())?,
      edition_markers,
    })
  }

  /// Built-in lexicon with default settings
  pub fn standard() -> Result<Self> {
    Self::new(&Lexicon::standard(), DetectorConfig::default())
  }

  pub fn lexicon_version(&self) -> u32 {
    self.lexicon_version
  }

  pub fn classify(&self, document: &Document, cutoff_year: i32) -> ContaminationResult {
    self.classify_text(&document.text, cutoff_year)
  }

  /// Empty or whitespace-only text is absence of evidence, not contamination
  pub fn classify_text(&self, text: &str, cutoff_year: i32) -> ContaminationResult {
    if text.trim().is_empty() {
      return ContaminationResult::clean();
    }

    let detectors = [
      self.scan_terms(text, cutoff_year),
      self.scan_years(text, cutoff_year),
      self.scan_artifacts(text),
      self.scan_annotations(text),
    ];

    let mut result = ContaminationResult::clean();
    let mut seen_reasons = HashSet::new();

    for mut findings in detectors {
      findings.sort_by_key(|f| f.position);
      for finding in findings {
        if let Some(term) = finding.term {
          result.matched_terms.insert(term.to_string());
        }
        if let Some(year) = finding.year {
          result.matched_years.insert(year);
        }
        if seen_reasons.insert(finding.reason.clone()) {
          result.reasons.push(finding.reason);
        }
      }
    }

    result.is_contaminated = !result.reasons.is_empty();
    result
  }

  fn scan_terms(&self, text: &str, cutoff_year: i32) -> Vec<Finding> {
    self
      .terms
      .iter()
      .filter(|t| t.first_use > cutoff_year)
      .filter_map(|t| {
        t.regex.find(text).map(|m| Finding {
          position: m.start(),
          reason: format!("anachronistic term '{}' (first attested {})", t.term, t.first_use),
          term: Some(t.term),
          year: None,
        })
      })
      .collect()
  }

  fn scan_years(&self, text: &str, cutoff_year: i32) -> Vec<Finding> {
    let range = self.config.year_min..=self.config.year_max;
    self
      .year
      .captures_iter(text)
      .filter_map(|caps| {
        let m = caps.get(1)?;
        let year: i32 = m.as_str().parse().ok()?;
        (range.contains(&year) && year > cutoff_year).then(|| Finding {
          position: m.start(),
          reason: format!("year reference {} after cutoff {}", year, cutoff_year),
          term: None,
          year: Some(year),
        })
      })
      .collect()
  }

  fn scan_artifacts(&self, text: &str) -> Vec<Finding> {
    self
      .artifacts
      .iter()
      .filter_map(|p| {
        p.regex
          .find(text)
          .map(|m| Finding::at(m.start(), format!("modern artifact: {}", p.label)))
      })
      .collect()
  }

  fn scan_annotations(&self, text: &str) -> Vec<Finding> {
    let mut findings: Vec<Finding> = self
      .annotations
      .iter()
      .filter_map(|p| {
        p.regex
          .find(text)
          .map(|m| Finding::at(m.start(), format!("modern annotation: {}", p.label)))
      })
      .collect();

    // Edition apparatus only counts inside a Gutenberg edition's opening pages
    let header = prefix(text, self.config.header_window_chars).to_lowercase();
    if header.contains(GUTENBERG_HEADER) {
      let window = prefix(text, self.config.marker_window_chars);
      findings.extend(self.edition_markers.iter().filter_map(|p| {
        p.regex
          .find(window)
          .map(|m| Finding::at(m.start(), format!("modern annotation: '{}'", p.label)))
      }));
    }

    findings
  }
}
