//! Lexicon inspection

use anyhow::Result;
use filter::Lexicon;
use tempus_core::{preset_for, validate_cutoff_year};

pub fn cmd_lexicon(cutoff: Option<i32>) -> Result<()> {
  let lexicon = Lexicon::standard();

  let entries: Vec<_> = match cutoff {
    Some(year) => {
      validate_cutoff_year(year)?;
      lexicon.anachronisms_for(year).collect()
    }
    None => lexicon.terms().iter().collect(),
  };

  print!("Lexicon v{}", lexicon.version());
  if let Some(year) = cutoff {
    print!(": {} terms anachronistic after {}", entries.len(), year);
    if let Some(preset) = preset_for(year) {
      print!(" ({})", preset.description);
    }
  } else {
    print!(": {} terms", entries.len());
  }
  println!("\n");

  println!("{:<28} {:>10}  CATEGORY", "TERM", "FIRST USE");
  for entry in entries {
    println!("{:<28} {:>10}  {}", entry.term, entry.first_use, entry.category.as_str());
  }

  println!("\nPatterns (independent of cutoff):");
  let patterns = lexicon.artifacts().iter().chain(lexicon.annotations());
  for pattern in patterns {
    println!("  {}", pattern.label);
  }
  println!(
    "  edition markers within Project Gutenberg texts: {}",
    lexicon.edition_markers().join(", ")
  );

  Ok(())
}
