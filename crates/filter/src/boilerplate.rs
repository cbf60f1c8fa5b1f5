//! Project Gutenberg license header/footer removal.

/// Text before the line containing one of these is license header
const HEADER_END_MARKERS: &[&str] = &[
  "*** START OF THIS PROJECT GUTENBERG",
  "*** START OF THE PROJECT GUTENBERG",
  "*END*THE SMALL PRINT",
  "END OF THE PROJECT GUTENBERG HEADER",
];

/// Text from one of these onward is license footer
const FOOTER_START_MARKERS: &[&str] = &[
  "*** END OF THIS PROJECT GUTENBERG",
  "*** END OF THE PROJECT GUTENBERG",
  "END OF PROJECT GUTENBERG",
  "END OF THE PROJECT GUTENBERG",
];

fn find_first(haystack: &str, markers: &[&str]) -> Option<usize> {
  markers.iter().find_map(|m| haystack.find(m))
}

/// Strip the license header and footer and trim surrounding whitespace.
///
/// Markers match case-insensitively. Text without markers is only trimmed.
pub fn strip_gutenberg_boilerplate(text: &str) -> String {
  let mut body = text;

  // ASCII uppercasing keeps byte offsets aligned with the original
  let upper = body.to_ascii_uppercase();
  if let Some(idx) = find_first(&upper, HEADER_END_MARKERS)
    && let Some(newline) = body[idx..].find('\n')
  {
    body = &body[idx + newline + 1..];
  }

  let upper = body.to_ascii_uppercase();
  if let Some(idx) = find_first(&upper, FOOTER_START_MARKERS) {
    body = &body[..idx];
  }

  body.trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_strips_header_and_footer() {
    let text = "The Project Gutenberg EBook of Emma, by Jane Austen\n\
                This eBook is for the use of anyone anywhere at no cost.\n\
                *** START OF THIS PROJECT GUTENBERG EBOOK EMMA ***\n\
                \n\
                Emma Woodhouse, handsome, clever, and rich.\n\
                \n\
                *** END OF THIS PROJECT GUTENBERG EBOOK EMMA ***\n\
                Updated editions will replace the previous one.";
    assert_eq!(strip_gutenberg_boilerplate(text), "Emma Woodhouse, handsome, clever, and rich.");
  }

  #[test]
  fn test_markers_are_case_insensitive() {
    let text = "license\n*** start of the project gutenberg ebook ***\nBody text.\nEnd of Project Gutenberg's Emma";
    assert_eq!(strip_gutenberg_boilerplate(text), "Body text.");
  }

  #[test]
  fn test_header_marker_on_last_line_is_kept() {
    let text = "Body first.\n*** START OF THE PROJECT GUTENBERG EBOOK";
    assert_eq!(strip_gutenberg_boilerplate(text), text);
  }

  #[test]
  fn test_plain_text_is_trimmed_only() {
    assert_eq!(strip_gutenberg_boilerplate("  It was a dark night.\n"), "It was a dark night.");
  }

  #[test]
  fn test_non_ascii_body_survives() {
    let text = "*** START OF THE PROJECT GUTENBERG EBOOK ***\nCafé société, naïveté.\n*** END OF THE PROJECT GUTENBERG EBOOK";
    assert_eq!(strip_gutenberg_boilerplate(text), "Café société, naïveté.");
  }
}
