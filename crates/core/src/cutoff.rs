/// A named cutoff used by the source collaborators' download configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffPreset {
  pub year: i32,
  pub description: &'static str,
}

pub const CUTOFF_PRESETS: &[CutoffPreset] = &[
  CutoffPreset {
    year: 1850,
    description: "Pre-industrial/early Victorian",
  },
  CutoffPreset {
    year: 1900,
    description: "Victorian/pre-Edwardian",
  },
  CutoffPreset {
    year: 1913,
    description: "Pre-WWI",
  },
  CutoffPreset {
    year: 1950,
    description: "Pre-Cold War",
  },
];

pub fn preset_for(year: i32) -> Option<&'static CutoffPreset> {
  CUTOFF_PRESETS.iter().find(|p| p.year == year)
}
