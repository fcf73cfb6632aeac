use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gridsect_core::{BusId, Connection, Diagnostics, SectionSeeds};
use serde::{Deserialize, Serialize};

/// Seed file: boundary ties to cut and the starting buses of each section.
///
/// ```toml
/// boundary = [[107, 132], [103, 133], [13, 28]]
///
/// [[section]]
/// name = "1"
/// seeds = [13, 103, 107]
///
/// [[section]]
/// name = "2"
/// seeds = [28, 132, 133]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    #[serde(default)]
    pub boundary: Vec<[usize; 2]>,
    #[serde(rename = "section", default)]
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSpec {
    pub name: String,
    pub seeds: Vec<usize>,
}

impl SeedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Structural checks; seed overlap is left to the sectionalizer.
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            bail!("no [[section]] entries defined");
        }
        for section in &self.sections {
            if section.name.trim().is_empty() {
                bail!("section names must not be empty");
            }
        }
        Ok(())
    }

    pub fn boundary(&self) -> Vec<Connection> {
        self.boundary
            .iter()
            .map(|&[a, b]| Connection::from((a, b)))
            .collect()
    }

    pub fn seeds(&self) -> SectionSeeds {
        self.sections
            .iter()
            .fold(SectionSeeds::new(), |seeds, section| {
                seeds.with_section(
                    section.name.clone(),
                    section.seeds.iter().copied().map(BusId::new),
                )
            })
    }

    /// Warn about seed and boundary buses missing from the bus table.
    pub fn audit_buses(&self, known: &HashSet<BusId>) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for section in &self.sections {
            for &seed in &section.seeds {
                if !known.contains(&BusId::new(seed)) {
                    diagnostics.add_warning_with_entity(
                        "seeds",
                        &format!("seed of section '{}' is not in the bus table", section.name),
                        &format!("Bus {}", seed),
                    );
                }
            }
        }
        for pair in self.boundary() {
            for bus in [pair.low(), pair.high()] {
                if !known.contains(&bus) {
                    diagnostics.add_warning_with_entity(
                        "boundary",
                        &format!("boundary pair {} uses a bus not in the bus table", pair),
                        &format!("Bus {}", bus),
                    );
                }
            }
        }
        diagnostics
    }
}
