//! Fixture loading and argument decoding.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tinyfmt_core::FormatArg;
use tinyfmt_core::stdlib::{Base, parse_signed, parse_unsigned};

use crate::error::HarnessError;

/// One typed argument as stored in fixture JSON, e.g.
/// `{"kind":"int","value":-5}` or `{"kind":"text","value":null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FixtureArg {
    Int(i32),
    Unsigned(u32),
    /// A single ASCII character.
    Char(char),
    Text(Option<String>),
    Float(f64),
    Pointer(u64),
}

impl FixtureArg {
    /// Borrow as a formatter argument. Non-ASCII chars keep their low byte.
    #[must_use]
    pub fn as_format_arg(&self) -> FormatArg<'_> {
        match self {
            Self::Int(v) => FormatArg::Int(*v),
            Self::Unsigned(v) => FormatArg::Unsigned(*v),
            Self::Char(c) => FormatArg::Char(*c as u32 as u8),
            Self::Text(t) => FormatArg::Text(t.as_deref().map(str::as_bytes)),
            Self::Float(v) => FormatArg::Float(*v),
            Self::Pointer(v) => FormatArg::Pointer(*v as usize),
        }
    }

    /// Parse the command-line form `tag:value`.
    ///
    /// Tags: `i` int, `u` unsigned, `c` char, `s` text (`s:null` is a null
    /// string), `f` float, `p` pointer (decimal or `0x` hex).
    pub fn parse_tagged(spec: &str) -> Result<Self, HarnessError> {
        let invalid = |reason| HarnessError::InvalidArg {
            spec: spec.to_string(),
            reason,
        };
        let (tag, value) = spec.split_once(':').ok_or_else(|| invalid("expected tag:value"))?;

        match tag {
            "i" => {
                let wide = parse_signed(value.as_bytes(), Base::DECIMAL)
                    .ok_or_else(|| invalid("not a decimal integer"))?;
                i32::try_from(wide)
                    .map(Self::Int)
                    .map_err(|_| invalid("out of int range"))
            }
            "u" => {
                let wide = parse_unsigned(value.as_bytes(), Base::DECIMAL)
                    .ok_or_else(|| invalid("not an unsigned integer"))?;
                u32::try_from(wide)
                    .map(Self::Unsigned)
                    .map_err(|_| invalid("out of unsigned range"))
            }
            "c" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Ok(Self::Char(c)),
                    _ => Err(invalid("expected one ASCII character")),
                }
            }
            "s" if value == "null" => Ok(Self::Text(None)),
            "s" => Ok(Self::Text(Some(value.to_string()))),
            "f" => value
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| invalid("not a float")),
            "p" => {
                let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
                    Some(hex) => parse_unsigned(hex.as_bytes(), Base::HEX),
                    None => parse_unsigned(value.as_bytes(), Base::DECIMAL),
                };
                parsed
                    .map(Self::Pointer)
                    .ok_or_else(|| invalid("not a pointer value"))
            }
            _ => Err(invalid("unknown tag (use i, u, c, s, f or p)")),
        }
    }
}

/// A single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    pub format: String,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Expected output, or `error:<kind>` when the call must fail.
    pub expected_output: String,
    /// `strict`, `hardened` or `both`.
    pub mode: String,
    /// Buffer capacity override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl FixtureCase {
    #[must_use]
    pub fn format_args(&self) -> Vec<FormatArg<'_>> {
        self.args.iter().map(FixtureArg::as_format_arg).collect()
    }
}

/// A collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    pub family: String,
    pub captured_at: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Load every `*.json` fixture set in `dir`, sorted by file name.
pub fn load_fixture_dir(dir: &Path) -> Result<Vec<FixtureSet>, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let sets = paths
        .iter()
        .map(|path| FixtureSet::from_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    if sets.is_empty() {
        return Err(HarnessError::NoFixtures(dir.display().to_string()));
    }
    Ok(sets)
}
