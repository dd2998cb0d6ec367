//! Event records and a JSON Lines event source.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tr_core::{Error, Result};

/// A scalar energy-sum record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SumRecord {
    /// Transverse energy.
    pub et: f64,
}

/// The energy sums of one trigger path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sums {
    /// Total hadronic transverse energy.
    pub htt: SumRecord,
    /// Missing ET, barrel and endcap.
    pub met: SumRecord,
    /// Missing ET including the forward calorimeter.
    pub met_hf: SumRecord,
}

/// A trigger jet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    /// Transverse energy.
    pub et: f64,
    /// Pseudorapidity.
    pub eta: f64,
}

/// One event as seen by the rate engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Run number.
    pub run: u32,
    /// Lumi section.
    pub lumi: u32,
    /// Reconstructed vertex count, when the sample carries reco information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_vertex: Option<u32>,
    /// Hardware energy sums.
    pub l1_sums: Sums,
    /// Emulated energy sums.
    pub l1_emu_sums: Sums,
    /// Hardware jets.
    #[serde(default)]
    pub l1_jets: Vec<Jet>,
    /// Emulated jets.
    #[serde(default)]
    pub l1_emu_jets: Vec<Jet>,
}

/// Streaming reader over a JSON Lines file, one [`Event`] per line.
///
/// Blank lines are skipped. A malformed line yields an error naming the line.
pub struct EventReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl EventReader<BufReader<File>> {
    /// Open a JSON Lines file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EventReader<R> {
    /// Wrap any buffered reader.
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line_no: 0 }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.next()?;
            self.line_no += 1;
            let line_no = self.line_no;
            let line = match next {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    return Some(Err(Error::Validation(format!(
                        "malformed event on line {line_no}: {e}"
                    ))));
                }
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|e| {
                Error::Validation(format!("malformed event on line {line_no}: {e}"))
            }));
        }
    }
}
