//! Extraction of predicted protein sequences from AUGUSTUS GFF output.
//!
//! AUGUSTUS writes each gene as a block of feature lines wrapped in comments:
//!
//! ```text
//! # start gene g1
//! contig_1	AUGUSTUS	gene	1	1236	0.43	+	.	g1
//! contig_1	AUGUSTUS	transcript	1	1236	0.43	+	.	g1.t1
//! # protein sequence = [MSTNQRLLAS
//! # DAGPKVEQW]
//! # end gene g1
//! ```
//!
//! The scanner walks those lines once and yields a [`GeneBlock`] per `# end gene`.

use crate::utils::{Error, Result};
use std::collections::HashMap;
use std::io::BufRead;

const START_GENE: &str = "# start gene";
const PROTEIN_SEQUENCE: &str = "# protein sequence";
const END_GENE: &str = "# end gene";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneBlock {
    pub gene_number: String,
    pub contig: String,
    pub start: String,
    pub end: String,
    pub sequence: String,
}

/// Coordinates taken from the feature line that follows `# start gene`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneLabel {
    pub contig: String,
    pub start: String,
    pub end: String,
}

impl GeneLabel {
    fn from_line(line: &str, line_number: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        match fields[..] {
            [contig, _, _, start, end, ..] => Ok(Self {
                contig: contig.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            }),
            _ => Err(Error::MalformedRecord(format!(
                "line {}: expected a tab-separated gene feature line after '{}', found: {}",
                line_number, START_GENE, line
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    AwaitingLabelLine {
        gene_number: String,
    },
    /// Coordinates are known, the protein sequence has not started yet.
    InGene {
        gene_number: String,
        label: GeneLabel,
    },
    InSequence {
        gene_number: String,
        label: GeneLabel,
        raw: String,
    },
}

impl ScanState {
    /// Consumes one line and returns the next state, plus a block when a gene closes.
    pub fn transition(
        self,
        line: &str,
        line_number: usize,
    ) -> Result<(ScanState, Option<GeneBlock>)> {
        if line.starts_with(START_GENE) {
            if self != ScanState::Idle {
                log::warn!(
                    "Line {}: new gene starts before the previous one ended, discarding it",
                    line_number
                );
            }
            let gene_number = line
                .split([' ', '\n'])
                .nth(3)
                .map(|s| s.trim_end().to_string())
                .ok_or_else(|| {
                    Error::MalformedRecord(format!(
                        "line {}: missing gene number: {}",
                        line_number, line
                    ))
                })?;
            return Ok((ScanState::AwaitingLabelLine { gene_number }, None));
        }

        // The feature line may itself carry a marker, so it falls through to the checks below
        let state = match self {
            ScanState::AwaitingLabelLine { gene_number } => ScanState::InGene {
                gene_number,
                label: GeneLabel::from_line(line, line_number)?,
            },
            other => other,
        };

        if line.starts_with(END_GENE) {
            let block = match state {
                ScanState::InGene { gene_number, label } => close_block(gene_number, label, ""),
                ScanState::InSequence {
                    gene_number,
                    label,
                    raw,
                } => close_block(gene_number, label, &raw),
                ScanState::Idle | ScanState::AwaitingLabelLine { .. } => {
                    return Err(Error::UnexpectedEndGene(line_number))
                }
            };
            return Ok((ScanState::Idle, Some(block)));
        }

        let mut state = if line.starts_with(PROTEIN_SEQUENCE) {
            match state {
                ScanState::InGene { gene_number, label } => ScanState::InSequence {
                    gene_number,
                    label,
                    raw: String::new(),
                },
                ScanState::Idle => {
                    log::debug!("Line {}: protein sequence outside of a gene", line_number);
                    ScanState::Idle
                }
                other => other,
            }
        } else {
            state
        };

        if let ScanState::InSequence { raw, .. } = &mut state {
            raw.push_str(line);
            raw.push('\n');
        }

        Ok((state, None))
    }
}

fn close_block(gene_number: String, label: GeneLabel, raw: &str) -> GeneBlock {
    GeneBlock {
        gene_number,
        contig: label.contig,
        start: label.start,
        end: label.end,
        sequence: uppercase_runs(raw),
    }
}

/// Concatenates every run of uppercase ASCII letters, dropping comment markers,
/// brackets, whitespace and lowercase text.
pub fn uppercase_runs(text: &str) -> String {
    text.chars().filter(char::is_ascii_uppercase).collect()
}

pub fn scan_gene_blocks<R: BufRead>(reader: R) -> Result<Vec<GeneBlock>> {
    let mut state = ScanState::Idle;
    let mut blocks = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| {
            Error::MalformedRecord(format!("error reading line {}: {}", line_number, e))
        })?;
        let (next_state, block) = state.transition(&line, line_number)?;
        if let Some(block) = block {
            log::debug!(
                "Gene {} on {}:{}-{} ({} aa)",
                block.gene_number,
                block.contig,
                block.start,
                block.end,
                block.sequence.len()
            );
            blocks.push(block);
        }
        state = next_state;
    }

    if state != ScanState::Idle {
        log::warn!("Input ended inside an unterminated gene, discarding it");
    }

    Ok(blocks)
}

/// Blocks keyed by gene number, in order of first appearance.
#[derive(Debug, Default)]
pub struct GeneIndex {
    order: Vec<String>,
    blocks: HashMap<String, Vec<GeneBlock>>,
}

impl GeneIndex {
    pub fn from_blocks(blocks: Vec<GeneBlock>) -> Self {
        let mut index = Self::default();
        for block in blocks {
            let entry = index.blocks.entry(block.gene_number.clone()).or_default();
            if entry.is_empty() {
                index.order.push(block.gene_number.clone());
            } else {
                log::warn!(
                    "Gene {} appears more than once, keeping the first occurrence",
                    block.gene_number
                );
            }
            entry.push(block);
        }
        index
    }

    #[cfg(test)]
    pub fn get(&self, gene_number: &str) -> Option<&[GeneBlock]> {
        self.blocks.get(gene_number).map(|v| v.as_slice())
    }

    /// The first block recorded for each gene number.
    pub fn first_blocks(&self) -> impl Iterator<Item = &GeneBlock> {
        self.order
            .iter()
            .filter_map(|gene| self.blocks.get(gene).and_then(|v| v.first()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
