//! Location metadata encoded in AUGUSTUS input file names.
//!
//! Inputs usually come from annotating a FASTA excerpt around a HMMER hit and are named
//! like `NCYC1_contig123_pos456to789+.fasta.gff`; the naming flags select alternative
//! conventions for gene-prefixed names, whole genomes and multi-sequence inputs.

use crate::utils::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static LOWERCASE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("[a-z]+").unwrap());
static POSITION_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new("[.+a-z]+").unwrap());
static DEFAULT_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new("[._+a-z]+").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtractModes {
    pub full_genome: bool,
    pub gene_name_on: bool,
    pub multi_seq: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NamingMode {
    FullGenome,
    GeneName,
    MultiSeq,
    Default,
}

impl NamingMode {
    fn name(&self) -> &'static str {
        match self {
            NamingMode::FullGenome => "full genome",
            NamingMode::GeneName => "gene name",
            NamingMode::MultiSeq => "multi sequence",
            NamingMode::Default => "default",
        }
    }
}

impl ExtractModes {
    pub fn naming_mode(&self) -> NamingMode {
        if self.full_genome {
            NamingMode::FullGenome
        } else if self.gene_name_on {
            NamingMode::GeneName
        } else if self.multi_seq {
            NamingMode::MultiSeq
        } else {
            NamingMode::Default
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetadata {
    /// Either empty or a gene name followed by `_`.
    pub gene_name_prefix: String,
    pub strain_name: String,
    pub contig: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Metadata(FileMetadata),
    /// The name is an unexpanded shell glob, so there is no input to process.
    NothingToDo,
}

pub fn decode_filename(filename: &str, modes: &ExtractModes) -> Result<Decoded> {
    if filename.contains('*') {
        return Ok(Decoded::NothingToDo);
    }

    let mode = modes.naming_mode();
    let unrecognized = || Error::UnrecognizedFilenamePattern {
        filename: filename.to_string(),
        mode: mode.name(),
    };
    let non_empty = |s: &str| {
        if s.is_empty() {
            Err(unrecognized())
        } else {
            Ok(s.to_string())
        }
    };

    let metadata = match mode {
        NamingMode::FullGenome => FileMetadata {
            strain_name: non_empty(filename.split('.').next().unwrap_or(""))?,
            ..Default::default()
        },
        NamingMode::MultiSeq => FileMetadata {
            strain_name: non_empty(filename.split('_').next().unwrap_or(""))?,
            ..Default::default()
        },
        NamingMode::GeneName => {
            let parts: Vec<&str> = filename.split('_').collect();
            // Without a leading gene name the components shift left by one
            let (prefix, strain, contig_field, position_field) = match parts[..] {
                [strain, contig, position] => ("", strain, contig, position),
                [gene, strain, contig, position, ..] => (gene, strain, contig, position),
                _ => return Err(unrecognized()),
            };

            let contig = LOWERCASE_RUN.split(contig_field).nth(1).unwrap_or("");
            let mut position = POSITION_DELIMITERS.split(position_field).skip(1);
            let start = position.next().unwrap_or("");
            let end = position.next().unwrap_or("");

            FileMetadata {
                gene_name_prefix: if prefix.is_empty() {
                    String::new()
                } else {
                    format!("{}_", prefix)
                },
                strain_name: non_empty(strain)?,
                contig: non_empty(contig)?,
                start: non_empty(start)?,
                end: non_empty(end)?,
            }
        }
        NamingMode::Default => {
            let parts: Vec<&str> = DEFAULT_DELIMITERS.split(filename).collect();
            match parts[..] {
                [strain, contig, start, end, ..] => FileMetadata {
                    gene_name_prefix: String::new(),
                    strain_name: non_empty(strain)?,
                    contig: non_empty(contig)?,
                    start: non_empty(start)?,
                    end: non_empty(end)?,
                },
                _ => return Err(unrecognized()),
            }
        }
    };

    Ok(Decoded::Metadata(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(filename: &str, modes: ExtractModes) -> FileMetadata {
        match decode_filename(filename, &modes).unwrap() {
            Decoded::Metadata(metadata) => metadata,
            Decoded::NothingToDo => panic!("unexpected glob for {}", filename),
        }
    }

    #[test]
    fn default_mode_splits_location() {
        let metadata = decode("NCYC1_contig123_pos456to789+.fasta.gff", ExtractModes::default());
        assert_eq!(
            metadata,
            FileMetadata {
                gene_name_prefix: String::new(),
                strain_name: "NCYC1".to_string(),
                contig: "123".to_string(),
                start: "456".to_string(),
                end: "789".to_string(),
            }
        );
    }

    #[test]
    fn default_mode_rejects_short_names() {
        let result = decode_filename("NCYC1.gff", &ExtractModes::default());
        assert!(matches!(
            result,
            Err(Error::UnrecognizedFilenamePattern { mode: "default", .. })
        ));
    }

    #[test]
    fn gene_name_mode_without_prefix() {
        let modes = ExtractModes {
            gene_name_on: true,
            ..Default::default()
        };
        let metadata = decode("strain1_contig2_pos100to200+.fasta.gff", modes);
        assert_eq!(metadata.gene_name_prefix, "");
        assert_eq!(metadata.strain_name, "strain1");
        assert_eq!(metadata.contig, "2");
        assert_eq!(metadata.start, "100");
        assert_eq!(metadata.end, "200");
    }

    #[test]
    fn gene_name_mode_with_prefix() {
        let modes = ExtractModes {
            gene_name_on: true,
            ..Default::default()
        };
        let metadata = decode("PKS1_NCYC93_contig7_pos1500to9000+.fasta.gff", modes);
        assert_eq!(metadata.gene_name_prefix, "PKS1_");
        assert_eq!(metadata.strain_name, "NCYC93");
        assert_eq!(metadata.contig, "7");
        assert_eq!(metadata.start, "1500");
        assert_eq!(metadata.end, "9000");
    }

    #[test]
    fn gene_name_mode_ignores_trailing_components() {
        let modes = ExtractModes {
            gene_name_on: true,
            ..Default::default()
        };
        let metadata = decode("PKS1_NCYC93_contig7_pos1500to9000+_v2.fasta.gff", modes);
        assert_eq!(metadata.gene_name_prefix, "PKS1_");
        assert_eq!(metadata.strain_name, "NCYC93");
        assert_eq!(metadata.contig, "7");
        assert_eq!(metadata.start, "1500");
        assert_eq!(metadata.end, "9000");
    }

    #[test]
    fn gene_name_mode_requires_position() {
        let modes = ExtractModes {
            gene_name_on: true,
            ..Default::default()
        };
        assert!(decode_filename("NCYC1_contig2.gff", &modes).is_err());
        assert!(decode_filename("NCYC1_contig2_pos.gff", &modes).is_err());
    }

    #[test]
    fn full_genome_and_multi_seq_keep_only_strain() {
        let full = ExtractModes {
            full_genome: true,
            gene_name_on: true,
            multi_seq: true,
        };
        let metadata = decode("NCYC1_contig2_pos1to2+.fasta.gff", full);
        assert_eq!(metadata.strain_name, "NCYC1_contig2_pos1to2+");
        assert!(metadata.contig.is_empty());

        let multi = ExtractModes {
            multi_seq: true,
            ..Default::default()
        };
        let metadata = decode("NCYC1_hits.gff", multi);
        assert_eq!(metadata.strain_name, "NCYC1");
        assert!(metadata.start.is_empty() && metadata.end.is_empty());
    }

    #[test]
    fn mode_priority() {
        let modes = ExtractModes {
            gene_name_on: true,
            multi_seq: true,
            ..Default::default()
        };
        assert_eq!(modes.naming_mode(), NamingMode::GeneName);
        assert_eq!(ExtractModes::default().naming_mode(), NamingMode::Default);
    }

    #[test]
    fn unexpanded_glob_is_nothing_to_do() {
        let result = decode_filename("*.gff", &ExtractModes::default()).unwrap();
        assert_eq!(result, Decoded::NothingToDo);
    }
}
