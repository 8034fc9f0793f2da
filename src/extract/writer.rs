use super::filename::FileMetadata;
use super::scanner::{GeneBlock, GeneIndex};
use crate::utils::{Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputLayout {
    /// All genes in `<dir>/<strain>_prot.fasta`.
    Merged,
    /// One file per gene in `<dir>/<strain>/`.
    PerGene,
}

/// Contig of a multi-sequence input with its location separator turned into `_`,
/// e.g. `NCYC1:100-5100` becomes `NCYC1_100-5100`.
pub fn merged_contig_name(contig: &str) -> String {
    match contig.split_once(':') {
        Some((head, tail)) => {
            let location = tail.split(':').next().unwrap_or(tail);
            format!("{}_{}", head, location)
        }
        None => contig.to_string(),
    }
}

pub fn merged_header(metadata: &FileMetadata, block: &GeneBlock) -> String {
    format!(
        ">{}{}:{}-{}_{}",
        metadata.gene_name_prefix,
        merged_contig_name(&block.contig),
        block.start,
        block.end,
        block.gene_number
    )
}

pub fn per_gene_header(metadata: &FileMetadata, block: &GeneBlock) -> String {
    format!(
        ">{}{}_{}:{}-{}_{}",
        metadata.gene_name_prefix,
        metadata.strain_name,
        block.contig,
        block.start,
        block.end,
        block.gene_number
    )
}

pub fn per_gene_filename(metadata: &FileMetadata, block: &GeneBlock) -> String {
    format!(
        "{}{}_{}_{}-{}_{}_prot.fasta",
        metadata.gene_name_prefix,
        metadata.strain_name,
        block.contig,
        block.start,
        block.end,
        block.gene_number
    )
}

/// Writes the first block of every gene as FASTA and returns the files created.
pub fn write_sequences(
    genes: &GeneIndex,
    metadata: &FileMetadata,
    layout: OutputLayout,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if genes.is_empty() {
        log::warn!("No genes found, nothing to write");
        return Ok(Vec::new());
    }

    match layout {
        OutputLayout::Merged => {
            fs::create_dir_all(output_dir).map_err(Error::write_failure(output_dir))?;
            let path = output_dir.join(format!("{}_prot.fasta", metadata.strain_name));
            write_fasta(
                &path,
                genes
                    .first_blocks()
                    .map(|block| (merged_header(metadata, block), block.sequence.as_str())),
            )?;
            Ok(vec![path])
        }
        OutputLayout::PerGene => {
            let strain_dir = output_dir.join(&metadata.strain_name);
            fs::create_dir_all(&strain_dir).map_err(Error::write_failure(&strain_dir))?;
            genes
                .first_blocks()
                .map(|block| -> Result<PathBuf> {
                    let path = strain_dir.join(per_gene_filename(metadata, block));
                    let record = (per_gene_header(metadata, block), block.sequence.as_str());
                    write_fasta(&path, std::iter::once(record))?;
                    Ok(path)
                })
                .collect()
        }
    }
}

fn write_fasta<'a>(path: &Path, records: impl Iterator<Item = (String, &'a str)>) -> Result<()> {
    let file = File::create(path).map_err(Error::write_failure(path))?;
    let mut writer = BufWriter::new(file);
    for (header, sequence) in records {
        writeln!(writer, "{}\n{}", header, sequence).map_err(Error::write_failure(path))?;
    }
    writer.flush().map_err(Error::write_failure(path))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
