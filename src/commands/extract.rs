use crate::cli::ExtractArgs;
use crate::extract::{
    decode_filename, scan_gene_blocks, write_sequences, Decoded, ExtractModes, GeneIndex,
    OutputLayout,
};
use crate::utils::{open_text_reader, Result};
use std::path::PathBuf;
use std::time;

pub fn extract(args: ExtractArgs) -> Result<()> {
    let start_timer = time::Instant::now();
    let modes = args.modes();

    let file_name = args
        .input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = match decode_filename(&file_name, &modes)? {
        Decoded::Metadata(metadata) => metadata,
        Decoded::NothingToDo => {
            log::info!("No input matched {}, nothing to do", args.input_path.display());
            return Ok(());
        }
    };
    log::info!(
        "Input {} ({:?} naming): strain={} contig={} start={} end={}",
        file_name,
        modes.naming_mode(),
        metadata.strain_name,
        metadata.contig,
        metadata.start,
        metadata.end
    );

    let reader = open_text_reader(&args.input_path)?;
    let genes = GeneIndex::from_blocks(scan_gene_blocks(reader)?);
    log::info!("Extracted {} gene sequences", genes.len());

    let written = write_sequences(
        &genes,
        &metadata,
        output_layout(&modes),
        &args.output_directory,
    )?;
    log_written(&written);

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

fn output_layout(modes: &ExtractModes) -> OutputLayout {
    if modes.multi_seq {
        OutputLayout::Merged
    } else {
        OutputLayout::PerGene
    }
}

fn log_written(paths: &[PathBuf]) {
    for path in paths {
        log::debug!("Wrote {}", path.display());
    }
    log::info!("Wrote {} FASTA files", paths.len());
}
