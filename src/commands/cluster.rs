use crate::cli::ClusterArgs;
use crate::cluster::{
    find_clusters, group_by_contig, parse_records, write_report, ClusterStats, EnzymeNames,
    ReportHeader,
};
use crate::utils::{open_text_reader, Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time;

pub fn cluster(args: ClusterArgs) -> Result<()> {
    let start_timer = time::Instant::now();

    let file_name = input_file_name(&args.input_path);
    check_top_extension(&file_name)?;
    let strain_name = args
        .strain_name
        .clone()
        .unwrap_or_else(|| default_strain_name(&file_name));

    let enzymes = EnzymeNames::from_path(&args.enzyme_db_path)?;
    let reader = open_text_reader(&args.input_path)?;
    let records = parse_records(reader, &enzymes)?;
    log::info!("Parsed {} enzyme predictions", records.len());

    let groups = group_by_contig(records);
    log::info!("Predictions span {} contigs", groups.len());

    let params = args.params();
    let clusters = find_clusters(groups, &params);
    let stats = ClusterStats::from_clusters(&clusters);
    match stats.average_len() {
        Ok(average) => log::info!(
            "Found {} clusters in {} contigs, average length {} genes",
            stats.num_clusters,
            stats.num_contigs,
            average
        ),
        Err(e) => log::warn!("{}", e),
    }

    let output_path = report_path(&args.output_dir, &strain_name);
    let input_display = args.input_path.display().to_string();
    let output_dir_display = args.output_dir.display().to_string();
    let header = ReportHeader {
        input_file: &input_display,
        output_dir: &output_dir_display,
        params,
    };
    fs::create_dir_all(&args.output_dir).map_err(Error::write_failure(&args.output_dir))?;
    let file = File::create(&output_path).map_err(Error::write_failure(&output_path))?;
    let mut writer = BufWriter::new(file);
    write_report(&mut writer, &header, &stats, &clusters)
        .and_then(|_| writer.flush())
        .map_err(Error::write_failure(&output_path))?;

    log::info!("Report written to {}", output_path.display());
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

fn input_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_top_extension(file_name: &str) -> Result<()> {
    match file_name.rsplit('.').next() {
        Some("top") => Ok(()),
        _ => Err(Error::WrongFiletype(file_name.to_string())),
    }
}

fn default_strain_name(file_name: &str) -> String {
    file_name.split('.').next().unwrap_or(file_name).to_string()
}

fn report_path(output_dir: &Path, strain_name: &str) -> PathBuf {
    output_dir.join(format!("{}.EC_clusters", strain_name))
}
