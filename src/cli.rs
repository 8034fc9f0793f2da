use crate::cluster::ClusterParams;
use crate::extract::ExtractModes;
use chrono::Datelike;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

type ArgResult<T> = std::result::Result<T, String>;

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="ecprot",
          version=&**FULL_VERSION,
          about="Enzyme cluster detection and protein extraction from genome annotations",
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) 2018-{}
This program comes with ABSOLUTELY NO WARRANTY.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(global = true)]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Find clusters of predicted enzymes along contigs (DETECT output)")]
    Cluster(ClusterArgs),
    #[clap(about = "Extract predicted protein sequences (AUGUSTUS GFF output)")]
    Extract(ExtractArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("cluster")))]
#[command(arg_required_else_help(true))]
pub struct ClusterArgs {
    #[clap(required = true)]
    #[clap(help = "DETECT output file (*.top)")]
    #[clap(value_name = "INPUT")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,

    #[clap(required = true)]
    #[clap(help = "ExPASy ENZYME database (enzyme.dat)")]
    #[clap(value_name = "ENZYME_DB")]
    #[arg(value_parser = check_file_exists)]
    pub enzyme_db_path: PathBuf,

    #[clap(long = "outputDir")]
    #[clap(visible_alias = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help = "Directory in which to save the cluster report")]
    #[clap(default_value = ".")]
    pub output_dir: PathBuf,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "strainName")]
    #[clap(visible_alias = "strain-name")]
    #[clap(value_name = "STRAIN")]
    #[clap(help = "Strain name used for the output file [default: input file name up to the first '.']")]
    #[clap(default_value = None)]
    #[arg(value_parser = check_strain_name_nonempty)]
    pub strain_name: Option<String>,

    #[clap(help_heading("Clustering"))]
    #[clap(long = "sepGenes")]
    #[clap(visible_alias = "sep-genes")]
    #[clap(value_name = "GENES")]
    #[clap(help = "Maximum distance between clustered enzymes, in genes")]
    #[clap(default_value = "6")]
    pub sep_genes: u64,

    #[clap(help_heading("Clustering"))]
    #[clap(long = "sepDist")]
    #[clap(visible_alias = "sep-dist")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Maximum distance between clustered enzymes, in bases")]
    #[clap(default_value = "10000")]
    pub sep_dist: u64,

    #[clap(help_heading("Clustering"))]
    #[clap(long = "minClusterSize")]
    #[clap(visible_alias = "min-cluster-size")]
    #[clap(value_name = "GENES")]
    #[clap(help = "Minimum number of genes for a cluster to be reported")]
    #[clap(default_value = "2")]
    #[arg(value_parser = size_at_least_one)]
    pub min_cluster_size: usize,
}

impl ClusterArgs {
    pub fn params(&self) -> ClusterParams {
        ClusterParams {
            sep_genes: self.sep_genes,
            sep_dist: self.sep_dist,
            min_cluster_size: self.min_cluster_size,
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("extract")))]
#[command(arg_required_else_help(true))]
pub struct ExtractArgs {
    #[clap(required = true)]
    #[clap(help = "AUGUSTUS GFF file to take protein sequences from")]
    #[clap(value_name = "INPUT")]
    pub input_path: PathBuf,

    #[clap(long = "outputDirectory")]
    #[clap(visible_alias = "output-directory")]
    #[clap(value_name = "DIR")]
    #[clap(help = "Directory in which to save the extracted sequences")]
    #[clap(default_value = ".")]
    pub output_directory: PathBuf,

    #[clap(help_heading("Input naming"))]
    #[clap(long = "geneNameOn")]
    #[clap(visible_alias = "gene-name-on")]
    #[clap(value_name = "BOOL")]
    #[clap(help = "The strain name is preceded by a gene name in the input file name (True/False)")]
    #[clap(default_value = "False")]
    #[arg(action = ArgAction::Set, value_parser = parse_truthy)]
    pub gene_name_on: bool,

    #[clap(help_heading("Input naming"))]
    #[clap(long = "fullGenome")]
    #[clap(visible_alias = "full-genome")]
    #[clap(value_name = "BOOL")]
    #[clap(help = "The input holds a whole genome annotation (True/False)")]
    #[clap(default_value = "False")]
    #[arg(action = ArgAction::Set, value_parser = parse_truthy)]
    pub full_genome: bool,

    #[clap(help_heading("Input naming"))]
    #[clap(long = "multiSeq")]
    #[clap(visible_alias = "multi-seq")]
    #[clap(value_name = "BOOL")]
    #[clap(help = "The input holds multiple sequences, write a single merged FASTA (True/False)")]
    #[clap(default_value = "False")]
    #[arg(action = ArgAction::Set, value_parser = parse_truthy)]
    pub multi_seq: bool,
}

impl ExtractArgs {
    pub fn modes(&self) -> ExtractModes {
        ExtractModes {
            full_genome: self.full_genome,
            gene_name_on: self.gene_name_on,
            multi_seq: self.multi_seq,
        }
    }
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_file_exists(s: &str) -> ArgResult<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_strain_name_nonempty(s: &str) -> ArgResult<String> {
    if s.trim().is_empty() {
        Err("Strain name cannot be an empty string".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn size_at_least_one(s: &str) -> ArgResult<usize> {
    let size: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid cluster size", s))?;
    if size >= 1 {
        Ok(size)
    } else {
        Err("Minimum cluster size must be at least 1".into())
    }
}

/// Only the literal strings `True` and `true` switch a naming flag on.
pub fn parse_truthy(s: &str) -> ArgResult<bool> {
    Ok(matches!(s, "True" | "true"))
}
