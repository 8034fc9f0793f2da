use super::engine::{Cluster, ClusterParams};
use crate::utils::{Error, Result};
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    pub num_clusters: usize,
    pub num_contigs: usize,
    pub total_genes: usize,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

impl ClusterStats {
    pub fn from_clusters(clusters: &BTreeMap<String, Vec<Cluster>>) -> Self {
        let lengths = clusters.values().flatten().map(|c| c.len());
        Self {
            num_clusters: clusters.values().map(|c| c.len()).sum(),
            num_contigs: clusters.values().filter(|c| !c.is_empty()).count(),
            total_genes: lengths.clone().sum(),
            min_len: lengths.clone().min(),
            max_len: lengths.max(),
        }
    }

    /// Mean cluster length to three significant digits.
    pub fn average_len(&self) -> Result<String> {
        format_quotient(self.total_genes as u128, self.num_clusters as u128)
            .ok_or(Error::NoClusters)
    }
}

/// Run parameters echoed at the top of the report.
#[derive(Debug, Clone)]
pub struct ReportHeader<'a> {
    pub input_file: &'a str,
    pub output_dir: &'a str,
    pub params: ClusterParams,
}

/// Writes the `.EC_clusters` report. Trailing spaces on the fixed lines are part of the format.
pub fn write_report<W: Write>(
    writer: &mut W,
    header: &ReportHeader,
    stats: &ClusterStats,
    clusters: &BTreeMap<String, Vec<Cluster>>,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "# This output was generated by {} cluster ",
        env!("CARGO_PKG_NAME")
    )?;
    writeln!(
        writer,
        "# This program takes the output from DETECT (http://www.compsysbio.org/projects/DETECT) and finds clusters"
    )?;
    writeln!(
        writer,
        "# of enzymes within contigs (cluster = within x genes of each other where x is specified by the user). "
    )?;
    writeln!(writer, "#\n-- Input parameters --")?;
    writeln!(writer, "# The input file was: {}", header.input_file)?;
    writeln!(writer, "# The output directory was: {}", header.output_dir)?;
    writeln!(
        writer,
        "# The specified distance between clustered enzymes was: {} genes and {} bases.",
        header.params.sep_genes, header.params.sep_dist
    )?;
    writeln!(
        writer,
        "# The specified minimum cluster size was: {} genes.",
        header.params.min_cluster_size
    )?;
    writeln!(writer, "#\n-- Summary Statistics --")?;
    writeln!(
        writer,
        "# There were {} enzyme clusters found in {} contigs.",
        stats.num_clusters, stats.num_contigs
    )?;
    match (stats.average_len(), stats.min_len, stats.max_len) {
        (Ok(average), Some(min), Some(max)) => writeln!(
            writer,
            "# Average cluster length was {} genes (min={}, max={}).",
            average, min, max
        )?,
        _ => writeln!(
            writer,
            "# No enzyme clusters were found, cluster length statistics are not available."
        )?,
    }

    for (contig, contig_clusters) in clusters {
        write!(
            writer,
            "#\n#\n###\n-------------------- Predicted enzyme clusters on contig number: {} --------------------\n###\n",
            contig
        )?;
        for cluster in contig_clusters {
            writeln!(writer, "# Start cluster ")?;
            writeln!(
                writer,
                "# Gene_Number Start End EC_Number Recommended_Name ILS NumPosHits NumNegHits "
            )?;
            for gene in cluster {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    gene.gene_label,
                    gene.start,
                    gene.end,
                    gene.ec_field(),
                    gene.enzyme_name_field(),
                    gene.ils_score,
                    gene.num_positive_hits,
                    gene.num_negative_hits
                )?;
            }
            writeln!(writer, "# End cluster \n###")?;
        }
    }
    Ok(())
}

const SIGNIFICANT_DIGITS: u32 = 3;

/// Renders `numerator / denominator` the way a decimal context with three digits of
/// precision and half-even rounding prints it: exact quotients drop trailing zeros
/// (`2`, `2.5`), inexact ones keep all three digits (`2.33`, `0.667`), and values
/// needing more integer digits switch to exponent form (`1.23E+3`).
pub fn format_quotient(numerator: u128, denominator: u128) -> Option<String> {
    if denominator == 0 {
        return None;
    }
    if numerator == 0 {
        return Some("0".to_string());
    }

    let exponent = decimal_exponent(numerator, denominator);
    let (mut coefficient, mut exact) = scaled_round(numerator, denominator, exponent);
    let mut scale = exponent - (SIGNIFICANT_DIGITS as i32 - 1);
    if coefficient == 10u128.pow(SIGNIFICANT_DIGITS) {
        // Rounding carried into a new digit, e.g. 999.6 -> 1.00E+3
        (coefficient, exact) = scaled_round(numerator, denominator, exponent + 1);
        scale += 1;
    }

    if exact {
        while scale < 0 && coefficient % 10 == 0 {
            coefficient /= 10;
            scale += 1;
        }
    }

    let digits = coefficient.to_string();
    let adjusted = scale + digits.len() as i32 - 1;
    let rendered = if scale > 0 || adjusted < -6 {
        let (head, tail) = digits.split_at(1);
        let mantissa = if tail.is_empty() {
            head.to_string()
        } else {
            format!("{}.{}", head, tail)
        };
        format!("{}E{:+}", mantissa, adjusted)
    } else if scale == 0 {
        digits
    } else {
        let fraction_len = (-scale) as usize;
        if digits.len() > fraction_len {
            let (int_part, frac_part) = digits.split_at(digits.len() - fraction_len);
            format!("{}.{}", int_part, frac_part)
        } else {
            format!("0.{}{}", "0".repeat(fraction_len - digits.len()), digits)
        }
    };
    Some(rendered)
}

/// Power of ten of the leading digit of the quotient.
fn decimal_exponent(numerator: u128, denominator: u128) -> i32 {
    let quotient = numerator / denominator;
    if quotient > 0 {
        quotient.ilog10() as i32
    } else {
        let mut exponent = 0;
        let mut scaled = numerator;
        while scaled < denominator {
            scaled *= 10;
            exponent -= 1;
        }
        exponent
    }
}

/// Quotient scaled to `SIGNIFICANT_DIGITS` digits, rounded half to even, and whether
/// the division was exact.
fn scaled_round(numerator: u128, denominator: u128, exponent: i32) -> (u128, bool) {
    let shift = SIGNIFICANT_DIGITS as i32 - 1 - exponent;
    let (num, den) = if shift >= 0 {
        (numerator * 10u128.pow(shift as u32), denominator)
    } else {
        (numerator, denominator * 10u128.pow((-shift) as u32))
    };
    let quotient = num / den;
    let remainder = num % den;
    let rounded = match (remainder * 2).cmp(&den) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    (rounded, remainder == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::record::{gene_index, EnzymeRecord};

    fn gene(label: &str, start: u64, end: u64, ecs: &[&str], names: &[&str]) -> EnzymeRecord {
        EnzymeRecord {
            strain: "NCYC1".to_string(),
            contig: "7".to_string(),
            start,
            end,
            gene_label: label.to_string(),
            gene_number: gene_index(label).unwrap(),
            ec_numbers: ecs.iter().map(|s| s.to_string()).collect(),
            ils_score: "0.99".to_string(),
            num_positive_hits: "4".to_string(),
            num_negative_hits: "0".to_string(),
            enzyme_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn formats_averages_with_three_significant_digits() {
        assert_eq!(format_quotient(4, 2).as_deref(), Some("2"));
        assert_eq!(format_quotient(5, 2).as_deref(), Some("2.5"));
        assert_eq!(format_quotient(7, 3).as_deref(), Some("2.33"));
        assert_eq!(format_quotient(8, 3).as_deref(), Some("2.67"));
        assert_eq!(format_quotient(100, 3).as_deref(), Some("33.3"));
        assert_eq!(format_quotient(1000, 3).as_deref(), Some("333"));
        assert_eq!(format_quotient(2, 3).as_deref(), Some("0.667"));
        assert_eq!(format_quotient(1, 8).as_deref(), Some("0.125"));
        assert_eq!(format_quotient(2000, 1).as_deref(), Some("2.00E+3"));
        assert_eq!(format_quotient(9996, 10).as_deref(), Some("1.00E+3"));
        assert_eq!(format_quotient(0, 3).as_deref(), Some("0"));
        assert_eq!(format_quotient(3, 0), None);
    }

    #[test]
    fn rounds_half_to_even() {
        // 2.125 -> 2.12, 2.135 -> 2.14
        assert_eq!(format_quotient(17, 8).as_deref(), Some("2.12"));
        assert_eq!(format_quotient(427, 200).as_deref(), Some("2.14"));
    }

    #[test]
    fn stats_over_clusters() {
        let mut clusters = BTreeMap::new();
        clusters.insert(
            "1".to_string(),
            vec![
                vec![gene("g1", 1, 2, &["1"], &["A"]), gene("g2", 3, 4, &["1"], &["A"])],
                vec![
                    gene("g8", 1, 2, &["1"], &["A"]),
                    gene("g9", 3, 4, &["1"], &["A"]),
                    gene("g10", 5, 6, &["1"], &["A"]),
                ],
            ],
        );
        clusters.insert(
            "2".to_string(),
            vec![vec![gene("g1", 1, 2, &["1"], &["A"]), gene("g2", 3, 4, &["1"], &["A"])]],
        );
        let stats = ClusterStats::from_clusters(&clusters);
        assert_eq!(stats.num_clusters, 3);
        assert_eq!(stats.num_contigs, 2);
        assert_eq!(stats.min_len, Some(2));
        assert_eq!(stats.max_len, Some(3));
        assert_eq!(stats.average_len().unwrap(), "2.33");
    }

    #[test]
    fn report_lists_clusters_per_contig() {
        let mut clusters = BTreeMap::new();
        clusters.insert(
            "7".to_string(),
            vec![vec![
                gene("g3", 100, 400, &["1.1.1.1"], &["Alpha"]),
                gene("g4", 500, 900, &["1.1.1.1", "2.2.2.2"], &["Alpha", "Beta"]),
            ]],
        );
        let header = ReportHeader {
            input_file: "data/NCYC1.top",
            output_dir: "out",
            params: ClusterParams::default(),
        };
        let stats = ClusterStats::from_clusters(&clusters);
        let mut buffer = Vec::new();
        write_report(&mut buffer, &header, &stats, &clusters).unwrap();
        let report = String::from_utf8(buffer).unwrap();

        let expected = [
            "# This output was generated by ecprot cluster ",
            "# This program takes the output from DETECT (http://www.compsysbio.org/projects/DETECT) and finds clusters",
            "# of enzymes within contigs (cluster = within x genes of each other where x is specified by the user). ",
            "#",
            "-- Input parameters --",
            "# The input file was: data/NCYC1.top",
            "# The output directory was: out",
            "# The specified distance between clustered enzymes was: 6 genes and 10000 bases.",
            "# The specified minimum cluster size was: 2 genes.",
            "#",
            "-- Summary Statistics --",
            "# There were 1 enzyme clusters found in 1 contigs.",
            "# Average cluster length was 2 genes (min=2, max=2).",
            "#",
            "#",
            "###",
            "-------------------- Predicted enzyme clusters on contig number: 7 --------------------",
            "###",
            "# Start cluster ",
            "# Gene_Number Start End EC_Number Recommended_Name ILS NumPosHits NumNegHits ",
            "g3\t100\t400\t1.1.1.1\tAlpha\t0.99\t4\t0",
            "g4\t500\t900\t1.1.1.1;2.2.2.2\tAlpha;Beta\t0.99\t4\t0",
            "# End cluster ",
            "###",
        ];
        assert_eq!(report, format!("{}\n", expected.join("\n")));
    }

    #[test]
    fn report_without_clusters_skips_average() {
        let header = ReportHeader {
            input_file: "NCYC1.top",
            output_dir: ".",
            params: ClusterParams::default(),
        };
        let clusters = BTreeMap::new();
        let stats = ClusterStats::from_clusters(&clusters);
        let mut buffer = Vec::new();
        write_report(&mut buffer, &header, &stats, &clusters).unwrap();
        let report = String::from_utf8(buffer).unwrap();
        assert!(report.contains("# There were 0 enzyme clusters found in 0 contigs.\n"));
        assert!(report.contains("No enzyme clusters were found"));
        assert!(!report.contains("Average cluster length"));
        assert!(matches!(
            ClusterStats::from_clusters(&BTreeMap::new()).average_len(),
            Err(Error::NoClusters)
        ));
    }
}
