use super::enzyme_db::EnzymeNames;
use crate::utils::{Error, Result};
use itertools::Itertools;

/// One DETECT prediction: a gene and the enzyme function(s) assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnzymeRecord {
    pub strain: String,
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub gene_label: String,
    /// Numeric part of `gene_label`, the clustering order key.
    pub gene_number: u64,
    pub ec_numbers: Vec<String>,
    pub ils_score: String,
    pub num_positive_hits: String,
    pub num_negative_hits: String,
    pub enzyme_names: Vec<String>,
}

impl EnzymeRecord {
    /// Parses one tab-delimited DETECT line:
    /// `ID  EC_number(s)  ILS  positive_hits  negative_hits`, where the ID is
    /// `strain_contig:start-end_gN` (any of `-`, `_`, `:` may separate the parts).
    pub fn from_line(line: &str, enzymes: &EnzymeNames) -> Result<Self> {
        const EXPECTED_FIELD_COUNT: usize = 5;
        let fields: Vec<&str> = line.split(['\t', '\n']).collect();
        if fields.len() < EXPECTED_FIELD_COUNT {
            return Err(Error::MalformedRecord(format!(
                "expected at least {} tab-separated fields, found {}: {}",
                EXPECTED_FIELD_COUNT,
                fields.len(),
                line.trim_end()
            )));
        }

        let (id, ec_field, ils_score, num_positive_hits, num_negative_hits) =
            (fields[0], fields[1], fields[2], fields[3], fields[4]);

        let (strain, contig, start, end, gene_label) = split_identifier(id)?;
        let parse_coord = |value: &str| {
            value.parse::<u64>().map_err(|_| {
                Error::MalformedRecord(format!("invalid coordinate '{}' in ID '{}'", value, id))
            })
        };
        let start = parse_coord(start)?;
        let end = parse_coord(end)?;
        let gene_number = gene_index(gene_label)?;

        let ec_numbers = ec_field.split(';').map(|s| s.to_string()).collect_vec();
        let enzyme_names = ec_numbers
            .iter()
            .map(|ec| enzymes.resolve(ec).map(|name| name.to_string()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            strain: strain.to_string(),
            contig: contig.to_string(),
            start,
            end,
            gene_label: gene_label.to_string(),
            gene_number,
            ec_numbers,
            ils_score: ils_score.to_string(),
            num_positive_hits: num_positive_hits.to_string(),
            num_negative_hits: num_negative_hits.to_string(),
            enzyme_names,
        })
    }

    pub fn ec_field(&self) -> String {
        self.ec_numbers.join(";")
    }

    pub fn enzyme_name_field(&self) -> String {
        self.enzyme_names.join(";")
    }
}

fn split_identifier(id: &str) -> Result<(&str, &str, &str, &str, &str)> {
    let parts: Vec<&str> = id.split(['-', '_', ':']).collect();
    match parts[..] {
        [strain, contig, start, end, gene_label] => Ok((strain, contig, start, end, gene_label)),
        _ => Err(Error::MalformedRecord(format!(
            "ID '{}' does not split into strain, contig, start, end and gene label",
            id
        ))),
    }
}

/// Numeric gene index encoded in an AUGUSTUS gene label, e.g. `g12` -> 12.
pub fn gene_index(gene_label: &str) -> Result<u64> {
    gene_label
        .strip_prefix('g')
        .and_then(|digits| digits.parse::<u64>().ok())
        .ok_or_else(|| Error::MalformedRecord(format!("invalid gene label '{}'", gene_label)))
}

/// Reads all non-header DETECT lines into records. Header lines start with `ID`.
pub fn parse_records<R: std::io::BufRead>(
    reader: R,
    enzymes: &EnzymeNames,
) -> Result<Vec<EnzymeRecord>> {
    let mut records = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            Error::MalformedRecord(format!("error reading line {}: {}", line_number + 1, e))
        })?;
        if line.starts_with("ID") || line.trim().is_empty() {
            continue;
        }
        let record = EnzymeRecord::from_line(&line, enzymes).map_err(|e| match e {
            Error::MalformedRecord(msg) => {
                Error::MalformedRecord(format!("line {}: {}", line_number + 1, msg))
            }
            other => other,
        })?;
        log::debug!(
            "{} {} {}-{} {}",
            record.contig,
            record.gene_label,
            record.start,
            record.end,
            record.ec_field()
        );
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn enzymes() -> EnzymeNames {
        [
            ("1.1.1.1", "Alpha"),
            ("2.2.2.2", "Beta"),
            ("3.2.1.4", "Cellulase."),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn parses_single_ec_line() {
        let line = "NCYC1_contig12:1500-2700_g4\t3.2.1.4\t0.998\t12\t0\n";
        let record = EnzymeRecord::from_line(line, &enzymes()).unwrap();
        assert_eq!(record.strain, "NCYC1");
        assert_eq!(record.contig, "contig12");
        assert_eq!(record.start, 1500);
        assert_eq!(record.end, 2700);
        assert_eq!(record.gene_label, "g4");
        assert_eq!(record.gene_number, 4);
        assert_eq!(record.ec_numbers, vec!["3.2.1.4"]);
        assert_eq!(record.enzyme_names, vec!["Cellulase."]);
        assert_eq!(record.ils_score, "0.998");
        assert_eq!(record.num_positive_hits, "12");
        assert_eq!(record.num_negative_hits, "0");
    }

    #[test]
    fn resolves_each_of_multiple_ec_numbers() {
        let line = "NCYC1_contig1:10-20_g1\t1.1.1.1;2.2.2.2\t1.0\t3\t1";
        let record = EnzymeRecord::from_line(line, &enzymes()).unwrap();
        assert_eq!(record.ec_numbers, vec!["1.1.1.1", "2.2.2.2"]);
        assert_eq!(record.enzyme_names, vec!["Alpha", "Beta"]);
        assert_eq!(record.enzyme_name_field(), "Alpha;Beta");
    }

    #[test]
    fn fields_reserialize_to_original_tokens() {
        let id = "NCYC93_7:100-900_g17";
        let line = format!("{}\t1.1.1.1;3.2.1.4\t0.5\t2\t1", id);
        let record = EnzymeRecord::from_line(&line, &enzymes()).unwrap();
        let rebuilt = format!(
            "{}_{}:{}-{}_{}",
            record.strain, record.contig, record.start, record.end, record.gene_label
        );
        assert_eq!(rebuilt, id);
        assert_eq!(record.ec_field(), "1.1.1.1;3.2.1.4");
    }

    #[test]
    fn unknown_ec_number_is_fatal() {
        let line = "NCYC1_contig1:10-20_g1\t1.1.1.1;9.9.9.9\t1.0\t3\t1";
        let result = EnzymeRecord::from_line(line, &enzymes());
        assert!(matches!(result, Err(Error::UnknownECNumber(ec)) if ec == "9.9.9.9"));
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let line = "NCYC1_contig1:10-20_g1\t1.1.1.1\t1.0";
        let result = EnzymeRecord::from_line(line, &enzymes());
        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn identifier_with_extra_components_is_malformed() {
        let line = "NCYC_1_contig1:10-20_g1\t1.1.1.1\t1.0\t3\t1";
        let result = EnzymeRecord::from_line(line, &enzymes());
        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn non_numeric_gene_label_is_malformed() {
        assert!(gene_index("g12").is_ok());
        assert!(gene_index("gene12").is_err());
        assert!(gene_index("12").is_err());
        let line = "NCYC1_contig1:10-20_t1\t1.1.1.1\t1.0\t3\t1";
        assert!(matches!(
            EnzymeRecord::from_line(line, &enzymes()),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn parse_records_skips_header_and_reports_line() {
        let data = "\
ID\tpredictions\tprobability\tpositive_hits\tnegative_hits
NCYC1_contig1:10-20_g1\t1.1.1.1\t1.0\t3\t1
NCYC1_contig1:30-40_g2\t2.2.2.2\t0.9\t2\t0
NCYC1_contig1:50-60\t2.2.2.2\t0.9\t2\t0
";
        let result = parse_records(Cursor::new(data), &enzymes());
        match result {
            Err(Error::MalformedRecord(msg)) => assert!(msg.starts_with("line 4:")),
            other => panic!("unexpected result: {:?}", other),
        }

        let valid: String = data.lines().take(3).map(|l| format!("{}\n", l)).collect();
        let records = parse_records(Cursor::new(valid), &enzymes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].gene_label, "g2");
        assert_eq!(records[1].gene_number, 2);
    }
}
