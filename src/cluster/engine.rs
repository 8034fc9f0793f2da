use super::record::EnzymeRecord;
use itertools::Itertools;
use std::collections::BTreeMap;

pub type Cluster = Vec<EnzymeRecord>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Maximum gene-index gap between consecutive cluster members.
    pub sep_genes: u64,
    /// Maximum distance in bases from the previous gene's end to the next gene's start.
    pub sep_dist: u64,
    pub min_cluster_size: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            sep_genes: 6,
            sep_dist: 10000,
            min_cluster_size: 2,
        }
    }
}

/// Groups records by contig, keeping input order within each contig.
pub fn group_by_contig(records: Vec<EnzymeRecord>) -> BTreeMap<String, Vec<EnzymeRecord>> {
    let mut groups: BTreeMap<String, Vec<EnzymeRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.contig.clone()).or_default().push(record);
    }
    groups
}

/// Partitions every contig into greedy runs of nearby genes. Contigs without a
/// retained cluster are left out of the result.
pub fn find_clusters(
    groups: BTreeMap<String, Vec<EnzymeRecord>>,
    params: &ClusterParams,
) -> BTreeMap<String, Vec<Cluster>> {
    groups
        .into_iter()
        .filter(|(_, records)| records.len() >= 2)
        .filter_map(|(contig, records)| {
            let clusters = cluster_contig(records, params);
            log::debug!("Contig {}: {} clusters", contig, clusters.len());
            (!clusters.is_empty()).then_some((contig, clusters))
        })
        .collect()
}

pub fn cluster_contig(records: Vec<EnzymeRecord>, params: &ClusterParams) -> Vec<Cluster> {
    let sorted = records
        .into_iter()
        .sorted_by_key(|record| record.gene_number)
        .collect_vec();

    let mut clusters = Vec::new();
    let mut current: Cluster = Vec::new();
    let mut previous_gene_index: Option<u64> = None;
    let mut previous_end: u64 = 0;

    let close = |cluster: Cluster, clusters: &mut Vec<Cluster>| {
        if cluster.len() >= params.min_cluster_size {
            clusters.push(cluster);
        } else {
            log::debug!("Discarding run of {} genes", cluster.len());
        }
    };

    for record in sorted {
        let gene_index = record.gene_number;
        let (start, end) = (record.start, record.end);
        let is_adjacent = match previous_gene_index {
            None => true,
            Some(prev) => {
                let gene_gap = gene_index as i128 - prev as i128;
                let base_gap = start as i128 - previous_end as i128;
                gene_gap <= params.sep_genes as i128 && base_gap <= params.sep_dist as i128
            }
        };

        if is_adjacent {
            current.push(record);
        } else {
            close(std::mem::take(&mut current), &mut clusters);
            current.push(record);
        }
        previous_gene_index = Some(gene_index);
        previous_end = end;
    }
    close(current, &mut clusters);

    clusters
}
