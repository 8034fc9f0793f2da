pub mod engine;
pub mod enzyme_db;
pub mod record;
pub mod report;

pub use engine::{cluster_contig, find_clusters, group_by_contig, Cluster, ClusterParams};
pub use enzyme_db::EnzymeNames;
pub use record::{parse_records, EnzymeRecord};
pub use report::{write_report, ClusterStats, ReportHeader};
