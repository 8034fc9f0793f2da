pub mod filename;
pub mod scanner;
pub mod writer;

pub use filename::{decode_filename, Decoded, ExtractModes, FileMetadata, NamingMode};
pub use scanner::{scan_gene_blocks, GeneBlock, GeneIndex, ScanState};
pub use writer::{write_sequences, OutputLayout};
