pub mod config; // Run configuration assembly for the workflow engine
pub mod data; // Data artifact resolution (legacy tree / default classifier)
pub mod defaults;
pub mod engine; // Workflow engine subprocess invocation
pub mod errors;
pub mod fasta_io; // FASTA reader/writer using bio::io::fasta
pub mod model; // Compressed classifier detection and inflation
pub mod qc; // Sequence QC filter (length / ambiguity triage)
pub mod report; // Short-circuit lineage report
pub mod resources; // Bundled workflow and resource file location
pub mod run; // Pipeline orchestration
