pub mod build;
pub mod file_output;

/// Per-run switches set from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    DisableWarnings,
    DisableTimers,

    // Run every check and emit in memory, but write nothing
    NoOutputFiles,
}
