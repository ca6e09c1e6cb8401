//! Library side of the `csv-recon` command line tool.

pub mod commands;
pub mod logging;
pub mod report;
