// Fee schedule domain
pub mod fees;

// Fee-group code table
pub mod fee_groups;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
