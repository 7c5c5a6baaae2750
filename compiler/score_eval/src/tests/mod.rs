//! Test modules relocated from implementation files.
//!
//! Inline test modules that outgrow their implementation file are moved to
//! separate files in this directory.
