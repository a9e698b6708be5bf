//! XML Comments Library
//!
//! This library collects the XML documentation comments files of a help build,
//! resolves member lookups across them, and extracts the namespaces they reference.

pub mod docs;
pub mod settings;
#[cfg(test)]
pub mod test_utils;
