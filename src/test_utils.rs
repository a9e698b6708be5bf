//! Test utilities shared across the codebase

use std::fs;
use std::path::{Path, PathBuf};

/// Build the text of an XML comments file for `assembly` with the given member markup
pub fn comments_xml(assembly: &str, members: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<doc>\n    <assembly>\n        <name>{}</name>\n    </assembly>\n    <members>\n{}\n    </members>\n</doc>\n",
        assembly, members
    )
}

/// Write a comments file into `dir` and return its path
pub fn write_comments_file(dir: &Path, file_name: &str, assembly: &str, members: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, comments_xml(assembly, members)).expect("Failed to write comments file");
    path
}
