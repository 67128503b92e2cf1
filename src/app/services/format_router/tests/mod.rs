//! Shared test fixtures for format router tests


use crate::app::services::format_router::{DatasetPattern, FormatRouter, PatternTable};
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Router with a narrow premium pattern ahead of a broad catch-all
pub fn premium_router() -> FormatRouter {
    FormatRouter::new(PatternTable::new(vec![
        DatasetPattern::new(
            r"^premiums_\d{4}",
            "plan-premiums",
            "plan-premiums-v2",
        )
        .unwrap(),
        DatasetPattern::new(r"^enrollment_", "plan-enrollment", "plan-enrollment-v1").unwrap(),
    ]))
}

/// Build an in-memory ZIP from (name, content) members
pub fn build_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
