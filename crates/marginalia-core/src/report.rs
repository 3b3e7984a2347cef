use crate::model::{severity_name, CommentGroups};
use std::io::{self, Write};

/// Write the grouped comment report.
///
/// Groups come out highest severity first; each group is a header
/// line, a blank line, the comment lines in collection order, and a
/// trailing blank line. Empty groups write nothing at all, so a
/// document without comments produces an empty file.
pub fn write_report<W: Write>(groups: &CommentGroups, mut out: W) -> io::Result<()> {
    for (severity, lines) in groups.iter_descending() {
        writeln!(out, "{}:", severity_name(severity))?;
        writeln!(out)?;
        for line in lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
