//! Writer (and re-reader) for the submission output format
//!
//! ```text
//! line 1:  number of caches that store at least one video
//! then, per such cache:  cacheId videoId1 videoId2 ...
//! ```
//!
//! Caches storing nothing are omitted entirely. Output order is ascending
//! cache id, with video ids ascending within a line, so the same solution
//! always serializes identically.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::io::{FormatError, IoError};
use crate::optimize::solution::PlacementSolution;
use crate::PlanError;

/// Serialize a solution into a writer
pub fn write_submission<W: Write>(
    solution: &PlacementSolution,
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(writer, "{}", solution.cache_count())?;
    for (cache, videos) in solution.iter() {
        write!(writer, "{}", cache)?;
        for video in videos {
            write!(writer, " {}", video)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Serialize a solution to a file, creating or truncating it
pub fn write_submission_file<P: AsRef<Path>>(
    solution: &PlacementSolution,
    path: P,
) -> Result<(), IoError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IoError::new(path, source))?;
    let mut writer = BufWriter::new(file);
    write_submission(solution, &mut writer).map_err(|source| IoError::new(path, source))?;
    writer.flush().map_err(|source| IoError::new(path, source))
}

/// Parse a submission back into a [`PlacementSolution`]
///
/// Used for round-trip checks and for inspecting previously written output.
/// Rejects short files, malformed integers, and duplicate video ids within a
/// cache line.
pub fn read_submission(input: &str) -> Result<PlacementSolution, FormatError> {
    let lines: Vec<&str> = input.lines().map(str::trim).collect();
    let first = lines.first().ok_or(FormatError::UnexpectedEnd { line: 0 })?;
    let cache_lines = parse_integer(first, 0)?;

    let mut solution = PlacementSolution::default();
    for offset in 0..cache_lines {
        let line = offset + 1;
        let raw = lines
            .get(line)
            .ok_or(FormatError::UnexpectedEnd { line })?;
        let mut fields = raw.split_whitespace();
        let cache = match fields.next() {
            Some(token) => parse_integer(token, line)?,
            None => {
                return Err(FormatError::FieldCount {
                    line,
                    expected: 2,
                    found: 0,
                })
            }
        };
        let mut placed_any = false;
        for token in fields {
            let video = parse_integer(token, line)?;
            if solution
                .videos_on(cache)
                .is_some_and(|videos| videos.contains(&video))
            {
                return Err(FormatError::DuplicateVideo { line, video });
            }
            solution.place(cache, video);
            placed_any = true;
        }
        if !placed_any {
            return Err(FormatError::FieldCount {
                line,
                expected: 2,
                found: 1,
            });
        }
    }
    Ok(solution)
}

/// Read and parse a submission file from disk
pub fn read_submission_file<P: AsRef<Path>>(path: P) -> Result<PlacementSolution, PlanError> {
    let path = path.as_ref();
    let input =
        std::fs::read_to_string(path).map_err(|source| IoError::new(path, source))?;
    Ok(read_submission(&input)?)
}

fn parse_integer(token: &str, line: usize) -> Result<usize, FormatError> {
    token
        .parse::<usize>()
        .map_err(|_| FormatError::InvalidInteger {
            line,
            token: token.to_string(),
        })
}
