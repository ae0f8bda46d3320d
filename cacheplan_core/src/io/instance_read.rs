//! Parser for the whitespace-delimited instance file format
//!
//! The format, one logical record per line:
//!
//! ```text
//! line 1:           V E R C X
//! line 2:           V video sizes
//! for e in 0..E-1:  originLatency[e] K_e, then K_e lines "cacheId latency"
//! for r in 0..R-1:  videoId endpointId count
//! ```
use std::fs;
use std::path::Path;

use crate::instance::endpoint::Endpoint;
use crate::instance::model::Instance;
use crate::instance::request::Request;
use crate::instance::video::Video;
use crate::io::{FormatError, IoError};
use crate::PlanError;

/// Cursor over the lines of an instance file, tracking the current line index
/// so every error can name the offending line.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        LineCursor {
            lines: input.lines().map(str::trim).collect(),
            pos: 0,
        }
    }

    /// Take the next line, split into exactly `expected` integer fields
    fn next_record(&mut self, expected: usize) -> Result<Vec<u64>, FormatError> {
        let line = self.pos;
        let raw = self
            .lines
            .get(line)
            .ok_or(FormatError::UnexpectedEnd { line })?;
        self.pos += 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.len() != expected {
            return Err(FormatError::FieldCount {
                line,
                expected,
                found: fields.len(),
            });
        }
        fields
            .iter()
            .map(|token| parse_field(token, line))
            .collect()
    }

    /// Index of the line the cursor is about to read
    fn line(&self) -> usize {
        self.pos
    }
}

fn parse_field(token: &str, line: usize) -> Result<u64, FormatError> {
    token.parse::<u64>().map_err(|_| FormatError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}

impl Instance {
    /// Parse an instance from its textual representation
    ///
    /// # Parameters
    /// - `input`: the full contents of an instance file
    ///
    /// # Returns
    /// The parsed [`Instance`], or a [`FormatError`] naming the zero-based
    /// index of the offending line when token counts mismatch, integers fail
    /// to parse, a size or the capacity is zero, or an id is out of range.
    pub fn parse(input: &str) -> Result<Instance, FormatError> {
        let mut cursor = LineCursor::new(input);

        // Header: V E R C X
        let header_line = cursor.line();
        let header = cursor.next_record(5)?;
        let video_count = header[0] as usize;
        let endpoint_count = header[1] as usize;
        let request_count = header[2] as usize;
        let cache_count = header[3] as usize;
        let cache_capacity = header[4];
        if cache_capacity == 0 {
            return Err(FormatError::NonPositive {
                line: header_line,
                what: "cache capacity",
            });
        }

        // Video sizes
        let sizes_line = cursor.line();
        let sizes = cursor.next_record(video_count)?;
        let videos = sizes
            .into_iter()
            .enumerate()
            .map(|(id, size)| {
                if size == 0 {
                    Err(FormatError::NonPositive {
                        line: sizes_line,
                        what: "video size",
                    })
                } else {
                    Ok(Video::new(id, size))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Endpoints with their cache connections
        let mut endpoints = Vec::with_capacity(endpoint_count);
        for id in 0..endpoint_count {
            let record = cursor.next_record(2)?;
            let mut endpoint = Endpoint::new(id, record[0]);
            let connection_count = record[1] as usize;
            for _ in 0..connection_count {
                let line = cursor.line();
                let connection = cursor.next_record(2)?;
                let cache = connection[0] as usize;
                if cache >= cache_count {
                    return Err(FormatError::IdOutOfRange {
                        line,
                        what: "cache",
                        id: cache,
                        limit: cache_count,
                    });
                }
                endpoint.connections.insert(cache, connection[1]);
            }
            endpoints.push(endpoint);
        }

        // Request descriptors
        let mut requests = Vec::with_capacity(request_count);
        for _ in 0..request_count {
            let line = cursor.line();
            let record = cursor.next_record(3)?;
            let video = record[0] as usize;
            let endpoint = record[1] as usize;
            if video >= video_count {
                return Err(FormatError::IdOutOfRange {
                    line,
                    what: "video",
                    id: video,
                    limit: video_count,
                });
            }
            if endpoint >= endpoint_count {
                return Err(FormatError::IdOutOfRange {
                    line,
                    what: "endpoint",
                    id: endpoint,
                    limit: endpoint_count,
                });
            }
            requests.push(Request::new(video, endpoint, record[2]));
        }

        Ok(Instance {
            cache_count,
            cache_capacity,
            videos,
            endpoints,
            requests,
        })
    }

    /// Read and parse an instance file from disk
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Instance, PlanError> {
        let path = path.as_ref();
        let input =
            fs::read_to_string(path).map_err(|source| IoError::new(path, source))?;
        Ok(Instance::parse(&input)?)
    }
}
