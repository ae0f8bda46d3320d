//! This module provides the Request struct representing an aggregated request descriptor

use serde::{Deserialize, Serialize};

/// Represents an aggregated set of client requests for one video from one endpoint
///
/// `count` is the number of individual client requests folded into this
/// descriptor. A dataset may list several descriptors for the same
/// (video, endpoint) pair; they are kept separate. Immutable after parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Id of the requested video
    pub video: usize,
    /// Id of the endpoint the requests arrive through
    pub endpoint: usize,
    /// Number of client requests aggregated into this descriptor
    pub count: u64,
}

impl Request {
    /// Create a new request descriptor
    pub fn new(video: usize, endpoint: usize, count: u64) -> Self {
        Request {
            video,
            endpoint,
            count,
        }
    }
}
