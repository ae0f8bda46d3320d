//! This module provides the Video struct representing a fixed-size content item

use serde::{Deserialize, Serialize};

/// Represents a video that can be placed on caches
///
/// Immutable after parse; the id doubles as the index into
/// [`Instance::videos`](crate::instance::model::Instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Used to identify the video (0..V-1)
    pub id: usize,
    /// Size of the video in capacity units, strictly positive
    pub size: u64,
}

impl Video {
    /// Create a new video
    pub fn new(id: usize, size: u64) -> Self {
        Video { id, size }
    }
}
