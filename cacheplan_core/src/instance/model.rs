//! This module provides the Instance struct for representing an entire placement problem instance

use serde::{Deserialize, Serialize};

use crate::instance::endpoint::Endpoint;
use crate::instance::request::Request;
use crate::instance::video::Video;

/// Represents a complete cache placement problem instance
///
/// Created once by the parser (see [`crate::io::instance_read`]) and read-only
/// afterwards; everything downstream (savings matrix, formulation) borrows
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Number of caches (ids 0..cache_count-1)
    pub cache_count: usize,
    /// Capacity shared by every cache, strictly positive
    pub cache_capacity: u64,
    /// Videos, indexed by id
    pub videos: Vec<Video>,
    /// Endpoints, indexed by id
    pub endpoints: Vec<Endpoint>,
    /// Request descriptors, in file order
    pub requests: Vec<Request>,
}

impl Instance {
    /// Number of videos in the instance
    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    /// Number of endpoints in the instance
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Number of request descriptors in the instance
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Size of a video by id
    pub fn video_size(&self, video: usize) -> u64 {
        self.videos[video].size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let instance = Instance {
            cache_count: 3,
            cache_capacity: 100,
            videos: vec![Video::new(0, 50), Video::new(1, 70)],
            endpoints: vec![Endpoint::new(0, 1000)],
            requests: vec![Request::new(1, 0, 1500)],
        };
        assert_eq!(instance.video_count(), 2);
        assert_eq!(instance.endpoint_count(), 1);
        assert_eq!(instance.request_count(), 1);
        assert_eq!(instance.video_size(1), 70);
    }
}
