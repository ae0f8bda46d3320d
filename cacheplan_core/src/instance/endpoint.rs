//! This module provides the Endpoint struct representing a network access point

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Represents an endpoint through which client requests arrive
///
/// Each endpoint has a fixed latency to the remote origin datacenter, and a
/// set of connected caches each with its own (usually lower) latency.
/// Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Used to identify the endpoint (0..E-1)
    pub id: usize,
    /// Latency to the origin datacenter
    pub origin_latency: u64,
    /// Map of connected cache id to latency from this endpoint
    pub connections: IndexMap<usize, u64>,
}

impl Endpoint {
    /// Create a new endpoint with no cache connections
    pub fn new(id: usize, origin_latency: u64) -> Self {
        Endpoint {
            id,
            origin_latency,
            connections: IndexMap::new(),
        }
    }

    /// Latency from this endpoint to a cache, None if not connected
    pub fn cache_latency(&self, cache: usize) -> Option<u64> {
        self.connections.get(&cache).copied()
    }

    /// Whether this endpoint is connected to the given cache
    pub fn is_connected(&self, cache: usize) -> bool {
        self.connections.contains_key(&cache)
    }
}
