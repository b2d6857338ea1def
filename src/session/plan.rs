//! Stride and chunk-count arithmetic for slicing a PCM buffer.

use crate::error::{FunasrError, Result};
use crate::protocol::ChunkSize;
use std::ops::Range;

/// How a buffer is cut into audio messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Bytes per chunk.
    pub stride: usize,
    /// Number of chunks; the last one may be shorter than `stride`.
    pub count: usize,
    len: usize,
}

impl ChunkPlan {
    /// Plan chunks for `len` bytes of 16-bit audio at `sample_rate`.
    ///
    /// `stride = floor(60 * chunk_size[1] / chunk_interval / 1000 * sample_rate * 2)`,
    /// evaluated exactly in integers.
    pub fn new(
        len: usize,
        sample_rate: u32,
        chunk_size: ChunkSize,
        chunk_interval: u32,
    ) -> Result<Self> {
        let stride = stride_bytes(sample_rate, chunk_size, chunk_interval)?;
        Ok(Self {
            stride,
            count: len.div_ceil(stride),
            len,
        })
    }

    /// Byte range of chunk `index`.
    pub fn range(&self, index: usize) -> Range<usize> {
        let start = (index * self.stride).min(self.len);
        let end = (start + self.stride).min(self.len);
        start..end
    }

    /// Byte ranges of every chunk in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.count).map(|i| self.range(i))
    }
}

/// Bytes per chunk for the given stream parameters.
pub fn stride_bytes(sample_rate: u32, chunk_size: ChunkSize, chunk_interval: u32) -> Result<usize> {
    if chunk_interval == 0 {
        return Err(FunasrError::ConfigInvalidValue {
            key: "chunk_interval".to_string(),
            message: "must be positive".to_string(),
        });
    }

    let numerator = 120u64
        .checked_mul(u64::from(chunk_size.window()))
        .and_then(|n| n.checked_mul(u64::from(sample_rate)))
        .ok_or_else(|| FunasrError::ConfigInvalidValue {
            key: "chunk_size".to_string(),
            message: format!(
                "chunk window {} at {}Hz overflows the chunk stride",
                chunk_size.window(),
                sample_rate
            ),
        })?;
    let stride = numerator / (u64::from(chunk_interval) * 1000);
    if stride == 0 {
        return Err(FunasrError::ConfigInvalidValue {
            key: "chunk_size".to_string(),
            message: format!(
                "chunk window {} at {}Hz with interval {} yields an empty chunk",
                chunk_size.window(),
                sample_rate,
                chunk_interval
            ),
        });
    }

    usize::try_from(stride).map_err(|_| FunasrError::ConfigInvalidValue {
        key: "chunk_size".to_string(),
        message: "chunk stride does not fit in memory".to_string(),
    })
}
