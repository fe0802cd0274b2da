//! Bin record payload and its stream encoding.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpillError};

use super::MAX_FEATURES;

/// One unit of data associated with a spatial bin index.
///
/// Carries the accumulated observation count and the per-band feature
/// values produced by the upstream binning stage. The store itself never
/// interprets the payload; it only needs the key and a fixed serialization
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinRecord {
    /// Spatial bin index (non-negative)
    pub key: i64,

    /// Number of observations accumulated into this record
    pub num_obs: i32,

    /// Per-band feature values
    pub features: Vec<f32>,
}

impl BinRecord {
    /// Create a new record
    pub fn new(key: i64, num_obs: i32, features: Vec<f32>) -> Self {
        Self {
            key,
            num_obs,
            features,
        }
    }

    /// Write the record payload to a stream.
    ///
    /// The key is not written; it belongs to the enclosing run header.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.num_obs.to_be_bytes())?;
        writer.write_all(&(self.features.len() as i32).to_be_bytes())?;
        for feature in &self.features {
            writer.write_all(&feature.to_be_bytes())?;
        }
        Ok(())
    }

    /// Read one record payload from a stream.
    ///
    /// `key` comes from the enclosing run header. A truncated payload or an
    /// implausible feature count is a [`SpillError::PageCorruption`].
    pub fn read_from<R: Read>(key: i64, reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 4];

        reader
            .read_exact(&mut buf)
            .map_err(|e| truncated("record observation count", e))?;
        let num_obs = i32::from_be_bytes(buf);

        reader
            .read_exact(&mut buf)
            .map_err(|e| truncated("record feature count", e))?;
        let feature_count = i32::from_be_bytes(buf);

        if !(0..=MAX_FEATURES).contains(&feature_count) {
            return Err(SpillError::PageCorruption(format!(
                "implausible feature count {} for key {}",
                feature_count, key
            )));
        }

        let mut features = Vec::with_capacity(feature_count as usize);
        for _ in 0..feature_count {
            reader
                .read_exact(&mut buf)
                .map_err(|e| truncated("record feature value", e))?;
            features.push(f32::from_be_bytes(buf));
        }

        Ok(Self {
            key,
            num_obs,
            features,
        })
    }

    /// Encoded size of this record's payload in bytes
    pub fn encoded_len(&self) -> usize {
        8 + self.features.len() * 4
    }
}

/// Mid-record EOF means the page file was cut short: fatal.
fn truncated(what: &str, err: std::io::Error) -> SpillError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        SpillError::PageCorruption(format!("truncated {}", what))
    } else {
        SpillError::Io(err)
    }
}
