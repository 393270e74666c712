//! # Serde module for Estimator
//!
//! `Estimator` is serialized as a byte string holding its versioned binary encoding
//! (see [`crate::codec`]), so serde formats carry exactly the bytes stored by the host.
//!
//! Deserialization decodes and validates the bytes; malformed input is reported as a
//! custom serde error.
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec;
use crate::estimator::Estimator;

impl Serialize for Estimator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&codec::encode(self))
    }
}

impl<'de> Deserialize<'de> for Estimator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        codec::decode(&bytes).map_err(Error::custom)
    }
}
