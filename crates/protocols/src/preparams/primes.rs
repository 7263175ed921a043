//! CGGMP24 pregenerated primes as pooled pre-parameters.
//!
//! Safe prime generation is computationally expensive (30-120 seconds for
//! 2048-bit safe primes), which is what makes keeping a few sets ready
//! worthwhile.

use std::time::Instant;

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::generator::{GenerationError, ParamsGenerator};

/// Security level the primes are generated for.
pub type PrimesSecurityLevel = cggmp24::security_level::SecurityLevel128;

/// Wrapper for serializable pregenerated primes.
///
/// We store the primes as bincode-serialized bytes since
/// cggmp24::PregeneratedPrimes implements serde traits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPrimes {
    /// Version for future compatibility
    pub version: u32,
    /// Party index this was generated for
    pub party_index: u16,
    /// Serialized primes data (bincode format)
    #[serde(with = "base64_bytes")]
    pub primes_data: Vec<u8>,
    /// Timestamp when generated (Unix seconds)
    pub generated_at: u64,
}

/// Custom serialization for binary data as base64
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = STANDARD.encode(bytes);
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

impl StoredPrimes {
    pub const CURRENT_VERSION: u32 = 1;

    /// Deserialize back to cggmp24::PregeneratedPrimes.
    pub fn primes(&self) -> Result<cggmp24::PregeneratedPrimes<PrimesSecurityLevel>, GenerationError> {
        bincode::deserialize(&self.primes_data)
            .map_err(|e| GenerationError::Serialization(e.to_string()))
    }
}

/// Generates pregenerated primes for one party.
#[derive(Debug, Clone)]
pub struct PrimesGenerator {
    party_index: u16,
}

impl PrimesGenerator {
    pub fn new(party_index: u16) -> Self {
        Self { party_index }
    }

    pub fn party_index(&self) -> u16 {
        self.party_index
    }
}

impl ParamsGenerator<StoredPrimes> for PrimesGenerator {
    fn generate(&mut self) -> Result<StoredPrimes, GenerationError> {
        info!(
            "Generating pregenerated primes for party {} (this may take 30-120 seconds)",
            self.party_index
        );
        let start = Instant::now();

        let primes: cggmp24::PregeneratedPrimes<PrimesSecurityLevel> =
            cggmp24::PregeneratedPrimes::generate(&mut OsRng);

        let primes_data = bincode::serialize(&primes)
            .map_err(|e| GenerationError::Serialization(e.to_string()))?;

        let generated_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        info!(
            "Prime generation completed in {:.2}s ({} bytes serialized)",
            start.elapsed().as_secs_f64(),
            primes_data.len()
        );

        Ok(StoredPrimes {
            version: StoredPrimes::CURRENT_VERSION,
            party_index: self.party_index,
            primes_data,
            generated_at,
        })
    }
}
