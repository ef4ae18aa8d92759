use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
};

use digest::Digest as _;
use md4::Md4;
use md5::Md5;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::{
    error::{PrismError, PrismResult},
    ntlm::ntlm,
};

/// All the supported hash functions.
#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Ntlm,
    Md4,
    #[default]
    Md5,
    Sha1,
    Sha2_224,
    Sha2_256,
    Sha2_384,
    Sha2_512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashFunction {
    pub const ALL: [HashFunction; 12] = [
        Self::Ntlm,
        Self::Md4,
        Self::Md5,
        Self::Sha1,
        Self::Sha2_224,
        Self::Sha2_256,
        Self::Sha2_384,
        Self::Sha2_512,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
    ];

    /// Hashes a byte slice using the right hash function.
    #[inline]
    pub fn hash(&self, data: &[u8]) -> Digest {
        let bytes = match self {
            Self::Ntlm => ntlm(data).to_vec(),
            Self::Md4 => Md4::digest(data).to_vec(),
            Self::Md5 => Md5::digest(data).to_vec(),
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha2_224 => Sha224::digest(data).to_vec(),
            Self::Sha2_256 => Sha256::digest(data).to_vec(),
            Self::Sha2_384 => Sha384::digest(data).to_vec(),
            Self::Sha2_512 => Sha512::digest(data).to_vec(),
            Self::Sha3_224 => Sha3_224::digest(data).to_vec(),
            Self::Sha3_256 => Sha3_256::digest(data).to_vec(),
            Self::Sha3_384 => Sha3_384::digest(data).to_vec(),
            Self::Sha3_512 => Sha3_512::digest(data).to_vec(),
        };

        Digest(bytes)
    }

    /// Gets the digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            Self::Ntlm | Self::Md4 => Md4::output_size(),
            Self::Md5 => Md5::output_size(),
            Self::Sha1 => Sha1::output_size(),
            Self::Sha2_224 => Sha224::output_size(),
            Self::Sha2_256 => Sha256::output_size(),
            Self::Sha2_384 => Sha384::output_size(),
            Self::Sha2_512 => Sha512::output_size(),
            Self::Sha3_224 => Sha3_224::output_size(),
            Self::Sha3_256 => Sha3_256::output_size(),
            Self::Sha3_384 => Sha3_384::output_size(),
            Self::Sha3_512 => Sha3_512::output_size(),
        }
    }

    /// The identifier stored in the metadata of a rainbow table.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Ntlm => "ntlm",
            Self::Md4 => "md4",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha2_224 => "sha2-224",
            Self::Sha2_256 => "sha2-256",
            Self::Sha2_384 => "sha2-384",
            Self::Sha2_512 => "sha2-512",
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
        }
    }
}

impl Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for HashFunction {
    type Err = PrismError;

    fn from_str(s: &str) -> PrismResult<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.identifier() == s)
            .ok_or_else(|| PrismError::InvalidInput(format!("unknown hash function \"{s}\"")))
    }
}

/// The output of a hash function.
/// It is serialized as a lowercase hexadecimal string.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Parses a hexadecimal digest produced by `hash_function`.
    pub fn from_hex(hex: &str, hash_function: HashFunction) -> PrismResult<Self> {
        let bytes = hex::decode(hex.trim())
            .map_err(|_| PrismError::InvalidInput(format!("\"{hex}\" is not valid hexadecimal")))?;

        if bytes.len() != hash_function.digest_size() {
            return Err(PrismError::InvalidInput(format!(
                "a {hash_function} digest is {} bytes long, got {}",
                hash_function.digest_size(),
                bytes.len()
            )));
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Digest as Display>::fmt(self, f)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex::decode(&hex).map(Digest).map_err(de::Error::custom)
    }
}
