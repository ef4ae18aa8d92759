use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PrismError, PrismResult},
    hash::{Digest, HashFunction},
    password::Password,
    reduce::REDUCTION_VERSION,
    space::{ascii_to_charset, counter_to_plaintext},
    DEFAULT_CHAIN_COUNT, DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET, DEFAULT_PASSWORD_LENGTH,
    MAX_CHARSET_LENGTH_ALLOWED, MAX_PASSWORD_LENGTH_ALLOWED,
};

/// A builder for a rainbow table context.
#[derive(Clone, Debug)]
pub struct RainbowTableCtxBuilder {
    hash_function: HashFunction,
    charset: Vec<u8>,
    password_length: u8,
    t: u64,
    m0: u64,
}

impl Default for RainbowTableCtxBuilder {
    fn default() -> Self {
        Self {
            hash_function: HashFunction::default(),
            charset: DEFAULT_CHARSET.to_owned(),
            password_length: DEFAULT_PASSWORD_LENGTH,
            t: DEFAULT_CHAIN_LENGTH,
            m0: DEFAULT_CHAIN_COUNT,
        }
    }
}

impl RainbowTableCtxBuilder {
    /// Creates a new RainbowTableCtxBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash function of the context.
    pub fn hash(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;

        self
    }

    /// Sets the charset of the context.
    /// The order of the characters matters: it is part of the reduction functions.
    pub fn charset(mut self, charset: &[u8]) -> Self {
        self.charset = charset.to_owned();

        self
    }

    /// Sets the length of every password of the context.
    pub fn password_length(mut self, password_length: u8) -> Self {
        self.password_length = password_length;

        self
    }

    /// Sets the length of the chain of the context.
    /// Increasing the chain length will reduce the memory used
    /// to store the table but increase the time taken to attack.
    pub fn chain_length(mut self, chain_length: u64) -> Self {
        self.t = chain_length;

        self
    }

    /// Sets the number of chains to generate.
    pub fn chains(mut self, chains: u64) -> Self {
        self.m0 = chains;

        self
    }

    /// Builds a RainbowTableCtx with the specified parameters.
    pub fn build(self) -> PrismResult<RainbowTableCtx> {
        check_charset(&self.charset)?;

        if self.password_length == 0 || self.password_length as usize > MAX_PASSWORD_LENGTH_ALLOWED
        {
            return Err(PrismError::PasswordLength(MAX_PASSWORD_LENGTH_ALLOWED as u8));
        }

        if self.t == 0 {
            return Err(PrismError::ChainLength);
        }

        // make sure the search space is <= 2^64
        let n = (self.charset.len() as u64)
            .checked_pow(self.password_length as u32)
            .ok_or_else(|| {
                let bits = (self.charset.len() as f64).log2() * self.password_length as f64;
                PrismError::Space(bits.ceil() as u8)
            })?;

        Ok(RainbowTableCtx {
            m0: self.m0,
            hash_function: self.hash_function,
            charset: self.charset,
            t: self.t,
            password_length: self.password_length,
            n,
        })
    }
}

/// Checks that a charset is made of at least two distinct printable ASCII characters.
fn check_charset(charset: &[u8]) -> PrismResult<()> {
    if charset.len() < 2 {
        return Err(PrismError::Charset("at least 2 characters are needed"));
    }

    if charset.len() > MAX_CHARSET_LENGTH_ALLOWED {
        return Err(PrismError::Charset("at most 126 characters are allowed"));
    }

    if !charset.iter().all(|c| c.is_ascii_graphic() || *c == b' ') {
        return Err(PrismError::Charset("only printable ASCII characters are allowed"));
    }

    if !charset.iter().all_unique() {
        return Err(PrismError::Charset("characters should not be repeated"));
    }

    Ok(())
}

/// Context used to store all parameters used to generate and search a rainbow table.
/// It is immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RainbowTableCtx {
    /// The number of chains to generate.
    m0: u64,
    /// The hash function used.
    hash_function: HashFunction,
    /// The charset used.
    charset: Vec<u8>,
    /// The length of a chain.
    t: u64,
    /// The length of every password.
    password_length: u8,
    /// The size of the total search space.
    n: u64,
}

impl RainbowTableCtx {
    /// Rebuilds the context a table was generated with.
    /// The number of chains is not part of the metadata and is set to 0.
    pub fn from_metadata(metadata: &TableMetadata) -> PrismResult<Self> {
        if metadata.reduction_version != REDUCTION_VERSION {
            return Err(PrismError::ConfigMismatch {
                field: "reduction_version",
                expected: REDUCTION_VERSION.to_owned(),
                found: metadata.reduction_version.clone(),
            });
        }

        let password_length = u8::try_from(metadata.password_length)
            .map_err(|_| PrismError::PasswordLength(MAX_PASSWORD_LENGTH_ALLOWED as u8))?;

        RainbowTableCtxBuilder::new()
            .hash(metadata.hash_algorithm.parse()?)
            .charset(metadata.alphabet.as_bytes())
            .password_length(password_length)
            .chain_length(metadata.chain_length)
            .chains(0)
            .build()
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    pub fn charset(&self) -> &[u8] {
        &self.charset
    }

    pub fn password_length(&self) -> usize {
        self.password_length as usize
    }

    /// The length of a chain (K).
    pub fn chain_length(&self) -> u64 {
        self.t
    }

    /// The number of chains to generate (N).
    pub fn chains(&self) -> u64 {
        self.m0
    }

    /// The number of passwords in the search space.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Returns the metadata describing the tables generated with this context.
    pub fn metadata(&self) -> TableMetadata {
        TableMetadata {
            alphabet: String::from_utf8_lossy(&self.charset).into_owned(),
            password_length: self.password_length as u32,
            chain_length: self.t,
            reduction_version: REDUCTION_VERSION.to_owned(),
            hash_algorithm: self.hash_function.identifier().to_owned(),
        }
    }

    /// Makes sure a table described by `metadata` can be used with this context.
    pub fn check_metadata(&self, metadata: &TableMetadata) -> PrismResult<()> {
        let expected = self.metadata();

        let fields = [
            ("hash_algorithm", &expected.hash_algorithm, &metadata.hash_algorithm),
            ("reduction_version", &expected.reduction_version, &metadata.reduction_version),
            ("alphabet", &expected.alphabet, &metadata.alphabet),
        ];

        for (field, expected, found) in fields {
            if expected != found {
                return Err(PrismError::ConfigMismatch {
                    field,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }

        let fields = [
            ("password_length", expected.password_length as u64, metadata.password_length as u64),
            ("chain_length", expected.chain_length, metadata.chain_length),
        ];

        for (field, expected, found) in fields {
            if expected != found {
                return Err(PrismError::ConfigMismatch {
                    field,
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validates a password against the charset and the password length.
    pub fn password(&self, text: &str) -> PrismResult<Password> {
        self.check_password(text.as_bytes())?;

        Ok(Password::from_raw(text.as_bytes().to_owned()))
    }

    pub(crate) fn check_password(&self, password: &[u8]) -> PrismResult<()> {
        if password.len() != self.password_length() {
            return Err(PrismError::InvalidInput(format!(
                "\"{}\" should be {} characters long",
                String::from_utf8_lossy(password),
                self.password_length
            )));
        }

        if let Some(c) = password
            .iter()
            .find(|&&c| ascii_to_charset(c, &self.charset).is_none())
        {
            return Err(PrismError::InvalidInput(format!(
                "\"{}\" is not part of the charset",
                char::from(*c)
            )));
        }

        Ok(())
    }

    /// Parses a hexadecimal digest of the context's hash function.
    pub fn digest(&self, hex: &str) -> PrismResult<Digest> {
        Digest::from_hex(hex, self.hash_function)
    }

    /// Hashes a password with the context's hash function.
    #[inline]
    pub fn hash(&self, password: &Password) -> Digest {
        self.hash_function.hash(password.as_bytes())
    }

    /// Picks a password uniformly at random in the search space.
    pub fn random_password<R: Rng + ?Sized>(&self, rng: &mut R) -> Password {
        counter_to_plaintext(rng.gen_range(0..self.n), self)
    }
}

/// The metadata stored alongside a rainbow table.
/// It is checked against the current context before a table is used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub alphabet: String,
    pub password_length: u32,
    pub chain_length: u64,
    pub reduction_version: String,
    pub hash_algorithm: String,
}

/// Builds the context of the small scenario used across the tests:
/// charset "abc", passwords of length 2 and chains of length 3.
#[cfg(test)]
pub fn build_test_ctx() -> RainbowTableCtx {
    RainbowTableCtxBuilder::new()
        .hash(HashFunction::Md5)
        .charset(b"abc")
        .password_length(2)
        .chain_length(3)
        .chains(1)
        .build()
        .unwrap()
}
