use rayon::prelude::*;
use tracing::debug;

use crate::{
    ctx::RainbowTableCtx,
    error::{PrismError, PrismResult},
    hash::Digest,
    password::Password,
    rainbow_table::RainbowTable,
};

/// Inverts digests with a rainbow table.
///
/// A cracker can only be built if the table was generated with the context in use,
/// so a lookup never runs against a table computed with other reduction functions.
/// The table is never modified, several digests can be cracked in parallel.
#[derive(Clone, Copy, Debug)]
pub struct Cracker<'a> {
    table: &'a RainbowTable,
}

impl<'a> Cracker<'a> {
    pub fn new(table: &'a RainbowTable, ctx: &RainbowTableCtx) -> PrismResult<Self> {
        ctx.check_metadata(&table.metadata())?;

        Ok(Self { table })
    }

    pub fn table(&self) -> &'a RainbowTable {
        self.table
    }

    pub fn ctx(&self) -> &'a RainbowTableCtx {
        self.table.ctx()
    }

    /// Searches for a password hashing to `digest`.
    /// Returns `Ok(None)` when the table does not cover the digest.
    pub fn crack(&self, digest: &Digest) -> PrismResult<Option<Password>> {
        let hash_function = self.ctx().hash_function();

        if digest.len() != hash_function.digest_size() {
            return Err(PrismError::InvalidInput(format!(
                "a {hash_function} digest is {} bytes long, got {}",
                hash_function.digest_size(),
                digest.len()
            )));
        }

        let found = self.table.search(digest);

        match &found {
            Some(password) => debug!(%digest, %password, "digest cracked"),
            None => debug!(%digest, "digest not found"),
        }

        Ok(found)
    }

    /// Parses a hexadecimal digest and searches for a password hashing to it.
    pub fn crack_hex(&self, hex: &str) -> PrismResult<Option<Password>> {
        self.crack(&self.ctx().digest(hex)?)
    }

    /// Cracks several digests in parallel.
    /// The results are in the order of the digests.
    pub fn crack_many(&self, digests: &[Digest]) -> Vec<PrismResult<Option<Password>>> {
        digests.par_iter().map(|digest| self.crack(digest)).collect()
    }
}
