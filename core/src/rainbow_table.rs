use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use bincode::Options;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    builder::TableBuilder,
    chain::{ChainWalker, RainbowChain},
    ctx::{RainbowTableCtx, TableMetadata},
    error::{PrismError, PrismResult},
    event::RainbowTableHandle,
    hash::Digest,
    password::Password,
    rainbow_chain_map::RainbowChainMap,
};

/// The first bytes of every stored rainbow table.
pub const MAGIC: [u8; 8] = *b"PRISMRT\0";

/// The version of the stored table layout.
pub const FORMAT_VERSION: u32 = 1;

/// The capacity of the buffers used to store and load tables.
const BUFFER_CAPACITY: usize = 1024 * 1024 * 16;

/// The maximum size of the prelude and of the header of a stored table.
const HEADER_LIMIT: u64 = 4096;

/// The chains as they are stored, before their startpoints are checked.
type StoredChains = IndexMap<Digest, Vec<String>>;

#[derive(Serialize, Deserialize)]
struct Prelude {
    magic: [u8; 8],
    format_version: u32,
}

/// The header of a stored rainbow table, read before any chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHeader {
    pub metadata: TableMetadata,
    pub endpoint_count: u64,
}

/// A rainbow table: the endpoints of its chains mapped to their startpoints,
/// along with the context the chains were computed with.
#[derive(Clone, Debug)]
pub struct RainbowTable {
    chains: RainbowChainMap,
    ctx: RainbowTableCtx,
}

impl RainbowTable {
    /// Creates a new rainbow table with the default backend.
    pub fn new(ctx: RainbowTableCtx) -> PrismResult<Self> {
        TableBuilder::new(ctx).build()
    }

    /// Creates a new rainbow table on another thread with the default backend.
    /// The returned handle gives access to the generation events.
    pub fn new_with_events(ctx: RainbowTableCtx) -> RainbowTableHandle {
        TableBuilder::new(ctx).build_with_events()
    }

    /// Creates an empty rainbow table.
    pub fn empty(ctx: RainbowTableCtx) -> Self {
        Self {
            chains: RainbowChainMap::new(),
            ctx,
        }
    }

    pub(crate) fn with_capacity(ctx: RainbowTableCtx, capacity: usize) -> Self {
        Self {
            chains: RainbowChainMap::with_capacity(capacity),
            ctx,
        }
    }

    /// Creates a rainbow table from already computed chains.
    pub fn from_chains<I: IntoIterator<Item = RainbowChain>>(chains: I, ctx: RainbowTableCtx) -> Self {
        Self {
            chains: chains.into_iter().collect(),
            ctx,
        }
    }

    /// Inserts a chain. A colliding endpoint keeps every startpoint.
    /// Returns `true` if the endpoint is new.
    #[inline]
    pub fn insert(&mut self, chain: RainbowChain) -> bool {
        self.chains.insert(chain)
    }

    /// Returns the startpoints of the chains ending at `endpoint`.
    #[inline]
    pub fn get(&self, endpoint: &Digest) -> Option<&[Password]> {
        self.chains.get(endpoint)
    }

    /// Returns the number of distinct endpoints stored in the table.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Returns the number of chains stored in the table, colliding ones included.
    pub fn chain_count(&self) -> usize {
        self.chains.chain_count()
    }

    /// Returns an iterator over the endpoints and their startpoints, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &[Password])> {
        self.chains.iter()
    }

    pub fn ctx(&self) -> &RainbowTableCtx {
        &self.ctx
    }

    pub fn metadata(&self) -> TableMetadata {
        self.ctx.metadata()
    }

    /// Searches for a password in a given column.
    /// Every candidate chain is replayed from its startpoint, so false alarms are discarded.
    #[inline]
    pub fn search_column(&self, column: u64, digest: &Digest) -> Option<Password> {
        let walker = ChainWalker::new(&self.ctx);
        let endpoint = walker.endpoint_from(digest, column);

        let startpoints = self.get(&endpoint)?;

        let found = startpoints
            .iter()
            .find_map(|startpoint| walker.find_in_chain(startpoint, digest));

        if found.is_none() {
            debug!(column, %endpoint, "false alarm");
        }

        found
    }

    /// Searches for a password that hashes to the given digest.
    /// The columns are searched from the last one to the first one.
    pub fn search(&self, digest: &Digest) -> Option<Password> {
        (0..self.ctx.chain_length())
            .rev()
            .find_map(|column| self.search_column(column, digest))
    }

    /// Stores this rainbow table to the given path.
    /// The table is written next to `path` first, then moved in place.
    pub fn store(&self, path: &Path) -> PrismResult<()> {
        let tmp_path = tmp_sibling(path);

        let result = File::create(&tmp_path)
            .map_err(PrismError::from)
            .and_then(|file| {
                let mut buf_writer = BufWriter::with_capacity(BUFFER_CAPACITY, file);
                self.write_to(&mut buf_writer)?;
                buf_writer.flush()?;
                Ok(())
            })
            .and_then(|()| Ok(fs::rename(&tmp_path, path)?));

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result?;

        info!(path = %path.display(), endpoints = self.len(), "rainbow table stored");

        Ok(())
    }

    /// Writes this rainbow table to any sink.
    pub fn write_to<W: Write>(&self, mut writer: W) -> PrismResult<()> {
        let prelude = Prelude {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
        };
        let header = StoreHeader {
            metadata: self.metadata(),
            endpoint_count: self.len() as u64,
        };

        bincode::serialize_into(&mut writer, &prelude).map_err(|_| PrismError::Serialize)?;
        bincode::serialize_into(&mut writer, &header).map_err(|_| PrismError::Serialize)?;
        bincode::serialize_into(&mut writer, &self.chains).map_err(|_| PrismError::Serialize)?;

        Ok(())
    }

    /// Loads a rainbow table from the given path.
    /// The table is rejected if it was not generated with a context matching `ctx`.
    pub fn load(path: &Path, ctx: &RainbowTableCtx) -> PrismResult<Self> {
        let file = File::open(path)?;
        let limit = file.metadata()?.len();
        let table = Self::read_from(BufReader::with_capacity(BUFFER_CAPACITY, file), ctx, limit)?;

        info!(path = %path.display(), endpoints = table.len(), "rainbow table loaded");

        Ok(table)
    }

    /// Loads a rainbow table using the context stored in the table itself.
    pub fn load_unchecked(path: &Path) -> PrismResult<Self> {
        let file = File::open(path)?;
        let limit = file.metadata()?.len();
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);

        let header = read_header(&mut reader)?;
        let ctx = RainbowTableCtx::from_metadata(&header.metadata)?;
        let table = read_chains(&mut reader, &header, ctx, limit)?;

        info!(path = %path.display(), endpoints = table.len(), "rainbow table loaded");

        Ok(table)
    }

    /// Reads the header of a stored rainbow table without loading its chains.
    pub fn inspect(path: &Path) -> PrismResult<StoreHeader> {
        let file = File::open(path)?;
        read_header(&mut BufReader::new(file))
    }

    /// Reads a rainbow table from any source holding at most `limit` bytes.
    /// The metadata is checked against `ctx` before any chain is read.
    /// Lengths read from the source never make it allocate more than `limit` bytes.
    pub fn read_from<R: Read>(mut reader: R, ctx: &RainbowTableCtx, limit: u64) -> PrismResult<Self> {
        let header = read_header(&mut reader)?;
        ctx.check_metadata(&header.metadata)?;

        read_chains(&mut reader, &header, ctx.clone(), limit)
    }
}

impl PartialEq for RainbowTable {
    fn eq(&self, other: &Self) -> bool {
        self.metadata() == other.metadata() && self.chains == other.chains
    }
}

impl Eq for RainbowTable {}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut tmp_path = OsString::from(path.as_os_str());
    tmp_path.push(".tmp");
    tmp_path.into()
}

/// The options the tables are written with by `bincode::serialize_into`,
/// with a bound on the bytes a single read may consume.
fn bincode_options(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(limit)
}

fn read_header<R: Read>(reader: &mut R) -> PrismResult<StoreHeader> {
    let prelude: Prelude = bincode_options(HEADER_LIMIT)
        .deserialize_from(&mut *reader)
        .map_err(|e| PrismError::CorruptStore(e.to_string()))?;

    if prelude.magic != MAGIC {
        return Err(PrismError::CorruptStore("not a rainbow table".to_owned()));
    }

    if prelude.format_version != FORMAT_VERSION {
        return Err(PrismError::UnsupportedVersion {
            found: prelude.format_version,
            expected: FORMAT_VERSION,
        });
    }

    bincode_options(HEADER_LIMIT)
        .deserialize_from(&mut *reader)
        .map_err(|e| PrismError::CorruptStore(e.to_string()))
}

fn read_chains<R: Read>(
    reader: &mut R,
    header: &StoreHeader,
    ctx: RainbowTableCtx,
    limit: u64,
) -> PrismResult<RainbowTable> {
    let chains: StoredChains = bincode_options(limit)
        .deserialize_from(&mut *reader)
        .map_err(|e| PrismError::CorruptStore(e.to_string()))?;
    let chains = RainbowChainMap::from_stored(chains);

    if chains.len() as u64 != header.endpoint_count {
        return Err(PrismError::CorruptStore(format!(
            "{} endpoints were expected, found {}",
            header.endpoint_count,
            chains.len()
        )));
    }

    let digest_size = ctx.hash_function().digest_size();

    for (endpoint, startpoints) in chains.iter() {
        if endpoint.len() != digest_size {
            return Err(PrismError::CorruptStore(format!("invalid endpoint {endpoint}")));
        }

        if startpoints.is_empty() {
            return Err(PrismError::CorruptStore(format!("no startpoint for {endpoint}")));
        }

        for startpoint in startpoints {
            ctx.check_password(startpoint.as_bytes())
                .map_err(|_| PrismError::CorruptStore(format!("invalid startpoint {startpoint:?}")))?;
        }
    }

    Ok(RainbowTable { chains, ctx })
}
