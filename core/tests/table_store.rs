//! Rainbow table persistence tests
//!
//! A table is generated, stored in a temporary directory, and loaded back
//! with matching and mismatching contexts.

use std::{fs, path::Path};

use prism_core::{
    estimate_coverage, Cracker, HashFunction, PrismError, RainbowTable, RainbowTableCtx, RainbowTableCtxBuilder,
    TableBuilder,
};
use tempfile::TempDir;

fn small_ctx() -> RainbowTableCtx {
    RainbowTableCtxBuilder::new()
        .charset(b"abcdef")
        .password_length(4)
        .chain_length(20)
        .chains(200)
        .build()
        .unwrap()
}

fn generate(ctx: &RainbowTableCtx) -> RainbowTable {
    TableBuilder::new(ctx.clone()).seed(17).batch_size(50).build().unwrap()
}

fn store(table: &RainbowTable, dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("table.prt");
    table.store(&path).unwrap();
    path
}

#[test]
fn test_store_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let table = generate(&ctx);
    let path = store(&table, &dir);

    let loaded = RainbowTable::load(&path, &ctx).unwrap();
    assert_eq!(table, loaded);
    assert_eq!(table.chain_count(), loaded.chain_count());

    // no temporary file is left behind
    assert_eq!(1, fs::read_dir(dir.path()).unwrap().count());
}

#[test]
fn test_loaded_table_cracks_like_the_generated_one() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let table = generate(&ctx);
    let path = store(&table, &dir);
    let loaded = RainbowTable::load(&path, &ctx).unwrap();

    let generated = Cracker::new(&table, &ctx).unwrap();
    let reloaded = Cracker::new(&loaded, &ctx).unwrap();

    for (_, startpoints) in table.iter().take(20) {
        let digest = ctx.hash(&startpoints[0]);
        assert_eq!(generated.crack(&digest).unwrap(), reloaded.crack(&digest).unwrap());
        assert_eq!(Some(startpoints[0].clone()), reloaded.crack(&digest).unwrap());
    }
}

#[test]
fn test_load_rejects_mismatching_ctx() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let path = store(&generate(&ctx), &dir);

    let cases = [
        (
            RainbowTableCtxBuilder::new().charset(b"abcdeg").password_length(4).chain_length(20),
            "alphabet",
        ),
        (
            RainbowTableCtxBuilder::new().charset(b"abcdef").password_length(5).chain_length(20),
            "password_length",
        ),
        (
            RainbowTableCtxBuilder::new().charset(b"abcdef").password_length(4).chain_length(21),
            "chain_length",
        ),
        (
            RainbowTableCtxBuilder::new()
                .hash(HashFunction::Sha1)
                .charset(b"abcdef")
                .password_length(4)
                .chain_length(20),
            "hash_algorithm",
        ),
    ];

    for (builder, expected_field) in cases {
        let other = builder.build().unwrap();
        match RainbowTable::load(&path, &other) {
            Err(PrismError::ConfigMismatch { field, .. }) => assert_eq!(expected_field, field),
            other => panic!("expected a mismatch on {expected_field}, got {other:?}"),
        }
    }
}

#[test]
fn test_load_unchecked_and_inspect() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let table = generate(&ctx);
    let path = store(&table, &dir);

    let header = RainbowTable::inspect(&path).unwrap();
    assert_eq!(ctx.metadata(), header.metadata);
    assert_eq!(table.len() as u64, header.endpoint_count);

    let loaded = RainbowTable::load_unchecked(&path).unwrap();
    assert_eq!(table, loaded);
}

#[test]
fn test_load_rejects_corrupted_files() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let path = store(&generate(&ctx), &dir);
    let bytes = fs::read(&path).unwrap();

    let corrupted = dir.path().join("corrupted.prt");

    // wrong magic
    let mut wrong_magic = bytes.clone();
    wrong_magic[0] ^= 0xff;
    fs::write(&corrupted, &wrong_magic).unwrap();
    assert!(matches!(RainbowTable::load(&corrupted, &ctx), Err(PrismError::CorruptStore(_))));

    // truncated entries
    fs::write(&corrupted, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(RainbowTable::load(&corrupted, &ctx), Err(PrismError::CorruptStore(_))));

    // empty file
    fs::write(&corrupted, b"").unwrap();
    assert!(matches!(RainbowTable::load(&corrupted, &ctx), Err(PrismError::CorruptStore(_))));
}

#[test]
fn test_load_rejects_huge_length_prefixes() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let corrupted = dir.path().join("corrupted.prt");

    // the alphabet of the header claims to be exabytes long
    let mut huge_header = b"PRISMRT\0".to_vec();
    huge_header.extend_from_slice(&1u32.to_le_bytes());
    huge_header.extend_from_slice(&(u64::MAX / 2).to_le_bytes());

    let result = RainbowTable::read_from(huge_header.as_slice(), &ctx, u64::MAX);
    assert!(matches!(result, Err(PrismError::CorruptStore(_))));
    fs::write(&corrupted, &huge_header).unwrap();
    assert!(matches!(RainbowTable::load(&corrupted, &ctx), Err(PrismError::CorruptStore(_))));

    // one endpoint whose digest claims to be a terabyte long
    let mut huge_entries = Vec::new();
    RainbowTable::empty(ctx.clone()).write_to(&mut huge_entries).unwrap();
    let len = huge_entries.len();
    huge_entries[len - 8..].copy_from_slice(&1u64.to_le_bytes());
    huge_entries.extend_from_slice(&(1u64 << 40).to_le_bytes());

    fs::write(&corrupted, &huge_entries).unwrap();
    assert!(matches!(RainbowTable::load(&corrupted, &ctx), Err(PrismError::CorruptStore(_))));
    assert!(matches!(RainbowTable::load_unchecked(&corrupted), Err(PrismError::CorruptStore(_))));
}

#[test]
fn test_unchecked_table_estimates_its_coverage() {
    let dir = TempDir::new().unwrap();
    let ctx = small_ctx();
    let table = generate(&ctx);
    let path = store(&table, &dir);

    let loaded = RainbowTable::load_unchecked(&path).unwrap();
    let cracker = Cracker::new(&loaded, loaded.ctx()).unwrap();
    let report = estimate_coverage(&cracker, 50, 3);

    let expected = estimate_coverage(&Cracker::new(&table, &ctx).unwrap(), 50, 3);
    assert_eq!(50, report.attempts);
    assert!(report.cracked > 0);
    assert_eq!(expected.cracked, report.cracked);
}

#[test]
fn test_load_missing_file() {
    let ctx = small_ctx();
    let result = RainbowTable::load(Path::new("/this/table/does/not/exist.prt"), &ctx);
    assert!(matches!(result, Err(PrismError::Io(_))));
}
