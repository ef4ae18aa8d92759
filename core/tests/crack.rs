//! End-to-end tests: generate a table, then crack digests with it.

use prism_core::{
    build_chain, estimate_coverage, verify_equivalence, BackendKind, Cracker, HashFunction,
    PasswordSpace, RainbowTable, RainbowTableCtx, RainbowTableCtxBuilder, TableBuilder,
};
use rand::{rngs::StdRng, SeedableRng};

fn ctx(hash_function: HashFunction, chains: u64) -> RainbowTableCtx {
    RainbowTableCtxBuilder::new()
        .hash(hash_function)
        .charset(b"abcdef")
        .password_length(4)
        .chain_length(20)
        .chains(chains)
        .build()
        .unwrap()
}

#[test]
fn test_cracked_passwords_are_sound() {
    for hash_function in [HashFunction::Md5, HashFunction::Ntlm, HashFunction::Sha2_256] {
        let ctx = ctx(hash_function, 150);
        let table = TableBuilder::new(ctx.clone()).seed(5).build().unwrap();
        let cracker = Cracker::new(&table, &ctx).unwrap();

        let mut cracked = 0;
        for password in PasswordSpace::new(&ctx) {
            let digest = ctx.hash(&password);
            if let Some(found) = cracker.crack(&digest).unwrap() {
                assert_eq!(digest, ctx.hash(&found));
                cracked += 1;
            }
        }

        // every startpoint is at least covered
        assert!(cracked >= table.len(), "{hash_function}");
    }
}

#[test]
fn test_every_chain_password_is_cracked() {
    let ctx = ctx(HashFunction::Md5, 50);
    let table = TableBuilder::new(ctx.clone()).seed(8).build().unwrap();
    let cracker = Cracker::new(&table, &ctx).unwrap();

    // replay each stored chain and crack every password on it
    let walker = prism_core::ChainWalker::new(&ctx);
    for (endpoint, startpoints) in table.iter() {
        for startpoint in startpoints {
            let mut password = startpoint.clone();
            for position in 1..=ctx.chain_length() {
                let digest = ctx.hash(&password);
                let found = cracker.crack(&digest).unwrap();
                assert_eq!(Some(digest.clone()), found.map(|found| ctx.hash(&found)));

                if position < ctx.chain_length() {
                    password = walker.reduce(&digest, position);
                } else {
                    assert_eq!(*endpoint, digest);
                }
            }
        }
    }
}

#[test]
fn test_backends_build_the_same_table() {
    let ctx = ctx(HashFunction::Sha1, 500);

    let mut rng = StdRng::seed_from_u64(11);
    let sample = (0..37).map(|_| ctx.random_password(&mut rng)).collect::<Vec<_>>();
    for kind in BackendKind::ALL {
        verify_equivalence(kind.backend().as_ref(), &ctx, &sample).unwrap();
    }

    let reference = TableBuilder::new(ctx.clone())
        .backend(BackendKind::Sequential)
        .seed(21)
        .build()
        .unwrap();

    for kind in [BackendKind::Cpu, BackendKind::Lanes] {
        let table = TableBuilder::new(ctx.clone())
            .backend(kind)
            .seed(21)
            .batch_size(33)
            .build()
            .unwrap();
        assert_eq!(reference, table, "{kind}");
    }
}

#[test]
fn test_larger_table_is_a_superset() {
    let small = TableBuilder::new(ctx(HashFunction::Md5, 10)).seed(99).build().unwrap();
    let large = TableBuilder::new(ctx(HashFunction::Md5, 200)).seed(99).build().unwrap();

    for (endpoint, startpoints) in small.iter() {
        let large_startpoints = large.get(endpoint).unwrap();
        assert!(startpoints.iter().all(|s| large_startpoints.contains(s)));
    }
}

#[test]
fn test_more_chains_never_lower_coverage() {
    let base = ctx(HashFunction::Md5, 0);
    let mut rng = StdRng::seed_from_u64(1234);
    let targets = (0..300)
        .map(|_| base.hash(&base.random_password(&mut rng)))
        .collect::<Vec<_>>();

    let small = TableBuilder::new(ctx(HashFunction::Md5, 10)).seed(7).build().unwrap();
    let large = TableBuilder::new(ctx(HashFunction::Md5, 200)).seed(7).build().unwrap();
    let small_cracker = Cracker::new(&small, &base).unwrap();
    let large_cracker = Cracker::new(&large, &base).unwrap();

    let mut small_cracked = 0;
    let mut large_cracked = 0;
    for target in &targets {
        let by_small = small_cracker.crack(target).unwrap();
        let by_large = large_cracker.crack(target).unwrap();

        if by_small.is_some() {
            small_cracked += 1;
            assert!(by_large.is_some(), "{target}");
        }
        if by_large.is_some() {
            large_cracked += 1;
        }
    }
    assert!(large_cracked >= small_cracked);

    let small_report = estimate_coverage(&small_cracker, 300, 1234);
    let large_report = estimate_coverage(&large_cracker, 300, 1234);
    assert_eq!(small_cracked, small_report.cracked);
    assert_eq!(large_cracked, large_report.cracked);
    assert!(large_report.rate() >= small_report.rate());
}

#[test]
fn test_brute_force_finds_everything() {
    let ctx = ctx(HashFunction::Md4, 0);
    let space = PasswordSpace::new(&ctx);
    let password = ctx.password("fade").unwrap();

    assert_eq!(Some(password.clone()), space.find(&ctx.hash(&password)));
}

#[test]
fn test_one_chain_scenario() {
    let ctx = RainbowTableCtxBuilder::new()
        .charset(b"abc")
        .password_length(2)
        .chain_length(3)
        .build()
        .unwrap();
    let table = RainbowTable::from_chains([build_chain(ctx.password("aa").unwrap(), &ctx)], ctx.clone());
    let cracker = Cracker::new(&table, &ctx).unwrap();

    assert_eq!(1, table.len());
    assert_eq!(
        Some(ctx.password("aa").unwrap()),
        cracker.crack(&ctx.hash(&ctx.password("aa").unwrap())).unwrap()
    );
    assert_eq!(None, cracker.crack(&ctx.hash(&ctx.password("bb").unwrap())).unwrap());
}
