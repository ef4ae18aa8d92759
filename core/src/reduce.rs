use crate::{ctx::RainbowTableCtx, hash::Digest, password::Password, space::counter_to_plaintext};

/// Identifies the reduction family below. It is stored in the metadata of every table,
/// and must change whenever `ReductionFamily::reduce` changes its output.
pub const REDUCTION_VERSION: &str = "hex-prefix/1";

/// The most nibbles that fit in a `u128`.
const MAX_NIBBLES: usize = 32;

/// The family of reduction functions R_i used to go from a digest back to a password.
///
/// The position is mixed into the digest by hashing the hexadecimal digest followed
/// by the decimal position, so two chains meeting on the same digest at different
/// columns go their separate ways.
#[derive(Clone, Copy, Debug)]
pub struct ReductionFamily<'a> {
    ctx: &'a RainbowTableCtx,
    nibbles: usize,
}

impl<'a> ReductionFamily<'a> {
    pub fn new(ctx: &'a RainbowTableCtx) -> Self {
        let charset_len = ctx.charset().len() as u64;
        // ceil(log2(A)), the charset has at least 2 characters
        let bits_per_char = (u64::BITS - (charset_len - 1).leading_zeros()) as usize;
        let nibbles = (bits_per_char * ctx.password_length())
            .div_ceil(4)
            .min(MAX_NIBBLES)
            .min(ctx.hash_function().digest_size() * 2);

        Self { ctx, nibbles }
    }

    /// Reduces a digest into a password of the search space.
    #[inline]
    pub fn reduce(&self, digest: &Digest, position: u64) -> Password {
        let mut mixer = digest.to_hex();
        mixer.push_str(&position.to_string());

        let mix = self.ctx.hash_function().hash(mixer.as_bytes());
        let value = leading_nibbles(mix.as_bytes(), self.nibbles);

        // n <= 2^64 so the remainder always fits
        counter_to_plaintext((value % self.ctx.n() as u128) as u64, self.ctx)
    }
}

/// Reads the first `count` nibbles of `bytes` as a big-endian integer.
#[inline]
fn leading_nibbles(bytes: &[u8], count: usize) -> u128 {
    (0..count).fold(0, |value, i| {
        let byte = bytes[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        (value << 4) | nibble as u128
    })
}

#[cfg(test)]
mod tests {
    use super::{leading_nibbles, ReductionFamily};
    use crate::{ctx::build_test_ctx, RainbowTableCtxBuilder};

    #[test]
    fn test_leading_nibbles() {
        assert_eq!(0, leading_nibbles(&[0xab, 0xcd], 0));
        assert_eq!(0xa, leading_nibbles(&[0xab, 0xcd], 1));
        assert_eq!(0xabc, leading_nibbles(&[0xab, 0xcd], 3));
        assert_eq!(u128::MAX, leading_nibbles(&[0xff; 16], 32));
    }

    #[test]
    fn test_reduce_known_answers() {
        let ctx = RainbowTableCtxBuilder::new().build().unwrap();
        let reduction = ReductionFamily::new(&ctx);
        let digest = ctx.hash_function().hash(b"hello");

        assert_eq!("wxwmv", reduction.reduce(&digest, 1).to_string());
        assert_eq!("suyxf", reduction.reduce(&digest, 2).to_string());
    }

    #[test]
    fn test_reduce_small_space() {
        let ctx = build_test_ctx();
        let reduction = ReductionFamily::new(&ctx);

        let expected = [
            ("aa", "cb", "cb"),
            ("ab", "aa", "ac"),
            ("ac", "bc", "ca"),
            ("ba", "aa", "ac"),
            ("bb", "ac", "bc"),
            ("bc", "bc", "ca"),
            ("ca", "ba", "ac"),
            ("cb", "cb", "ac"),
            ("cc", "cb", "ca"),
        ];

        for (password, r1, r2) in expected {
            let digest = ctx.hash(&ctx.password(password).unwrap());
            assert_eq!(r1, reduction.reduce(&digest, 1).to_string(), "R1({password})");
            assert_eq!(r2, reduction.reduce(&digest, 2).to_string(), "R2({password})");
        }
    }

    #[test]
    fn test_reduce_stays_in_space() {
        let ctx = RainbowTableCtxBuilder::new()
            .charset(b"xyz019")
            .password_length(7)
            .build()
            .unwrap();
        let reduction = ReductionFamily::new(&ctx);

        for i in 0..500u64 {
            let digest = ctx.hash_function().hash(&i.to_le_bytes());
            let password = reduction.reduce(&digest, i % 17 + 1);

            assert!(ctx.password(&password.to_string()).is_ok(), "{password:?}");
        }
    }

    #[test]
    fn test_reduce_is_deterministic_and_position_dependent() {
        let ctx = RainbowTableCtxBuilder::new().build().unwrap();
        let reduction = ReductionFamily::new(&ctx);
        let digest = ctx.hash_function().hash(b"prism");

        assert_eq!(reduction.reduce(&digest, 3), reduction.reduce(&digest, 3));

        let distinct = (1..64)
            .map(|position| reduction.reduce(&digest, position))
            .collect::<std::collections::HashSet<_>>();
        assert!(distinct.len() > 60);
    }
}
