use std::{iter::FusedIterator, ops::Range};

use rayon::prelude::*;

use crate::{ctx::RainbowTableCtx, hash::Digest, password::Password};

/// Creates a plaintext from a counter.
/// The counter is decomposed in base `charset.len()`, least significant character first.
#[inline]
pub fn counter_to_plaintext(mut counter: u64, ctx: &RainbowTableCtx) -> Password {
    let charset = ctx.charset();
    let mut plaintext = Vec::with_capacity(ctx.password_length());

    for _ in 0..ctx.password_length() {
        plaintext.push(charset_to_ascii(counter % charset.len() as u64, charset));
        counter /= charset.len() as u64;
    }

    Password::from_raw(plaintext)
}

/// Creates a counter from a plaintext.
/// Returns `None` if the plaintext uses characters outside of the charset.
#[inline]
pub fn plaintext_to_counter(plaintext: &Password, ctx: &RainbowTableCtx) -> Option<u64> {
    let charset = ctx.charset();
    let mut counter = 0;
    let mut charset_base = 1;

    for &c in plaintext.as_bytes() {
        counter += ascii_to_charset(c, charset)? as u64 * charset_base;
        charset_base *= charset.len() as u64;
    }

    Some(counter)
}

/// Converts a character from a charset to its ASCII representation.
#[inline]
pub fn charset_to_ascii(n: u64, charset: &[u8]) -> u8 {
    charset[n as usize]
}

/// Converts an ASCII character to the given charset.
#[inline]
pub fn ascii_to_charset(c: u8, charset: &[u8]) -> Option<u8> {
    charset.iter().position(|x| *x == c).map(|i| i as u8)
}

/// A lazy enumeration of the passwords of a search space, in counter order.
/// The iterator ends once every password has been yielded, and can be restarted with `reset`.
#[derive(Clone)]
pub struct PasswordSpace<'a> {
    ctx: &'a RainbowTableCtx,
    range: Range<u64>,
    next: u64,
}

impl<'a> PasswordSpace<'a> {
    /// Creates an enumeration of the whole search space.
    pub fn new(ctx: &'a RainbowTableCtx) -> Self {
        Self::with_range(ctx, 0..ctx.n())
    }

    /// Creates an enumeration of the passwords whose counters are in `range`.
    pub fn with_range(ctx: &'a RainbowTableCtx, range: Range<u64>) -> Self {
        let end = range.end.min(ctx.n());
        let range = range.start.min(end)..end;

        Self {
            ctx,
            next: range.start,
            range,
        }
    }

    /// Starts the enumeration over.
    pub fn reset(&mut self) {
        self.next = self.range.start;
    }

    /// Returns the number of passwords left to enumerate.
    pub fn remaining(&self) -> u64 {
        self.range.end.saturating_sub(self.next)
    }

    /// Returns the number of passwords in the space.
    pub fn size(&self) -> u64 {
        self.range.end - self.range.start
    }

    /// Exhaustively searches the space for a password hashing to `target`.
    /// The passwords are hashed in parallel, but the lowest matching counter is returned.
    pub fn find(&self, target: &Digest) -> Option<Password> {
        let hash_function = self.ctx.hash_function();

        self.range.clone().into_par_iter().find_map_first(|counter| {
            let password = counter_to_plaintext(counter, self.ctx);
            (hash_function.hash(password.as_bytes()) == *target).then_some(password)
        })
    }
}

impl Iterator for PasswordSpace<'_> {
    type Item = Password;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.range.end {
            return None;
        }

        let password = counter_to_plaintext(self.next, self.ctx);
        self.next += 1;

        Some(password)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for PasswordSpace<'_> {}
