use md4::{digest::generic_array::GenericArray, digest::OutputSizeUser, Digest as Md4Digest, Md4};

/// UTF-16LE encodes an ASCII password.
#[inline]
fn utf16_le(password: &[u8]) -> Vec<u8> {
    password.iter().flat_map(|&c| [c, 0]).collect()
}

/// Hashes a password using NTLM.
#[inline]
pub fn ntlm(password: &[u8]) -> GenericArray<u8, <Md4 as OutputSizeUser>::OutputSize> {
    Md4::digest(utf16_le(password))
}
