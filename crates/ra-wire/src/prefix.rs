//! Length prefixes and fixed-width primitives.
//!
//! Every length on the wire is a `u64` in little-endian order. The transport
//! layer uses the same prefix for its packs, which is what makes a message
//! with a size header sendable as raw bytes.

/// Width of every length prefix, in bytes.
pub const LENGTH_PREFIX_SIZE: usize = std::mem::size_of::<u64>();

/// Bytes taken by a string argument with `n` content bytes.
pub const fn calc_size_str(n: usize) -> usize {
    LENGTH_PREFIX_SIZE + n
}

/// Bytes taken by a primitive argument of type `T`.
pub const fn calc_size_prim<T: WirePrimitive>() -> usize {
    T::WIRE_SIZE
}

/// Encode a length prefix.
pub fn encode_length(len: usize) -> [u8; LENGTH_PREFIX_SIZE] {
    (len as u64).to_le_bytes()
}

/// Decode a length prefix from the front of `bytes`.
///
/// Returns `None` when fewer than [`LENGTH_PREFIX_SIZE`] bytes are available.
pub fn decode_length(bytes: &[u8]) -> Option<u64> {
    let head: [u8; LENGTH_PREFIX_SIZE] = bytes.get(..LENGTH_PREFIX_SIZE)?.try_into().ok()?;
    Some(u64::from_le_bytes(head))
}

/// A fixed-width value that can travel as an RPC argument without a prefix.
pub trait WirePrimitive: Copy {
    /// Encoded width in bytes.
    const WIRE_SIZE: usize;

    /// Write the value into `out`, which is exactly `WIRE_SIZE` bytes long.
    fn write_le(self, out: &mut [u8]);

    /// Read the value from `bytes`, which is exactly `WIRE_SIZE` bytes long.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_wire_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WirePrimitive for $ty {
                const WIRE_SIZE: usize = std::mem::size_of::<$ty>();

                fn write_le(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_wire_primitive!(u8, u16, u32, u64, i8, i16, i32, i64);
