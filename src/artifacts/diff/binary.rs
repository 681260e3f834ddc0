/// How far into a buffer to look for a NUL byte, the same window git uses
const FIRST_FEW_BYTES: usize = 8000;

/// Content counts as binary when a NUL byte shows up near its start
pub fn is_binary(data: &[u8]) -> bool {
    data[..data.len().min(FIRST_FEW_BYTES)].contains(&0)
}
