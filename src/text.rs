use crate::error::{Error, Result};

/// Split `line` into consecutive chunks of `n` characters; the last chunk may be shorter.
pub fn split_string(line: &str, n: usize) -> Result<Vec<String>> {
    if n == 0 {
        return Err(Error::InvalidArgument("chunk size must be positive".into()));
    }
    let chars: Vec<char> = line.chars().collect();
    Ok(chars.chunks(n).map(|c| c.iter().collect()).collect())
}

/// XOR the lexicographically larger string with the smaller one, cycling
/// the smaller as a key. The result has the length of the larger string.
pub fn xor2(a: &str, b: &str) -> Result<String> {
    let (body, key) = if a >= b { (a, b) } else { (b, a) };
    if body.is_empty() {
        return Ok(String::new());
    }
    if key.is_empty() {
        return Err(Error::InvalidArgument("xor key is empty".into()));
    }

    body.chars()
        .zip(key.chars().cycle())
        .map(|(x, k)| {
            let code = u32::from(x) ^ u32::from(k);
            char::from_u32(code).ok_or_else(|| {
                Error::InvalidArgument(format!("xor of {x:?} and {k:?} is not a character"))
            })
        })
        .collect()
}
