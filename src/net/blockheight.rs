/// Parse the block count endpoint's body: ASCII decimal, optionally
/// surrounded by whitespace.
pub fn parse_block_height(body: &[u8]) -> Option<u32> {
    let digits = body.trim_ascii();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let mut height: u32 = 0;
    for &d in digits {
        height = height.checked_mul(10)?.checked_add(u32::from(d - b'0'))?;
    }
    Some(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_number() {
        assert_eq!(parse_block_height(b"867530"), Some(867_530));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_block_height(b"  867530\r\n"), Some(867_530));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse_block_height(b""), None);
        assert_eq!(parse_block_height(b" \n"), None);
        assert_eq!(parse_block_height(b"+12"), None);
        assert_eq!(parse_block_height(b"12 34"), None);
        assert_eq!(parse_block_height(b"<html>"), None);
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(parse_block_height(b"4294967296"), None);
        assert_eq!(parse_block_height(b"4294967295"), Some(u32::MAX));
    }
}
