//! Fixed-width numeric literals: decimal, negative decimal (two's complement) or `0x` hex.

fn parse_width(text: &[u8], bits: u32) -> Option<u64> {
    let max = (1u64 << bits) - 1;
    let text = std::str::from_utf8(text).ok()?;
    if let Some(hex) = text.strip_prefix("0X").or_else(|| text.strip_prefix("0x")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return u64::from_str_radix(hex, 16).ok().filter(|v| *v <= max);
    }
    if let Some(digits) = text.strip_prefix('-') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let magnitude: u64 = digits.parse().ok()?;
        if magnitude > 1u64 << (bits - 1) {
            return None;
        }
        return Some((max + 1 - magnitude) & max);
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok().filter(|v| *v <= max)
}

pub(crate) fn parse_long(text: &[u8]) -> Option<u32> {
    parse_width(text, 32).and_then(|v| u32::try_from(v).ok())
}

pub(crate) fn parse_short(text: &[u8]) -> Option<u16> {
    parse_width(text, 16).and_then(|v| u16::try_from(v).ok())
}

pub(crate) fn parse_byte(text: &[u8]) -> Option<u8> {
    parse_width(text, 8).and_then(|v| u8::try_from(v).ok())
}

/// Up to 32 binary digits, most significant first.
pub(crate) fn parse_binary_long(text: &[u8]) -> Option<u32> {
    if text.is_empty() || text.len() > 32 {
        return None;
    }
    text.iter().try_fold(0u32, |acc, digit| match digit {
        b'0' => Some(acc << 1),
        b'1' => Some(acc << 1 | 1),
        _ => None,
    })
}

/// Convert an absolute address into a death-table offset. The address must sit on a 4-byte
/// boundary relative to the table; addresses below the table give negative offsets.
pub(crate) fn parse_memory_address(text: &[u8], death_table_offset: u32) -> Option<u32> {
    let address = i64::from(parse_long(text)?);
    let distance = address - i64::from(death_table_offset);
    if distance % 4 != 0 {
        return None;
    }
    let offset = i32::try_from(distance / 4).ok()?;
    Some(offset.cast_unsigned())
}

/// Inverse of [`parse_memory_address`].
pub(crate) fn memory_address(offset: u32, death_table_offset: u32) -> u32 {
    death_table_offset.wrapping_add(offset.wrapping_mul(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_literals_respect_width() {
        assert_eq!(parse_byte(b"255"), Some(255));
        assert_eq!(parse_byte(b"256"), None);
        assert_eq!(parse_short(b"65535"), Some(65535));
        assert_eq!(parse_long(b"4294967295"), Some(u32::MAX));
        assert_eq!(parse_long(b"4294967296"), None);
    }

    #[test]
    fn negative_literals_wrap_to_twos_complement() {
        assert_eq!(parse_long(b"-1"), Some(u32::MAX));
        assert_eq!(parse_byte(b"-128"), Some(0x80));
        assert_eq!(parse_byte(b"-129"), None);
    }

    #[test]
    fn hex_literals_accept_either_prefix_case() {
        assert_eq!(parse_long(b"0X1F"), Some(31));
        assert_eq!(parse_short(b"0xffff"), Some(0xFFFF));
        assert_eq!(parse_byte(b"0x100"), None);
        assert_eq!(parse_byte(b"0x"), None);
    }

    #[test]
    fn names_are_not_numbers() {
        assert_eq!(parse_long(b"PLAYER1"), None);
        assert_eq!(parse_long(b""), None);
        assert_eq!(parse_long(b"+5"), None);
    }

    #[test]
    fn binary_flags_parse_up_to_32_digits() {
        assert_eq!(parse_binary_long(b"0"), Some(0));
        assert_eq!(parse_binary_long(b"101"), Some(5));
        assert_eq!(parse_binary_long(&[b'1'; 32]), Some(u32::MAX));
        assert_eq!(parse_binary_long(&[b'1'; 33]), None);
        assert_eq!(parse_binary_long(b"102"), None);
    }

    #[test]
    fn memory_addresses_convert_to_death_offsets() {
        let table = 0x0058_A364;
        assert_eq!(parse_memory_address(b"0x58A364", table), Some(0));
        assert_eq!(parse_memory_address(b"0x58A368", table), Some(1));
        assert_eq!(parse_memory_address(b"0x58A360", table), Some(u32::MAX));
        assert_eq!(parse_memory_address(b"0x58A365", table), None);
        assert_eq!(memory_address(1, table), 0x0058_A368);
        assert_eq!(memory_address(u32::MAX, table), 0x0058_A360);
    }
}
