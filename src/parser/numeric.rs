//! Tolerant text → number conversion for attribute values.
//!
//! Every function returns `None` instead of failing loudly: the token has no
//! leading numeral, the value overflows the target type, or the conversion
//! itself is out of range. Callers typically `unwrap_or(0)`.
//!
//! Parsing follows C `strtol` rules: leading whitespace is skipped, an
//! optional sign is accepted, and only the longest numeric prefix is used
//! (`"12px"` → 12). With `base == 0` the radix is detected from the prefix
//! (`0x` hex, leading `0` octal, decimal otherwise).

/// Parse a signed integer that must fit `T`.
pub fn int_from_str<T: TryFrom<i64>>(text: &str, base: u32) -> Option<T> {
    let (negative, magnitude) = parse_prefix(text, base)?;
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)?
    } else {
        i64::try_from(magnitude).ok()?
    };
    T::try_from(value).ok()
}

/// Parse an unsigned integer that must fit `T`. Negative input is rejected.
pub fn uint_from_str<T: TryFrom<u64>>(text: &str, base: u32) -> Option<T> {
    let (negative, magnitude) = parse_prefix(text, base)?;
    if negative && magnitude != 0 {
        return None;
    }
    T::try_from(magnitude).ok()
}

/// Parse a floating point value from the longest decimal prefix.
pub fn float_from_str(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = s[end..].to_ascii_lowercase();
    for word in ["infinity", "inf", "nan"] {
        if rest.starts_with(word) {
            return s[..end + word.len()].parse().ok();
        }
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    let value: f64 = s[..end].parse().ok()?;
    if value.is_infinite() {
        return None;
    }
    Some(value)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Returns the sign and magnitude of the leading integer numeral.
fn parse_prefix(text: &str, base: u32) -> Option<(bool, u64)> {
    if base == 1 || base > 36 {
        return None;
    }

    let mut s = text.trim_start();
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    let has_hex_prefix = |s: &str| {
        let b = s.as_bytes();
        b.len() > 2 && b[0] == b'0' && (b[1] | 0x20) == b'x' && b[2].is_ascii_hexdigit()
    };

    let radix = match base {
        0 if has_hex_prefix(s) => {
            s = &s[2..];
            16
        }
        0 if s.starts_with('0') => 8,
        0 => 10,
        16 if has_hex_prefix(s) => {
            s = &s[2..];
            16
        }
        b => b,
    };

    let digits = s.chars().take_while(|c| c.is_digit(radix)).count();
    if digits == 0 {
        return None;
    }

    let mut value: u64 = 0;
    for c in s[..digits].chars() {
        let d = u64::from(c.to_digit(radix)?);
        value = value.checked_mul(u64::from(radix))?.checked_add(d)?;
    }
    Some((negative, value))
}
