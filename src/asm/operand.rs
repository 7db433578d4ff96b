use num_traits::Num;

/// Named special registers and their indices.
pub const SPECIAL_REGS: &[(&str, u32)] = &[("PC", 16), ("SP", 17), ("LR", 18), ("SR", 19)];

fn parse_radix<T: Num>(digits: &str, radix: u32) -> Option<T> {
    T::from_str_radix(digits, radix).ok()
}

/// Parse a register token (case-insensitive).
///
/// `R` followed by a single digit reads it as hex (`RA` = 10), a `0x` form is
/// hex, and any longer digit run is decimal (`R10` = 10).
pub fn parse_register(token: &str) -> Option<u32> {
    let t = token.trim().to_uppercase();
    if let Some(&(_, idx)) = SPECIAL_REGS.iter().find(|(name, _)| *name == t) {
        return Some(idx);
    }
    let num = t.strip_prefix('R')?;
    if let Some(hex) = num.strip_prefix("0X") {
        parse_radix(hex, 16)
    } else if num.len() <= 1 {
        parse_radix(num, 16)
    } else {
        parse_radix(num, 10)
    }
}

/// Digits in `radix`, keeping only the low 64 bits of the value.
fn parse_wrapping(digits: &str, radix: u32) -> Option<i64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0i64, |acc, c| {
        let d = c.to_digit(radix)?;
        Some(acc.wrapping_mul(i64::from(radix)).wrapping_add(i64::from(d)))
    })
}

/// Parse an immediate literal: optional sign, then `0x`/`0X` hex, `0b`/`0B`
/// binary, otherwise decimal. Literals wider than 64 bits wrap; field-width
/// truncation is left to the encoder.
pub fn parse_immediate(token: &str) -> Option<i64> {
    let t = token.trim();
    let (negative, t) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };
    let value = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        parse_wrapping(hex, 16)
    } else if let Some(bin) = t.strip_prefix("0b").or_else(|| t.strip_prefix("0B")) {
        parse_wrapping(bin, 2)
    } else {
        parse_wrapping(t, 10)
    }?;
    Some(if negative { value.wrapping_neg() } else { value })
}

/// Whether a failed target operand reads as a symbol rather than a number.
pub fn looks_like_label(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '.')
}
