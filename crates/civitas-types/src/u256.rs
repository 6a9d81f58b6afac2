use crate::error::TypesError;
use std::fmt;
use std::str::FromStr;

/// 256-bit unsigned integer for token balances, quorum and disbursement amounts.
///
/// Stored as 4 x u64 in little-endian limb order.
/// Arithmetic is checked only: there are no operator overloads, so an
/// overflow can never be silently wrapped or saturated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]); // [low, mid_low, mid_high, high] little-endian limbs

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                std::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl U256 {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);
    pub const MAX: Self = Self([u64::MAX, u64::MAX, u64::MAX, u64::MAX]);

    /// Decimals used by the governance token and the treasury asset.
    pub const DECIMALS: u32 = 18;

    /// Largest decimals count accepted by unit conversion (10^77 < 2^256 < 10^78).
    pub const MAX_DECIMALS: u32 = 77;

    /// One whole token in base units (10^18)
    pub const TOKEN: Self = Self([1_000_000_000_000_000_000, 0, 0, 0]);

    /// Create from a u64 value
    pub const fn from_u64(val: u64) -> Self {
        Self([val, 0, 0, 0])
    }

    /// Create from a u128 value
    pub const fn from_u128(val: u128) -> Self {
        let low = val as u64;
        let high = (val >> 64) as u64;
        Self([low, high, 0, 0])
    }

    /// `whole` tokens expressed in base units (`whole * 10^18`).
    pub fn tokens(whole: u64) -> Self {
        // u64::MAX * 10^18 < 2^128, always fits
        Self::from_u128(whole as u128 * 1_000_000_000_000_000_000u128)
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    /// Checked addition
    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        let mut result = [0u64; 4];
        let mut carry = 0u64;

        for i in 0..4 {
            let (sum1, overflow1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum2, overflow2) = sum1.overflowing_add(carry);
            result[i] = sum2;
            carry = (overflow1 as u64) + (overflow2 as u64);
        }

        if carry != 0 {
            None
        } else {
            Some(Self(result))
        }
    }

    /// Checked subtraction
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        if self < rhs {
            return None;
        }

        let mut result = [0u64; 4];
        let mut borrow = 0u64;

        for i in 0..4 {
            let (diff1, underflow1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff2, underflow2) = diff1.overflowing_sub(borrow);
            result[i] = diff2;
            borrow = (underflow1 as u64) | (underflow2 as u64);
        }

        Some(Self(result))
    }

    /// Checked multiplication (schoolbook, 512-bit intermediate).
    pub fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        if self.is_zero() || rhs.is_zero() {
            return Some(Self::ZERO);
        }

        let mut wide = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u128;
            for j in 0..4 {
                let cur = wide[i + j] as u128 + (self.0[i] as u128) * (rhs.0[j] as u128) + carry;
                wide[i + j] = cur as u64;
                carry = cur >> 64;
            }
            wide[i + 4] = carry as u64;
        }

        if wide[4..].iter().any(|&l| l != 0) {
            return None;
        }

        Some(Self([wide[0], wide[1], wide[2], wide[3]]))
    }

    /// Divide by a machine word, returning quotient and remainder.
    /// Returns `None` when `divisor` is zero.
    pub fn div_rem_u64(&self, divisor: u64) -> Option<(Self, u64)> {
        if divisor == 0 {
            return None;
        }

        let mut quotient = [0u64; 4];
        let mut rem = 0u128;
        for i in (0..4).rev() {
            let cur = (rem << 64) | self.0[i] as u128;
            quotient[i] = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }

        Some((Self(quotient), rem as u64))
    }

    /// `10^exp`, or `None` if it does not fit in 256 bits.
    pub fn checked_pow10(exp: u32) -> Option<Self> {
        let ten = Self::from_u64(10);
        let mut result = Self::ONE;
        for _ in 0..exp {
            result = result.checked_mul(&ten)?;
        }
        Some(result)
    }

    /// Convert to big-endian bytes
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            let limb_bytes = self.0[3 - i].to_be_bytes();
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb_bytes);
        }
        bytes
    }

    /// Convert from big-endian bytes
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let mut limb_bytes = [0u8; 8];
            limb_bytes.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            limbs[3 - i] = u64::from_be_bytes(limb_bytes);
        }
        Self(limbs)
    }

    /// Parse from decimal string
    pub fn from_decimal_str(s: &str) -> Result<Self, TypesError> {
        if s.is_empty() {
            return Err(TypesError::InvalidU256String(s.to_string()));
        }

        let ten = Self::from_u64(10);
        let mut result = Self::ZERO;

        for c in s.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| TypesError::InvalidU256String(s.to_string()))?;
            result = result
                .checked_mul(&ten)
                .and_then(|r| r.checked_add(&Self::from_u64(digit as u64)))
                .ok_or(TypesError::U256Overflow)?;
        }

        Ok(result)
    }

    /// Parse a human-readable amount such as `"100"` or `"0.25"` into base
    /// units with `decimals` fractional digits.
    pub fn parse_units(s: &str, decimals: u32) -> Result<Self, TypesError> {
        if decimals > Self::MAX_DECIMALS {
            return Err(TypesError::UnsupportedDecimals(decimals));
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(TypesError::InvalidU256String(s.to_string()));
        }
        if frac.len() > decimals as usize {
            return Err(TypesError::TooManyDecimals {
                max: decimals,
                actual: frac.len(),
            });
        }

        let digits = |part: &str| -> Result<Self, TypesError> {
            if part.is_empty() {
                return Ok(Self::ZERO);
            }
            Self::from_decimal_str(part).map_err(|e| match e {
                TypesError::InvalidU256String(_) => TypesError::InvalidU256String(s.to_string()),
                other => other,
            })
        };
        let whole = digits(whole)?;
        let frac_value = digits(frac)?;

        // frac.len() <= decimals <= MAX_DECIMALS, so both powers fit
        let scale = Self::checked_pow10(decimals).ok_or(TypesError::U256Overflow)?;
        let frac_scale = Self::checked_pow10(decimals - frac.len() as u32)
            .ok_or(TypesError::U256Overflow)?;

        whole
            .checked_mul(&scale)
            .zip(frac_value.checked_mul(&frac_scale))
            .and_then(|(w, f)| w.checked_add(&f))
            .ok_or(TypesError::U256Overflow)
    }

    /// Render base units as a decimal amount with `decimals` fractional
    /// digits. Trailing fractional zeros are trimmed but at least one
    /// fractional digit is kept (`"100.0"`).
    pub fn format_units(&self, decimals: u32) -> Result<String, TypesError> {
        if decimals > Self::MAX_DECIMALS {
            return Err(TypesError::UnsupportedDecimals(decimals));
        }

        let raw = self.to_string();
        if decimals == 0 {
            return Ok(raw);
        }

        let decimals = decimals as usize;
        let padded = if raw.len() <= decimals {
            format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
        } else {
            raw
        };

        let (whole, frac) = padded.split_at(padded.len() - decimals);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            Ok(format!("{}.0", whole))
        } else {
            Ok(format!("{}.{}", whole, frac))
        }
    }
}

impl From<u64> for U256 {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

impl From<u128> for U256 {
    fn from(val: u128) -> Self {
        Self::from_u128(val)
    }
}

impl From<u32> for U256 {
    fn from(val: u32) -> Self {
        Self::from_u64(val as u64)
    }
}

impl TryFrom<U256> for u64 {
    type Error = TypesError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[1] != 0 || value.0[2] != 0 || value.0[3] != 0 {
            Err(TypesError::U256Overflow)
        } else {
            Ok(value.0[0])
        }
    }
}

impl TryFrom<U256> for u128 {
    type Error = TypesError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[2] != 0 || value.0[3] != 0 {
            Err(TypesError::U256Overflow)
        } else {
            Ok((value.0[1] as u128) << 64 | value.0[0] as u128)
        }
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut n = *self;
        let mut digits = Vec::with_capacity(78);

        while !n.is_zero() {
            let (q, rem) = n.div_rem_u64(10).ok_or(fmt::Error)?;
            digits.push(b'0' + rem as u8);
            n = q;
        }
        digits.reverse();

        f.write_str(std::str::from_utf8(&digits).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl FromStr for U256 {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            if digits.is_empty() {
                return Err(TypesError::InvalidU256String(s.to_string()));
            }
            // Leading zeros never count toward the width; hex::decode needs
            // an even number of nibbles
            let significant = digits.trim_start_matches('0');
            let nibbles = if significant.len() % 2 == 1 {
                format!("0{}", significant)
            } else {
                significant.to_string()
            };
            let bytes = hex::decode(&nibbles)?;
            if bytes.len() > 32 {
                return Err(TypesError::U256Overflow);
            }
            let mut padded = [0u8; 32];
            padded[32 - bytes.len()..].copy_from_slice(&bytes);
            Ok(Self::from_be_bytes(padded))
        } else {
            Self::from_decimal_str(s)
        }
    }
}
