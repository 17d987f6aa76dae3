//! 256-bit fixed-point primitives for the weighted pool formulas.
//!
//! Token amounts and weights arrive as `1e18`-scaled `u128` values. The
//! curve formulas raise balance ratios to non-integer powers, which this
//! module evaluates on a finer `1e27` grid (`RAY`) inside [`U256`] so that
//! rounding error stays far below one base unit for any realistic pool.
//!
//! | Operation | Method |
//! |-----------|--------|
//! | `ln(x)` | range reduction by powers of two, then `2·atanh((m-1)/(m+1))` series |
//! | `exp(y)` | `y = k·ln2 + r`, Taylor series for `e^r`, shift by `k` |
//! | `pow(b, e)` | exact repeated squaring for `floor(e)`, `exp(frac·ln b)` for the rest |
//!
//! Every division floors. Every overflow is an [`AmmError::Overflow`],
//! never a panic.

use ethnum::{I256, U256};

use crate::error::AmmError;

/// `1e18`: scale of amounts, weights, ratios and prices.
pub const WAD: U256 = U256::new(1_000_000_000_000_000_000);

/// `1e27`: internal scale of ratios and powers.
pub const RAY: U256 = U256::new(1_000_000_000_000_000_000_000_000_000);

/// `ln(2)` at `RAY` scale.
pub const LN_2: U256 = U256::new(693_147_180_559_945_309_417_232_121);

/// Largest binary exponent `exp` accepts before the result cannot fit.
const MAX_EXP_SHIFT: i32 = 160;

/// Widens a `u128` to [`U256`].
#[inline]
#[must_use]
pub fn wide(value: u128) -> U256 {
    U256::from(value)
}

/// Narrows a [`U256`] back to `u128`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` if the value exceeds
/// `u128::MAX`.
#[inline]
pub fn narrow(value: U256, context: &'static str) -> crate::error::Result<u128> {
    u128::try_from(value).map_err(|_| AmmError::Overflow(context))
}

/// Checked multiplication.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] with `context` on overflow.
#[inline]
pub fn mul(a: U256, b: U256, context: &'static str) -> crate::error::Result<U256> {
    a.checked_mul(b).ok_or(AmmError::Overflow(context))
}

/// Checked `a - b`.
///
/// # Errors
///
/// Returns [`AmmError::Underflow`] with `context` if `b > a`.
#[inline]
pub fn sub(a: U256, b: U256, context: &'static str) -> crate::error::Result<U256> {
    a.checked_sub(b).ok_or(AmmError::Underflow(context))
}

/// `floor(a * b / d)`.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `d` is zero.
/// - [`AmmError::Overflow`] if `a * b` exceeds 256 bits.
pub fn mul_div(a: U256, b: U256, d: U256) -> crate::error::Result<U256> {
    if d == U256::ZERO {
        return Err(AmmError::DivisionByZero);
    }
    let product = mul(a, b, "mul_div product overflow")?;
    Ok(product / d)
}

/// Natural logarithm of a positive `RAY`-scaled value, `RAY`-scaled.
///
/// # Errors
///
/// Returns [`AmmError::MathApproximation`] for `x == 0`.
pub fn ln(x: U256) -> crate::error::Result<I256> {
    if x == U256::ZERO {
        return Err(AmmError::MathApproximation("logarithm of zero"));
    }

    // m = x / 2^k with m in [1, 2)
    let two = RAY << 1u32;
    let mut m = x;
    let mut k: i32 = 0;
    while m >= two {
        m >>= 1u32;
        k += 1;
    }
    while m < RAY {
        m <<= 1u32;
        k -= 1;
    }

    // ln(m) = 2 * sum(z^(2n+1) / (2n+1)), z = (m - 1) / (m + 1) <= 1/3
    let z = (m - RAY) * RAY / (m + RAY);
    let z2 = z * z / RAY;
    let mut term = z;
    let mut sum = U256::ZERO;
    let mut n = U256::ONE;
    while term != U256::ZERO {
        sum += term / n;
        term = term * z2 / RAY;
        n += U256::new(2);
    }

    let series = (sum << 1u32).as_i256();
    Ok(I256::from(k) * LN_2.as_i256() + series)
}

/// `e^y` for a `RAY`-scaled exponent, `RAY`-scaled.
///
/// Results too small to represent are zero.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the result exceeds 256 bits.
pub fn exp(y: I256) -> crate::error::Result<U256> {
    let ln2 = LN_2.as_i256();

    // y = k * ln2 + r, r in [0, ln2)
    let mut k = y / ln2;
    let mut r = y - k * ln2;
    if r.is_negative() {
        k -= I256::ONE;
        r += ln2;
    }

    if k > I256::from(MAX_EXP_SHIFT) {
        return Err(AmmError::Overflow("exponential overflow"));
    }
    if k < I256::from(-255) {
        return Ok(U256::ZERO);
    }
    let shift = i32::try_from(k).map_err(|_| AmmError::Overflow("exponent shift"))?;

    let r = r.as_u256();
    let mut sum = RAY;
    let mut term = RAY;
    let mut n = U256::ONE;
    loop {
        term = term * r / (RAY * n);
        if term == U256::ZERO {
            break;
        }
        sum += term;
        n += U256::ONE;
    }

    if shift >= 0 {
        Ok(sum << shift.unsigned_abs())
    } else {
        Ok(sum >> shift.unsigned_abs())
    }
}

/// `base^exponent`, both `RAY`-scaled.
///
/// The integer part of the exponent is applied by exact repeated squaring
/// (one floor per multiplication); only the fractional part goes through
/// `exp(frac * ln(base))`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if an intermediate value exceeds 256 bits.
pub fn pow(base: U256, exponent: U256) -> crate::error::Result<U256> {
    if exponent == U256::ZERO {
        return Ok(RAY);
    }
    if base == U256::ZERO {
        return Ok(U256::ZERO);
    }

    let whole = exponent / RAY;
    let frac = exponent % RAY;

    let int_part = pow_int(base, whole)?;
    if frac == U256::ZERO {
        return Ok(int_part);
    }

    let log = ln(base)?;
    let scaled = log
        .checked_mul(frac.as_i256())
        .ok_or(AmmError::Overflow("power logarithm overflow"))?
        / RAY.as_i256();
    let frac_part = exp(scaled)?;

    mul_div(int_part, frac_part, RAY)
}

fn pow_int(base: U256, mut e: U256) -> crate::error::Result<U256> {
    let mut result = RAY;
    let mut b = base;
    while e != U256::ZERO {
        if e & U256::ONE == U256::ONE {
            result = mul_div(result, b, RAY)?;
        }
        e >>= 1u32;
        if e != U256::ZERO {
            b = mul_div(b, b, RAY)?;
        }
    }
    Ok(result)
}
