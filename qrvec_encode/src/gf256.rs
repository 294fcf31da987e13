//! Arithmetic in GF(2^8) over the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.

use once_cell::sync::Lazy;

use crate::EncodeError;

const PRIMITIVE_POLY: u16 = 0x11D;

struct Tables {
    /// alpha^i for i in 0..=255.
    exp: [u8; 256],
    /// log_alpha(i) for i in 1..=255; entry 0 is meaningless and never read.
    log: [u8; 256],
}

static TABLES: Lazy<Tables> = Lazy::new(|| {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    for i in 0..256 {
        exp[i] = x as u8;
        if i < 255 {
            log[x as usize] = i as u8;
        }
        x <<= 1;
        if x >= 0x100 {
            x ^= PRIMITIVE_POLY;
        }
    }
    Tables { exp, log }
});

/// alpha^i, with the exponent taken modulo 255.
pub fn exp(i: usize) -> u8 {
    TABLES.exp[i % 255]
}

/// Multiply `a` and `b`.
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = &*TABLES;
    let sum = t.log[a as usize] as usize + t.log[b as usize] as usize;
    t.exp[sum % 255]
}

/// Divide `a` by `b`. Fails when `b` is zero, which signals a broken invariant in the caller.
pub fn div(a: u8, b: u8) -> Result<u8, EncodeError> {
    if b == 0 {
        return Err(EncodeError::DivByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let t = &*TABLES;
    let diff = t.log[a as usize] as usize + 255 - t.log[b as usize] as usize;
    Ok(t.exp[diff % 255])
}

/// Build the generator polynomial whose roots are alpha^0 .. alpha^(degree - 1). Returned as
/// `degree + 1` coefficients, highest power first, with a leading 1.
pub fn generator_poly(degree: usize) -> Vec<u8> {
    let mut gen = vec![0u8; degree + 1];
    gen[degree] = 1;
    for i in 0..degree {
        let root = exp(i);
        for j in 0..degree {
            gen[j] = mul(gen[j], root) ^ gen[j + 1];
        }
        gen[degree] = mul(gen[degree], root);
    }
    gen
}
