/// [Szudzik pairing function][szudzik-pairing].
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// Wraps on overflow: the result is only used to pick a hash bucket.
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub fn pairing2(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Pairing function for three `u64` values.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Structural hash used by the unique table and the computed table.
pub trait MyHash {
    fn hash(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_szudzik() {
        // a\b  0  1  2  3  4
        // ------------------
        // 0    0  1  4  9 16
        // 1    2  3  5 10 17
        // 2    6  7  8 11 18
        assert_eq!(pairing2(0, 0), 0);
        assert_eq!(pairing2(0, 1), 1);
        assert_eq!(pairing2(1, 0), 2);
        assert_eq!(pairing2(1, 1), 3);
        assert_eq!(pairing2(1, 2), 5);
        assert_eq!(pairing2(2, 1), 7);
        assert_eq!(pairing2(0, 4), 16);
        assert_eq!(pairing3(1, 0, 2), pairing2(2, 2));
    }

    #[test]
    fn test_pairing_wraps() {
        let _ = pairing2(u64::MAX, 3);
        let _ = pairing3(u64::MAX, u64::MAX, u64::MAX);
    }
}
