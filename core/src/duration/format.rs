//! duration/format.rs
//! Renders nanosecond counts as `[<h>h][<m>m]<s>[.<frac>]s`.
//!
//! Output is built right-to-left in a fixed stack buffer: seconds marker,
//! fraction (trailing zeros stripped), seconds, then minutes and hours only
//! when the magnitude reaches them. Hours are uncapped.

/// Large enough for `-` + every component of `u64::MAX` nanoseconds.
const BUF_LEN: usize = 32;

/// Format a signed nanosecond count. `0` renders as `"0s"`.
pub fn format_duration(ns: i64) -> String {
    let mut buf = [0u8; BUF_LEN];
    let mut w = BUF_LEN;
    let mut u = ns.unsigned_abs();

    w -= 1;
    buf[w] = b's';

    let (nw, rest) = fmt_frac(&mut buf, w, u, 9);
    w = nw;
    u = rest;

    w = fmt_int(&mut buf, w, u % 60);
    u /= 60;

    if u > 0 {
        w -= 1;
        buf[w] = b'm';
        w = fmt_int(&mut buf, w, u % 60);
        u /= 60;

        if u > 0 {
            w -= 1;
            buf[w] = b'h';
            w = fmt_int(&mut buf, w, u);
        }
    }

    if ns < 0 {
        w -= 1;
        buf[w] = b'-';
    }

    buf[w..].iter().map(|&b| b as char).collect()
}

/// Write the low `prec` decimal digits of `v` as a fraction ending at `w`,
/// dropping trailing zeros and the point itself when all are zero.
/// Returns the new write index and `v` with those digits removed.
fn fmt_frac(buf: &mut [u8], mut w: usize, mut v: u64, prec: usize) -> (usize, u64) {
    let mut print = false;
    for _ in 0..prec {
        let digit = (v % 10) as u8;
        print = print || digit != 0;
        if print {
            w -= 1;
            buf[w] = digit + b'0';
        }
        v /= 10;
    }
    if print {
        w -= 1;
        buf[w] = b'.';
    }
    (w, v)
}

/// Write `v` in decimal ending at `w`; returns the new write index.
fn fmt_int(buf: &mut [u8], mut w: usize, mut v: u64) -> usize {
    if v == 0 {
        w -= 1;
        buf[w] = b'0';
        return w;
    }
    while v > 0 {
        w -= 1;
        buf[w] = (v % 10) as u8 + b'0';
        v /= 10;
    }
    w
}
