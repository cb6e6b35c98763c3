//! Wire format produced by the range sensor board: `r1:<cm>,r2:<cm>` + CRLF.

/// Render one payload line the way the sensor firmware prints it.
pub fn format_payload(r1_cm: f64, r2_cm: f64) -> String {
    format!("r1:{r1_cm:.1},r2:{r2_cm:.1}\r\n")
}

/// Copy as much of `line` as fits into `buf`, returning the byte count.
pub(crate) fn copy_into(buf: &mut [u8], line: &str) -> usize {
    let bytes = line.as_bytes();
    let n = bytes.len().min(buf.len());
    buf[..n].copy_from_slice(&bytes[..n]);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_decimal_with_crlf() {
        assert_eq!(format_payload(63.44, 59.06), "r1:63.4,r2:59.1\r\n");
    }

    #[test]
    fn copy_truncates_to_buffer() {
        let mut buf = [0u8; 4];
        assert_eq!(copy_into(&mut buf, "r1:1.0"), 4);
        assert_eq!(&buf, b"r1:1");
    }
}
