//! Little-endian scalar reads and writes.
//!
//! These are the primitives every archive section is built from.
//! Short reads surface as [``std::io::ErrorKind::UnexpectedEof``]
//! from the transport.

use std::io::{self, Read, Write};

/// Write a `u8`.
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

/// Read a `u8`.
pub fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0_u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Write a `u16`.
pub fn write_u16<W: Write>(writer: &mut W, value: u16) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a `u16`.
pub fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0_u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Write a `u32`.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a `u32`.
pub fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0_u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write an `i32`.
pub fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read an `i32`.
pub fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0_u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Write a `u64`.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a `u64`.
pub fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0_u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Write an `i64`.
pub fn write_i64<W: Write>(writer: &mut W, value: i64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read an `i64`.
pub fn read_i64<R: Read>(reader: &mut R) -> io::Result<i64> {
    let mut buf = [0_u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

/// Write an `f64`.
pub fn write_f64<W: Write>(writer: &mut W, value: f64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read an `f64`.
pub fn read_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut buf = [0_u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Write a `bool` as one byte.
pub fn write_bool<W: Write>(writer: &mut W, value: bool) -> io::Result<()> {
    write_u8(writer, u8::from(value))
}

/// Read a `bool`; any nonzero byte is `true`.
pub fn read_bool<R: Read>(reader: &mut R) -> io::Result<bool> {
    Ok(read_u8(reader)? != 0)
}

/// Write a length-prefixed sequence of `f64`.
///
/// An empty slice produces exactly the 8-byte zero length prefix
/// and no trailing data.
pub fn write_f64_vec<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    write_u64(writer, values.len() as u64)?;
    for value in values {
        write_f64(writer, *value)?;
    }
    Ok(())
}

/// Read a length-prefixed sequence of `f64`.
pub fn read_f64_vec<R: Read>(reader: &mut R) -> io::Result<Vec<f64>> {
    let n = read_u64(reader)?;
    let mut values = Vec::new();
    for _ in 0..n {
        values.push(read_f64(reader)?);
    }
    Ok(values)
}

/// Write a length-prefixed sequence of `u32`.
pub fn write_u32_vec<W: Write>(writer: &mut W, values: &[u32]) -> io::Result<()> {
    write_u64(writer, values.len() as u64)?;
    for value in values {
        write_u32(writer, *value)?;
    }
    Ok(())
}

/// Read a length-prefixed sequence of `u32`.
pub fn read_u32_vec<R: Read>(reader: &mut R) -> io::Result<Vec<u32>> {
    let n = read_u64(reader)?;
    let mut values = Vec::new();
    for _ in 0..n {
        values.push(read_u32(reader)?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_u32_roundtrip(x in any::<u32>()) {
            let mut buffer = vec![];
            write_u32(&mut buffer, x).unwrap();
            prop_assert_eq!(buffer.len(), 4);
            prop_assert_eq!(read_u32(&mut buffer.as_slice()).unwrap(), x);
        }
    }

    proptest! {
        #[test]
        fn test_i64_roundtrip(x in any::<i64>()) {
            let mut buffer = vec![];
            write_i64(&mut buffer, x).unwrap();
            prop_assert_eq!(read_i64(&mut buffer.as_slice()).unwrap(), x);
        }
    }

    proptest! {
        #[test]
        fn test_f64_roundtrip(x in any::<f64>()) {
            let mut buffer = vec![];
            write_f64(&mut buffer, x).unwrap();
            let back = read_f64(&mut buffer.as_slice()).unwrap();
            prop_assert_eq!(back.to_bits(), x.to_bits());
        }
    }

    proptest! {
        #[test]
        fn test_f64_vec_roundtrip(values in proptest::collection::vec(any::<f64>(), 0..64)) {
            let mut buffer = vec![];
            write_f64_vec(&mut buffer, &values).unwrap();
            prop_assert_eq!(buffer.len(), 8 + 8 * values.len());
            let back = read_f64_vec(&mut buffer.as_slice()).unwrap();
            prop_assert_eq!(back.len(), values.len());
            for (a, b) in back.iter().zip(values.iter()) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn test_empty_f64_vec_is_just_the_prefix() {
        let mut buffer = vec![];
        write_f64_vec(&mut buffer, &[]).unwrap();
        assert_eq!(buffer, vec![0_u8; 8]);
        assert!(read_f64_vec(&mut buffer.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_short_read_is_unexpected_eof() {
        let bytes = [1_u8, 2, 3];
        assert_eq!(
            read_u32(&mut bytes.as_slice()).unwrap_err().kind(),
            std::io::ErrorKind::UnexpectedEof
        );
    }
}
