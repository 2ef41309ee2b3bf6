/// NumPy `.npy` array reader
///
/// Layout: 6-byte magic `\x93NUMPY`, 2 version bytes, a little-endian header
/// length (u16 for v1.0, u32 for v2.0/v3.0), then an ASCII Python dict such as
/// `{'descr': '<f4', 'fortran_order': False, 'shape': (256, 256), }`,
/// followed by the raw array data.

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};
use std::path::Path;

use crate::error::{LabelerError, Result};

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// A 2D storm image, row-major, values widened to f64
#[derive(Debug, Clone, PartialEq)]
pub struct StormImage {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f64>,
}

impl StormImage {
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// (min, max) over finite values, `None` if there are none
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for &v in self.values.iter().filter(|v| v.is_finite()) {
            range = Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        range
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Float,
    Int,
    UInt,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DType {
    endian: Endian,
    kind: Kind,
    size: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Header {
    dtype: DType,
    fortran_order: bool,
    shape: Vec<usize>,
}

fn npy_err(msg: impl Into<String>) -> LabelerError {
    LabelerError::Npy(msg.into())
}

/// Read a `.npy` file from disk
pub fn read_npy_file(path: &Path) -> Result<StormImage> {
    let bytes = std::fs::read(path)?;
    let image = read_npy(&bytes)
        .map_err(|e| npy_err(format!("{}: {}", path.display(), e)))?;
    log::debug!(
        "Loaded {} ({}×{})",
        path.display(),
        image.rows,
        image.cols
    );
    Ok(image)
}

/// Decode `.npy` bytes into a 2D image
pub fn read_npy(bytes: &[u8]) -> Result<StormImage> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(npy_err("missing NUMPY magic"));
    }
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(6);
    let major = cursor.read_u8()?;
    let _minor = cursor.read_u8()?;
    let header_len = match major {
        1 => cursor.read_u16::<LittleEndian>()? as usize,
        2 | 3 => cursor.read_u32::<LittleEndian>()? as usize,
        v => return Err(npy_err(format!("unsupported format version {}", v))),
    };

    let start = cursor.position() as usize;
    let end = start
        .checked_add(header_len)
        .filter(|&e| e <= bytes.len())
        .ok_or_else(|| npy_err("truncated header"))?;
    let header_text = std::str::from_utf8(&bytes[start..end])
        .map_err(|_| npy_err("header is not valid text"))?;
    let header = parse_header(header_text)?;

    let (rows, cols) = match header.shape.as_slice() {
        [r, c] => (*r, *c),
        [1, r, c] => (*r, *c),
        other => {
            return Err(npy_err(format!("expected a 2D array, got shape {:?}", other)));
        }
    };
    let count = rows
        .checked_mul(cols)
        .ok_or_else(|| npy_err("shape too large"))?;
    let needed = count
        .checked_mul(header.dtype.size)
        .ok_or_else(|| npy_err("shape too large"))?;
    if bytes.len() - end < needed {
        return Err(npy_err(format!(
            "data section holds {} bytes, {} needed",
            bytes.len() - end,
            needed
        )));
    }

    let mut data = Cursor::new(&bytes[end..end + needed]);
    let flat = match header.dtype.endian {
        Endian::Little => read_values::<LittleEndian>(&mut data, header.dtype, count)?,
        Endian::Big => read_values::<BigEndian>(&mut data, header.dtype, count)?,
    };

    let values = if header.fortran_order {
        // column-major: element (r, c) sits at c * rows + r
        let mut out = vec![0.0; count];
        for r in 0..rows {
            for c in 0..cols {
                out[r * cols + c] = flat[c * rows + r];
            }
        }
        out
    } else {
        flat
    };

    Ok(StormImage { rows, cols, values })
}

fn read_values<B: ByteOrder>(
    data: &mut Cursor<&[u8]>,
    dtype: DType,
    count: usize,
) -> io::Result<Vec<f64>> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let v = match (dtype.kind, dtype.size) {
            (Kind::Float, 4) => data.read_f32::<B>()? as f64,
            (Kind::Float, 8) => data.read_f64::<B>()?,
            (Kind::Int, 1) => data.read_i8()? as f64,
            (Kind::Int, 2) => data.read_i16::<B>()? as f64,
            (Kind::Int, 4) => data.read_i32::<B>()? as f64,
            (Kind::Int, 8) => data.read_i64::<B>()? as f64,
            (Kind::UInt, 1) | (Kind::Bool, 1) => data.read_u8()? as f64,
            (Kind::UInt, 2) => data.read_u16::<B>()? as f64,
            (Kind::UInt, 4) => data.read_u32::<B>()? as f64,
            (Kind::UInt, 8) => data.read_u64::<B>()? as f64,
            _ => {
                let mut skip = vec![0u8; dtype.size];
                data.read_exact(&mut skip)?;
                f64::NAN
            }
        };
        out.push(v);
    }
    Ok(out)
}

fn parse_dtype(descr: &str) -> Result<DType> {
    let mut chars = descr.chars();
    let order = chars.next().ok_or_else(|| npy_err("empty descr"))?;
    let endian = match order {
        '<' | '|' | '=' => Endian::Little,
        '>' => Endian::Big,
        c => return Err(npy_err(format!("unknown byte order '{}'", c))),
    };
    let kind = match chars.next() {
        Some('f') => Kind::Float,
        Some('i') => Kind::Int,
        Some('u') => Kind::UInt,
        Some('b') => Kind::Bool,
        _ => return Err(npy_err(format!("unsupported dtype '{}'", descr))),
    };
    let size: usize = chars
        .as_str()
        .parse()
        .map_err(|_| npy_err(format!("bad dtype size in '{}'", descr)))?;

    let supported = match kind {
        Kind::Float => matches!(size, 4 | 8),
        Kind::Int | Kind::UInt => matches!(size, 1 | 2 | 4 | 8),
        Kind::Bool => size == 1,
    };
    if !supported {
        return Err(npy_err(format!("unsupported dtype '{}'", descr)));
    }
    Ok(DType { endian, kind, size })
}

/// Text following `'key':` in the header dict
fn value_after<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let pattern = format!("'{}':", key);
    let pos = header
        .find(&pattern)
        .ok_or_else(|| npy_err(format!("header has no '{}'", key)))?;
    Ok(header[pos + pattern.len()..].trim_start())
}

fn parse_header(header: &str) -> Result<Header> {
    let descr_text = value_after(header, "descr")?;
    let descr = descr_text
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or_else(|| npy_err("descr is not a string"))?;

    let fortran_order = value_after(header, "fortran_order")?.starts_with("True");

    let shape_text = value_after(header, "shape")?;
    let shape_body = shape_text
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or_else(|| npy_err("shape is not a tuple"))?;
    let shape = shape_body
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| npy_err(format!("bad shape '{}'", s))))
        .collect::<Result<Vec<_>>>()?;

    Ok(Header {
        dtype: parse_dtype(descr)?,
        fortran_order,
        shape,
    })
}
