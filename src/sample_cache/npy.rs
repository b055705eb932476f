//! Minimal NPY codec for two-dimensional little-endian `f64` arrays.
//!
//! Files are written in format version 1.0 with a C-ordered `'<f8'` payload and a header
//! padded so that the data starts on a 64-byte boundary. Versions 1.0, 2.0 and 3.0 are
//! accepted when reading.
use std::io::{self, Read, Write};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

static DESCR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'descr'\s*:\s*'([^']*)'").expect("descr regex"));
static FORTRAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'fortran_order'\s*:\s*(True|False)").expect("fortran regex"));
static SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").expect("shape regex"));

#[derive(Error, Debug)]
pub enum NpyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("missing NPY magic string")]
    BadMagic,

    #[error("unsupported NPY format version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    #[error("malformed NPY header: {0}")]
    BadHeader(String),

    #[error("unsupported dtype {0}, expected '<f8'")]
    UnsupportedDtype(String),

    #[error("Fortran-ordered arrays are not supported")]
    FortranOrder,

    #[error("payload holds {found} bytes, expected {expected}")]
    Truncated { expected: usize, found: usize },
}

/// A decoded NPY array: its shape and its values in C order.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

/// Write a `rows × cols` C-ordered `f64` matrix.
pub fn write_npy<W: Write>(writer: &mut W, rows: usize, cols: usize, values: &[f64]) -> io::Result<()> {
    if values.len() != rows * cols {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} values for a {rows}x{cols} array", values.len()),
        ));
    }

    let dict = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({rows}, {cols}), }}");
    // magic + version + u16 length + dict + trailing newline
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    let header = format!("{dict}{}\n", " ".repeat(padding));
    let header_len = u16::try_from(header.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "NPY header too long"))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(header.as_bytes())?;
    for v in values {
        writer.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Read an NPY array of `'<f8'` values.
pub fn read_npy<R: Read>(reader: &mut R) -> Result<NpyArray, NpyError> {
    let shape = read_header(reader)?;
    let values = read_values(reader, &shape)?;
    Ok(NpyArray { shape, values })
}

/// Read the preamble and header of an NPY stream and return the array shape.
///
/// The reader is left positioned on the first payload byte.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Vec<usize>, NpyError> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(NpyError::BadMagic);
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len)?;
            u16::from_le_bytes(len) as usize
        }
        2 | 3 => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len)?;
            u32::from_le_bytes(len) as usize
        }
        _ => return Err(NpyError::UnsupportedVersion(version[0], version[1])),
    };

    let mut header = Vec::new();
    reader.by_ref().take(header_len as u64).read_to_end(&mut header)?;
    if header.len() != header_len {
        return Err(NpyError::BadHeader(format!(
            "header holds {} bytes, expected {header_len}",
            header.len()
        )));
    }
    let header = String::from_utf8(header)
        .map_err(|_| NpyError::BadHeader("header is not valid UTF-8".into()))?;
    parse_header(&header)
}

/// Read the C-ordered payload of an array of the given `shape`.
///
/// The byte count claimed by `shape` is never allocated up front: at most one byte past
/// it is read, so an oversized header fails as [`NpyError::Truncated`].
pub fn read_values<R: Read>(reader: &mut R, shape: &[usize]) -> Result<Vec<f64>, NpyError> {
    let expected = shape
        .iter()
        .try_fold(std::mem::size_of::<f64>(), |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| NpyError::BadHeader(format!("shape {shape:?} overflows")))?;

    let mut payload = Vec::new();
    reader
        .by_ref()
        .take((expected as u64).saturating_add(1))
        .read_to_end(&mut payload)?;
    if payload.len() != expected {
        return Err(NpyError::Truncated {
            expected,
            found: payload.len(),
        });
    }

    Ok(payload
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap_or([0u8; 8])))
        .collect())
}

fn parse_header(header: &str) -> Result<Vec<usize>, NpyError> {
    let descr = DESCR_RE
        .captures(header)
        .map(|c| c[1].to_string())
        .ok_or_else(|| NpyError::BadHeader("missing 'descr'".into()))?;
    if descr != "<f8" {
        return Err(NpyError::UnsupportedDtype(descr));
    }

    let fortran = FORTRAN_RE
        .captures(header)
        .map(|c| &c[1] == "True")
        .ok_or_else(|| NpyError::BadHeader("missing 'fortran_order'".into()))?;
    if fortran {
        return Err(NpyError::FortranOrder);
    }

    let dims = SHAPE_RE
        .captures(header)
        .map(|c| c[1].to_string())
        .ok_or_else(|| NpyError::BadHeader("missing 'shape'".into()))?;
    dims.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            d.parse::<usize>()
                .map_err(|_| NpyError::BadHeader(format!("invalid dimension '{d}'")))
        })
        .collect()
}
