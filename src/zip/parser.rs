//! Low-level ZIP container parsing.
//!
//! This module handles the binary parsing of ZIP structures from the raw
//! archive bytes held in memory.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the end of the bytes
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all entries
//! 4. For decompression, read one entry's Local File Header and data
//!
//! Reading the central directory first means a single entry can later be
//! decompressed without touching any other entry's data, which is what keeps
//! per-page memory bounded for archives with hundreds of entries.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::error::{Error, Result};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// Find and parse the End of Central Directory record.
///
/// The EOCD is located at the end of the archive. This handles both the
/// simple case (no comment) and archives with comments by searching
/// backwards for the signature.
///
/// # Returns
///
/// A tuple of (EOCD record, offset of EOCD in the bytes).
///
/// # Errors
///
/// Returns [`Error::CorruptArchive`] if no valid EOCD can be found,
/// indicating the bytes are not a valid ZIP archive.
pub fn find_eocd(data: &[u8]) -> Result<(EndOfCentralDirectory, usize)> {
    // Fast path: no trailing comment, EOCD sits exactly at the end.
    if data.len() >= EndOfCentralDirectory::SIZE {
        let offset = data.len() - EndOfCentralDirectory::SIZE;
        let tail = &data[offset..];
        if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && &tail[20..22] == b"\x00\x00" {
            let eocd = EndOfCentralDirectory::from_bytes(tail)?;
            return Ok((eocd, offset));
        }
    }

    // EOCD not at expected location - search for it. The EOCD could be
    // earlier if there's a ZIP comment, so scan backwards from the end.
    let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(data.len());
    let search_start = data.len() - search_size;
    let window = &data[search_start..];

    for i in (0..window.len().saturating_sub(EndOfCentralDirectory::SIZE)).rev() {
        if &window[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
            // Found a potential EOCD - the comment length field must match
            // the number of bytes remaining after the record.
            let comment_len = u16::from_le_bytes([window[i + 20], window[i + 21]]) as usize;

            if comment_len == window.len() - i - EndOfCentralDirectory::SIZE {
                let eocd = EndOfCentralDirectory::from_bytes(
                    &window[i..i + EndOfCentralDirectory::SIZE],
                )?;
                return Ok((eocd, search_start + i));
            }
        }
    }

    Err(Error::corrupt("end of central directory not found"))
}

/// Read the ZIP64 End of Central Directory record.
///
/// Called when the regular EOCD indicates ZIP64 extensions are needed
/// (fields set to 0xFFFF or 0xFFFFFFFF).
pub fn read_zip64_eocd(data: &[u8], eocd_offset: usize) -> Result<Zip64Eocd> {
    // The ZIP64 EOCD Locator is located immediately before the regular EOCD
    let locator_offset = eocd_offset
        .checked_sub(Zip64EocdLocator::SIZE)
        .ok_or_else(|| Error::corrupt("truncated ZIP64 locator"))?;
    let locator = Zip64EocdLocator::from_bytes(&data[locator_offset..eocd_offset])?;

    let eocd64_offset = usize::try_from(locator.eocd64_offset)
        .map_err(|_| Error::corrupt("ZIP64 offset out of range"))?;
    let eocd64_end = eocd64_offset
        .checked_add(Zip64Eocd::MIN_SIZE)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| Error::corrupt("ZIP64 record out of range"))?;

    Zip64Eocd::from_bytes(&data[eocd64_offset..eocd64_end])
}

/// List all entries in the ZIP archive.
///
/// Finds the EOCD, then walks the whole central directory and parses one
/// [`ZipEntry`] per Central Directory File Header, in container order.
///
/// # Errors
///
/// Returns [`Error::CorruptArchive`] if the archive structure is invalid.
pub fn list_entries(data: &[u8]) -> Result<Vec<ZipEntry>> {
    let (eocd, eocd_offset) = find_eocd(data)?;

    // Get central directory location, using ZIP64 fields if needed
    let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
        let eocd64 = read_zip64_eocd(data, eocd_offset)?;
        (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
    } else {
        (
            eocd.cd_offset as u64,
            eocd.cd_size as u64,
            eocd.total_entries as u64,
        )
    };

    let cd_start = usize::try_from(cd_offset)
        .map_err(|_| Error::corrupt("central directory offset out of range"))?;
    let cd_end = cd_start
        .checked_add(
            usize::try_from(cd_size)
                .map_err(|_| Error::corrupt("central directory size out of range"))?,
        )
        .filter(|end| *end <= data.len())
        .ok_or_else(|| Error::corrupt("central directory out of range"))?;
    let cd_data = &data[cd_start..cd_end];

    let mut entries = Vec::with_capacity(total_entries.min(u16::MAX as u64) as usize);
    let mut cursor = Cursor::new(cd_data);

    for _ in 0..total_entries {
        entries.push(parse_cdfh(&mut cursor)?);
    }

    Ok(entries)
}

/// Parse one Central Directory File Header from a cursor.
///
/// The CDFH carries the entry's name, sizes, compression method and the
/// offset of the entry's Local File Header, plus optional ZIP64 extra
/// fields that override the saturated 32-bit values.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipEntry> {
    let mut sig = [0u8; 4];
    cursor
        .read_exact(&mut sig)
        .map_err(|_| Error::corrupt("truncated central directory"))?;
    if sig != CDFH_SIGNATURE {
        return Err(Error::corrupt("invalid central directory file header"));
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let _flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut name_bytes = vec![0u8; file_name_length as usize];
    cursor
        .read_exact(&mut name_bytes)
        .map_err(|_| Error::corrupt("truncated entry name"))?;
    // Lossy conversion keeps non-UTF8 entry names navigable
    let name = String::from_utf8_lossy(&name_bytes).to_string();

    // Directory entries end with '/'
    let is_directory = name.ends_with('/');

    // Parse extra field for ZIP64 extended information (extra field ID 0x0001).
    // Fields are present only when the corresponding header field saturates.
    let extra_field_end = cursor.position() + extra_field_length as u64;

    while cursor.position() + 4 <= extra_field_end {
        let header_id = cursor.read_u16::<LittleEndian>()?;
        let field_size = cursor.read_u16::<LittleEndian>()?;

        if header_id == 0x0001 {
            if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                uncompressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                compressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                lfh_offset = cursor.read_u64::<LittleEndian>()?;
            }
            // Skip any remaining ZIP64 fields (disk number start)
            let remaining = extra_field_end.saturating_sub(cursor.position());
            cursor.set_position(cursor.position() + remaining);
        } else {
            cursor.set_position(cursor.position() + field_size as u64);
        }
    }

    cursor.set_position(extra_field_end);

    // Skip over the file comment (unused)
    cursor.set_position(cursor.position() + file_comment_length as u64);

    Ok(ZipEntry {
        name,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size,
        uncompressed_size,
        crc32,
        lfh_offset,
        is_directory,
    })
}

/// Resolve the actual data offset for an entry.
///
/// The Local File Header has variable-length fields (filename, extra
/// field) that may differ from the central directory entry, so the LFH
/// itself must be read to find where the stored data begins.
pub fn data_offset(data: &[u8], entry: &ZipEntry) -> Result<usize> {
    let lfh_start = usize::try_from(entry.lfh_offset)
        .map_err(|_| Error::corrupt("local header offset out of range"))?;
    let lfh_end = lfh_start
        .checked_add(LFH_SIZE)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| Error::corrupt("local header out of range"))?;
    let lfh = &data[lfh_start..lfh_end];

    if &lfh[0..4] != LFH_SIGNATURE {
        return Err(Error::corrupt("invalid local file header"));
    }

    // Variable field lengths sit at fixed positions in the LFH
    let file_name_length = u16::from_le_bytes([lfh[26], lfh[27]]) as usize;
    let extra_field_length = u16::from_le_bytes([lfh[28], lfh[29]]) as usize;

    // Data starts after: LFH (30 bytes) + filename + extra field
    Ok(lfh_end + file_name_length + extra_field_length)
}
