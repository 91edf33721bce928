//! Oktalyzer OKT format parser.
//!
//! The format is a fixed 32-byte header followed by a sample record table
//! and a sequence of tagged, length-prefixed chunks: `SPEE`, `SLEN`, `PLEN`,
//! `PATT` (order list), repeated `PBOD` pattern bodies and repeated `SBOD`
//! sample bodies. All multi-byte fields are big-endian.
//!
//! Leniency policy: the header is validated strictly (wrong magic means
//! "not this format, try another loader"), but past the header any chunk
//! that runs off the end of the buffer simply ends the parse, and whatever
//! was decoded up to that point is returned as a successful result. The one
//! exception is a failed pattern-grid allocation, which is fatal.

use log::{debug, warn};
use okt_ir::{Cell, Effect, LoopType, Note, Pattern, Sample, SampleData, Song};

use crate::reader::OktReader;
use crate::FormatError;

/// Maximum supported pattern channels.
pub const MAX_CHANNELS: usize = 32;
/// Maximum stored sample slots; records past this are consumed but dropped.
pub const MAX_SAMPLES: usize = 64;
/// Maximum order list length.
pub const MAX_ORDERS: usize = 256;
/// Maximum stored patterns; bodies past this are consumed but dropped.
pub const MAX_PATTERNS: usize = 256;

/// Smallest buffer that can plausibly hold a module.
const MIN_FILE_SIZE: usize = 1024;
/// Fixed header: four tags, the CMOD length word and the channel setup.
const HEADER_SIZE: usize = 32;
/// One sample record: name[20] len[4] loopstart[2] looplen[2] pad vol pad pad.
const SAMPLE_RECORD_SIZE: usize = 32;
/// Chunk header: 4-byte tag + 4-byte payload length.
const CHUNK_HEADER_SIZE: usize = 8;
/// Bytes needed to probe a chunk: the header plus the payload byte at
/// chunk-relative offset 9 that every fixed-field chunk is read through.
const CHUNK_PROBE_SIZE: usize = 10;

/// Raw end-of-song marker in the order list.
const ORDER_END_BYTE: u8 = 0xFF;

/// How far the parser got on a successful parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// The whole chunk sequence was consumed.
    Complete,
    /// A declared structure extended past the end of the buffer; the song
    /// holds everything decoded before that point.
    Truncated,
}

/// A successfully parsed module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedSong {
    pub song: Song,
    pub status: LoadStatus,
}

/// Cheap header-only check, for format dispatch loops that try several
/// detectors in sequence. Agrees with [`load_okt`]'s detection verdict.
pub fn probe_okt(data: &[u8]) -> bool {
    OktHeader::parse(data).is_ok()
}

/// Load an OKT module from bytes.
///
/// Returns [`FormatError::UnrecognizedFormat`] (or `UnexpectedEof` for
/// buffers under the minimum size) when the header does not validate, and
/// [`FormatError::AllocationFailed`] if a pattern grid cannot be allocated.
/// Anything else, including arbitrarily truncated input, parses to an
/// `Ok` [`LoadedSong`].
pub fn load_okt(data: &[u8]) -> Result<LoadedSong, FormatError> {
    let header = OktHeader::parse(data)?;
    debug!(
        "OKT: {} channels, {} declared sample records",
        header.num_channels, header.sample_count
    );

    let mut song = Song::with_channels(header.num_channels);
    let mut reader = OktReader::new(data);
    reader.skip(HEADER_SIZE)?;

    match parse_after_header(&mut reader, &header, &mut song) {
        Ok(()) => Ok(LoadedSong {
            song,
            status: LoadStatus::Complete,
        }),
        Err(FormatError::UnexpectedEof) => {
            debug!("OKT: input ends mid-structure at byte {}", reader.pos());
            Ok(LoadedSong {
                song,
                status: LoadStatus::Truncated,
            })
        }
        Err(e) => Err(e),
    }
}

/// The validated fixed header.
struct OktHeader {
    num_channels: u8,
    /// Record count declared by the SAMP table length. Not capped: every
    /// declared record is consumed from the cursor even when not stored.
    sample_count: usize,
}

impl OktHeader {
    /// Validate magic tags and fixed invariants. Nothing is allocated and
    /// nothing past the fixed header is touched.
    fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < MIN_FILE_SIZE {
            return Err(FormatError::UnexpectedEof);
        }
        if &data[0..4] != b"OKTA" || &data[4..8] != b"SONG" || &data[8..12] != b"CMOD" {
            return Err(FormatError::UnrecognizedFormat);
        }
        let cmod_len = u32::from_be_bytes([data[12], data[13], data[14], data[15]]);
        if cmod_len != 8 {
            return Err(FormatError::UnrecognizedFormat);
        }
        let setup = &data[16..24];
        // Even setup bytes are reserved and must be zero
        if setup[0] != 0 || setup[2] != 0 || setup[4] != 0 || setup[6] != 0 {
            return Err(FormatError::UnrecognizedFormat);
        }
        if &data[24..28] != b"SAMP" {
            return Err(FormatError::UnrecognizedFormat);
        }
        let sample_table_len = u32::from_be_bytes([data[28], data[29], data[30], data[31]]);

        // Base 4 voices plus one per configured split channel
        let configured =
            4 + setup[1] as usize + setup[3] as usize + setup[5] as usize + setup[7] as usize;
        let num_channels = configured.min(MAX_CHANNELS);
        if num_channels < configured {
            warn!("OKT: clamping {configured} channels to {MAX_CHANNELS}");
        }

        Ok(Self {
            num_channels: num_channels as u8,
            sample_count: (sample_table_len as usize) / SAMPLE_RECORD_SIZE,
        })
    }
}

/// Everything after the fixed header. An `UnexpectedEof` return means the
/// buffer ran out mid-structure; the caller treats that as a successful
/// truncated parse. `AllocationFailed` is the only fatal error.
fn parse_after_header(
    reader: &mut OktReader<'_>,
    header: &OktHeader,
    song: &mut Song,
) -> Result<(), FormatError> {
    // Sample record table, directly after the header
    for slot in 0..header.sample_count {
        if reader.remaining() < SAMPLE_RECORD_SIZE {
            return Err(FormatError::UnexpectedEof);
        }
        let record = reader.read_bytes(SAMPLE_RECORD_SIZE)?;
        if slot < MAX_SAMPLES {
            song.samples.push(decode_sample_record(record));
        } else if slot == MAX_SAMPLES {
            warn!(
                "OKT: {} sample records declared, keeping {MAX_SAMPLES}",
                header.sample_count
            );
        }
    }

    // SPEE: default speed in the payload byte at +9
    if reader.remaining() < CHUNK_PROBE_SIZE {
        return Err(FormatError::UnexpectedEof);
    }
    if reader.peek_tag() == Some(*b"SPEE") {
        song.initial_speed = reader.byte_at(9)?;
        skip_chunk(reader)?;
    }

    // SLEN: advisory pattern count, superseded by per-PBOD row bytes
    if reader.remaining() < CHUNK_PROBE_SIZE {
        return Err(FormatError::UnexpectedEof);
    }
    if reader.peek_tag() == Some(*b"SLEN") {
        let _advisory = reader.byte_at(9)?;
        skip_chunk(reader)?;
    }

    // PLEN: number of order entries
    let mut norders: u8 = 0;
    if reader.remaining() < CHUNK_PROBE_SIZE {
        return Err(FormatError::UnexpectedEof);
    }
    if reader.peek_tag() == Some(*b"PLEN") {
        norders = reader.byte_at(9)?;
        skip_chunk(reader)?;
    }

    // PATT: the order list itself, one byte per entry from +8
    if reader.remaining() < CHUNK_PROBE_SIZE {
        return Err(FormatError::UnexpectedEof);
    }
    if reader.peek_tag() == Some(*b"PATT") {
        let count = (norders as usize).min(MAX_ORDERS - 1);
        let mut raw = reader.bytes_at(CHUNK_HEADER_SIZE, count)?.to_vec();

        // Rewrite trailing zeros to the end marker, scanning backward.
        // Stops at the first nonzero entry and never rewrites index 0, so a
        // song legitimately starting with pattern 0 keeps it.
        let mut j = raw.len();
        while j > 1 {
            if raw[j - 1] != 0 {
                break;
            }
            raw[j - 1] = ORDER_END_BYTE;
            j -= 1;
        }

        song.order = raw
            .into_iter()
            .map(|b| {
                if b == ORDER_END_BYTE {
                    okt_ir::OrderEntry::End
                } else {
                    okt_ir::OrderEntry::Pattern(b)
                }
            })
            .collect();
        skip_chunk(reader)?;
    }

    // PBOD: pattern bodies. Rows byte at +9 (0 means 64), then rows *
    // channels cell quads from +10. The index advances per body seen so the
    // cursor stays aligned even for bodies past the storage cap.
    let mut npat: usize = 0;
    while reader.remaining() >= CHUNK_PROBE_SIZE && reader.peek_tag() == Some(*b"PBOD") {
        let mut rows = reader.byte_at(9)? as u16;
        if rows == 0 {
            rows = 64;
        }

        if npat < MAX_PATTERNS {
            let mut pattern = Pattern::try_new(rows, song.num_channels)
                .map_err(|_| FormatError::AllocationFailed)?;

            let mut cell_pos = CHUNK_PROBE_SIZE;
            'fill: for row in 0..rows {
                for ch in 0..song.num_channels {
                    let quad = match reader.bytes_at(cell_pos, 4) {
                        Ok(q) => q,
                        // Keep the partially filled pattern; the chunk skip
                        // below ends the parse
                        Err(_) => break 'fill,
                    };
                    *pattern.cell_mut(row, ch) = decode_cell(quad);
                    cell_pos += 4;
                }
            }
            song.patterns.push(pattern);
        } else if npat == MAX_PATTERNS {
            warn!("OKT: more than {MAX_PATTERNS} pattern bodies, dropping the rest");
        }
        npat += 1;

        skip_chunk(reader)?;
    }

    // SBOD: sample bodies, signed 8-bit PCM handed to the sample decoder.
    // Bodies line up with sample slots in declaration order.
    let mut nsmp: usize = 0;
    while reader.remaining() >= CHUNK_PROBE_SIZE && reader.peek_tag() == Some(*b"SBOD") {
        if nsmp < MAX_SAMPLES {
            if let Some(sample) = song.samples.get_mut(nsmp) {
                let payload =
                    reader.bytes_at(CHUNK_HEADER_SIZE, reader.remaining() - CHUNK_HEADER_SIZE)?;
                decode_pcm8(sample, payload);
            }
        }
        nsmp += 1;

        skip_chunk(reader)?;
    }

    Ok(())
}

/// Skip a chunk from its tag: declared payload length at +4, plus the
/// 8-byte chunk header.
fn skip_chunk(reader: &mut OktReader<'_>) -> Result<(), FormatError> {
    let len = reader.u32_be_at(4)? as usize;
    let total = len
        .checked_add(CHUNK_HEADER_SIZE)
        .ok_or(FormatError::UnexpectedEof)?;
    reader.skip(total)
}

/// Decode one 32-byte sample record.
fn decode_sample_record(record: &[u8]) -> Sample {
    let mut sample = Sample::default();
    sample.name.copy_from_slice(&record[0..20]);

    // Length is in bytes; the player works in whole 16-bit words
    sample.length = u32::from_be_bytes([record[20], record[21], record[22], record[23]]) & !1;
    sample.loop_start = u16::from_be_bytes([record[24], record[25]]) as u32;
    let loop_len = u16::from_be_bytes([record[26], record[27]]) as u32;
    sample.loop_end = sample.loop_start + loop_len;
    if sample.loop_end > sample.loop_start + 2 {
        sample.loop_type = LoopType::Forward;
    }
    // record[28] pad
    sample.volume = (record[29] as u16) << 2; // 7-bit volume, 0x40 is full scale
    sample.global_volume = 64;
    sample.c4_speed = 8363;

    sample
}

/// Decode one 4-byte pattern cell quad: note, instrument, command, parameter.
fn decode_cell(quad: &[u8]) -> Cell {
    let mut cell = Cell::empty();
    if quad[0] != 0 {
        cell.note = Note::On(quad[0].wrapping_add(48));
        cell.instrument = quad[1].wrapping_add(1);
    }
    cell.effect = remap_effect(quad[2], quad[3]);
    cell
}

/// Remap a raw OKT command/parameter pair into the normalized effect set.
/// Unknown commands decode to no effect.
fn remap_effect(command: u8, param: u8) -> Effect {
    match command {
        1 | 17 | 30 if param != 0 => Effect::PortaUp(param),
        2 | 13 | 21 if param != 0 => Effect::PortaDown(param),
        10 | 11 | 12 => Effect::Arpeggio(param),
        15 => Effect::Extended(param & 0x0F), // filter toggle
        25 => Effect::PositionJump(param),
        28 => Effect::SetSpeed(param),
        31 => remap_volume_effect(param),
        _ => Effect::None,
    }
}

/// Command 31 packs five volume operations into parameter ranges.
fn remap_volume_effect(param: u8) -> Effect {
    if param <= 0x40 {
        Effect::SetVolume(param)
    } else if param <= 0x50 {
        // Slide down, amount in the low nibble
        match param & 0x0F {
            0 => Effect::VolumeSlide(0x0F),
            p => Effect::VolumeSlide(p),
        }
    } else if param <= 0x60 {
        // Slide up, amount moved to the high nibble
        match (param & 0x0F) << 4 {
            0 => Effect::VolumeSlide(0xF0),
            p => Effect::VolumeSlide(p),
        }
    } else if param <= 0x70 {
        // Fine slide down
        match param & 0x0F {
            0 => Effect::Extended(0xBF),
            p => Effect::Extended(0xB0 | p),
        }
    } else if param <= 0x80 {
        // Fine slide up
        match param & 0x0F {
            0 => Effect::Extended(0xAF),
            p => Effect::Extended(0xA0 | p),
        }
    } else {
        Effect::None
    }
}

/// Sample-body decoder boundary: signed 8-bit mono PCM, clipped to the
/// declared sample length.
fn decode_pcm8(sample: &mut Sample, payload: &[u8]) {
    let n = (sample.length as usize).min(payload.len());
    let pcm: Vec<i8> = payload[..n].iter().map(|&b| b as i8).collect();
    sample.data = SampleData::Mono8(pcm);
}
