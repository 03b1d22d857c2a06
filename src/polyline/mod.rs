use thiserror::Error;

/// A point in drawing-surface axis order: `[longitude, latitude]`.
pub type LngLat = [f64; 2];

const PRECISION: f64 = 1e5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("chunk sequence still open at end of input (byte {0})")]
    UnterminatedChunk(usize),
    #[error("byte {0:#04x} at offset {1} is outside the polyline alphabet")]
    InvalidByte(u8, usize),
    #[error("latitude delta at byte {0} has no matching longitude delta")]
    MissingLongitude(usize),
    #[error("chunk sequence starting at byte {0} overflows a coordinate")]
    OverlongChunk(usize),
}

/// Decodes an encoded polyline into a line of `[lng, lat]` points.
///
/// The wire format carries (lat, lng) pairs as running deltas scaled by 1e5;
/// the axis order is swapped here so the output can be handed straight to a
/// drawing surface. Malformed input fails the whole decode, it never yields a
/// truncated line.
pub fn decode(encoded: &str) -> Result<Vec<LngLat>, Error> {
    let bytes = encoded.as_bytes();
    let mut line = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    while index < bytes.len() {
        let pair_start = index;
        let (delta, next) = next_delta(bytes, index)?;
        lat += delta;
        if next >= bytes.len() {
            return Err(Error::MissingLongitude(pair_start));
        }
        let (delta, next) = next_delta(bytes, next)?;
        lng += delta;
        index = next;
        line.push([lng as f64 / PRECISION, lat as f64 / PRECISION]);
    }
    Ok(line)
}

/// Encodes a line of `[lng, lat]` points into the polyline wire format.
/// Inverse of [`decode`] up to the 1e5 rounding step.
pub fn encode(line: &[LngLat]) -> String {
    let mut encoded = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;
    for [lng, lat] in line {
        let lat = (lat * PRECISION).round() as i64;
        let lng = (lng * PRECISION).round() as i64;
        push_delta(&mut encoded, lat - prev_lat);
        push_delta(&mut encoded, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }
    encoded
}

fn next_delta(bytes: &[u8], start: usize) -> Result<(i64, usize), Error> {
    let mut value: i64 = 0;
    let mut shift = 0;
    let mut index = start;
    loop {
        let Some(&byte) = bytes.get(index) else {
            return Err(Error::UnterminatedChunk(start));
        };
        if !(63..=126).contains(&byte) {
            return Err(Error::InvalidByte(byte, index));
        }
        if shift >= 64 {
            return Err(Error::OverlongChunk(start));
        }
        let chunk = (byte - 63) as i64;
        value |= (chunk & 0x1f) << shift;
        shift += 5;
        index += 1;
        if chunk & 0x20 == 0 {
            break;
        }
    }
    // Lowest bit is the sign, the rest is the magnitude.
    let delta = if value & 1 == 1 {
        !(value >> 1)
    } else {
        value >> 1
    };
    Ok((delta, index))
}

fn push_delta(encoded: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        encoded.push((((value & 0x1f) | 0x20) + 63) as u8 as char);
        value >>= 5;
    }
    encoded.push((value + 63) as u8 as char);
}

#[test]
fn decode_single_point_test() {
    let line = decode("_p~iF~ps|U").unwrap();
    assert_eq!(line, vec![[-120.2, 38.5]])
}

#[test]
fn decode_empty_test() {
    assert_eq!(decode("").unwrap(), Vec::<LngLat>::new())
}

#[test]
fn encode_single_point_test() {
    assert_eq!(encode(&[[-120.2, 38.5]]), "_p~iF~ps|U")
}
