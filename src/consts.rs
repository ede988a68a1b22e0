/// First Bikram Sambat year covered by the bundled calendar table (inclusive)
pub const MIN_YEAR: u16 = 2000;

/// Last Bikram Sambat year covered by the bundled calendar table (inclusive)
pub const MAX_YEAR: u16 = 2090;

/// Months in a Bikram Sambat year (Baisakh through Chaitra)
pub const MONTHS_PER_YEAR: u8 = 12;

/// Nepal Standard Time offset from UTC (+05:45), in seconds
pub const NEPAL_UTC_OFFSET_SECS: i64 = 5 * 3600 + 45 * 60;

/// Gregorian (year, month, day) of Bikram Sambat 2000-01-01,
/// the epoch the bundled table is anchored to
pub const REFERENCE_DATE_AD: (i32, u32, u32) = (1943, 4, 14);

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
