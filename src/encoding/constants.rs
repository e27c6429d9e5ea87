//! Constants of the PostgreSQL binary parameter format.

/// Coder flag bits, as understood by PostgreSQL client coders.
pub mod flags {
    /// Send timestamps as UTC (the default).
    pub const TIMESTAMP_DB_UTC: u32 = 0x0;
    /// Send timestamps as local time.
    pub const TIMESTAMP_DB_LOCAL: u32 = 0x1;
    /// Interpret received timestamps as UTC (decoder side, carried for completeness).
    pub const TIMESTAMP_APP_UTC: u32 = 0x0;
    /// Interpret received timestamps as local time (decoder side, carried for completeness).
    pub const TIMESTAMP_APP_LOCAL: u32 = 0x2;
}

/// Epoch arithmetic for the timestamp encoder.
pub mod epoch {
    /// Days between 1970-01-01 and 2000-01-01, the PostgreSQL epoch.
    pub const POSTGRES_EPOCH_DAYS: i64 = 10_957;
    /// Seconds per day.
    pub const SECS_PER_DAY: i64 = 86_400;
    /// The PostgreSQL epoch in Unix seconds.
    pub const POSTGRES_EPOCH_UNIX_SECS: i64 = POSTGRES_EPOCH_DAYS * SECS_PER_DAY;
    /// Microseconds per second.
    pub const USECS_PER_SEC: i64 = 1_000_000;
}

/// Format code of binary parameters in the extended query protocol.
pub const BINARY_FORMAT: i16 = 1;
