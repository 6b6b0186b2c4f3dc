//! Envelope data model.
//!
//! An [`Envelope`] is the unit of data published on a session: an opaque
//! payload tagged with the identifier of its schema and a few timestamps.
//! The recorder never looks inside the payload except for
//! [`RecorderCommand`](crate::RecorderCommand) envelopes.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant with microsecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeStamp {
    /// Seconds since the Unix epoch
    pub seconds: i64,
    /// Microseconds within the second
    pub microseconds: i32,
}

impl TimeStamp {
    pub fn new(seconds: i64, microseconds: i32) -> Self {
        Self {
            seconds,
            microseconds,
        }
    }

    /// Current UTC wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            seconds: dt.timestamp(),
            microseconds: dt.timestamp_subsec_micros() as i32,
        }
    }

    /// Convert back to a UTC datetime, if the value is representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, (self.microseconds.max(0) as u32) * 1000)
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.microseconds == 0
    }
}

/// A typed, timestamped unit of data delivered over the subscribed stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Identifier of the payload schema
    pub data_type: i32,
    /// Serialized message, opaque to the recorder
    pub payload: Vec<u8>,
    /// When the publisher sent the envelope
    pub sent: TimeStamp,
    /// When this process received the envelope (zero until stamped)
    pub received: TimeStamp,
    /// Sample time chosen by the publisher
    pub sample_time: TimeStamp,
    /// Publisher-chosen discriminator for several senders of one type
    pub sender_stamp: u32,
}

impl Envelope {
    /// Create an envelope, stamping `sent` and `sample_time` with the current time.
    pub fn new(data_type: i32, payload: Vec<u8>) -> Self {
        let now = TimeStamp::now();
        Self {
            data_type,
            payload,
            sent: now,
            received: TimeStamp::default(),
            sample_time: now,
            sender_stamp: 0,
        }
    }

    pub fn with_sender_stamp(mut self, sender_stamp: u32) -> Self {
        self.sender_stamp = sender_stamp;
        self
    }

    /// Mark the envelope as received now
    pub fn stamp_received(&mut self) {
        self.received = TimeStamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_datetime_conversion() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        let ts = TimeStamp::from_datetime(&dt);
        assert_eq!(ts.seconds, dt.timestamp());
        assert_eq!(ts.microseconds, 0);
        assert_eq!(ts.to_datetime(), Some(dt));
    }

    #[test]
    fn test_new_envelope_is_not_received() {
        let mut env = Envelope::new(1001, vec![1, 2, 3]).with_sender_stamp(7);
        assert_eq!(env.data_type, 1001);
        assert_eq!(env.sender_stamp, 7);
        assert!(!env.sent.is_zero());
        assert!(env.received.is_zero());

        env.stamp_received();
        assert!(env.received >= env.sent);
    }
}
