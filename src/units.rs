pub mod temperature {
    pub fn c2f(temp_c: f64) -> f64 {
        temp_c * 9.0 / 5.0 + 32.0
    }

    /// Rounds to one decimal place and renders exactly one fractional digit.
    ///
    /// Ties go toward positive infinity after scaling by ten, so `2.25`
    /// renders as `"2.3"` and `-0.25` as `"-0.2"`.
    pub fn round(value: f64) -> String {
        let mut rounded = (value * 10.0 + 0.5).floor() / 10.0;
        if rounded == 0.0 {
            // no "-0.0"
            rounded = 0.0;
        }
        format!("{rounded:.1}")
    }

    #[test]
    fn test_temperature() {
        assert_eq!(c2f(0.0), 32.0);
        assert_eq!(c2f(100.0), 212.0);
        assert_eq!(c2f(-40.0), -40.0);
        assert_eq!(c2f(37.5), 99.5);
    }

    #[test]
    fn test_conversion_is_exact() {
        for c in [-40.0, -12.5, 0.0, 21.0, 36.6] {
            let f = c2f(c);
            assert!(((f - 32.0) * 5.0 / 9.0 - c).abs() < 1e-9);
        }
    }

    #[test]
    fn test_round() {
        assert_eq!(round(3.14159), "3.1");
        assert_eq!(round(-2.0), "-2.0");
        assert_eq!(round(0.0), "0.0");
        assert_eq!(round(3.0), "3.0");
        assert_eq!(round(2.25), "2.3");
        assert_eq!(round(3.15), "3.2");
        assert_eq!(round(-0.04), "0.0");
        assert_eq!(round(-0.25), "-0.2");
        assert_eq!(round(-7.86), "-7.9");
        assert_eq!(round(99.96), "100.0");
    }
}

pub mod time {
    use chrono::{DateTime, FixedOffset, TimeDelta};

    const MISSING_TIME: &str = "--.--";
    const TIME_FORMAT: &str = "%H.%M";

    /// Wall-clock time at a location `offset_secs` away from UTC, as `HH.MM`.
    pub fn local_time(timestamp: i64, offset_secs: i32) -> String {
        let Some(utc) = DateTime::from_timestamp(timestamp, 0) else {
            log::warn!("timestamp {timestamp} is out of range");
            return MISSING_TIME.to_string();
        };

        match FixedOffset::east_opt(offset_secs) {
            Some(offset) => utc.with_timezone(&offset).format(TIME_FORMAT).to_string(),
            None => {
                log::warn!("utc offset {offset_secs}s is out of range, shifting instead");
                match utc.checked_add_signed(TimeDelta::seconds(offset_secs.into())) {
                    Some(shifted) => shifted.format(TIME_FORMAT).to_string(),
                    None => MISSING_TIME.to_string(),
                }
            }
        }
    }

    #[test]
    fn test_local_time() {
        // 2024-06-01 02:45:00 UTC
        let ts = 1_717_209_900;
        assert_eq!(local_time(ts, 0), "02.45");
        assert_eq!(local_time(ts, 7200), "04.45");
        assert_eq!(local_time(ts, 19_800), "08.15");
    }

    #[test]
    fn test_local_time_crosses_midnight() {
        // 2024-06-01 22:30:00 UTC
        let ts = 1_717_281_000;
        assert_eq!(local_time(ts, 3600), "23.30");
        assert_eq!(local_time(ts, 7200), "00.30");
        // 2024-06-01 00:10:00 UTC
        assert_eq!(local_time(1_717_200_600, -3600), "23.10");
        assert_eq!(local_time(1_717_200_600, -36_000), "14.10");
    }

    #[test]
    fn test_local_time_shape() {
        for (ts, offset) in [(0, 0), (1_700_000_000, -18_000), (1_717_281_000, 50_400)] {
            let text = local_time(ts, offset);
            let bytes = text.as_bytes();
            assert_eq!(bytes.len(), 5, "{text}");
            assert_eq!(bytes[2], b'.');
            assert!(bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit));
        }
    }

    #[test]
    fn test_local_time_out_of_range_offset() {
        assert_eq!(local_time(0, 90_000), "01.00");
    }
}
