use super::NegotiationError;
use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;
use chrono_tz::Tz;

/// Formats accepted besides RFC 3339. Read in the writer's time zone.
const FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Reads a match time typed by a racer whose clock is in `zone`.
/// An explicit RFC 3339 offset wins over the zone. Times before `now` are refused.
pub fn parse_time(text: &str, now: DateTime<Utc>, zone: Tz) -> Result<DateTime<Utc>, NegotiationError> {
    let text = text.trim();
    let time = match DateTime::parse_from_rfc3339(text) {
        Ok(time) => time.with_timezone(&Utc),
        Err(_) => {
            let naive = FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .ok_or_else(|| {
                    NegotiationError::InvalidArgument(format!(
                        "could not read \"{}\" as a time, use YYYY-MM-DD HH:MM ({})",
                        text,
                        zone.name()
                    ))
                })?;
            zone.from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| {
                    NegotiationError::InvalidArgument(format!(
                        "{} does not exist in {}",
                        naive.format("%Y-%m-%d %H:%M"),
                        zone.name()
                    ))
                })?
                .with_timezone(&Utc)
        }
    };
    if time <= now {
        return Err(NegotiationError::InvalidArgument(format!(
            "{} is in the past",
            time.format("%Y-%m-%d %H:%M UTC")
        )));
    }
    Ok(time)
}

/// Reads an IANA time zone name such as `Europe/Berlin`.
pub fn parse_zone(text: &str) -> Result<Tz, NegotiationError> {
    text.trim().parse::<Tz>().map_err(|_| {
        NegotiationError::InvalidArgument(format!(
            "\"{}\" is not a time zone, use a name like America/New_York",
            text.trim()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap()
    }
    #[test]
    fn reads_plain_utc() {
        let time = parse_time("2030-01-02 18:30", now(), Tz::UTC).unwrap();
        assert_eq!(time, Utc.with_ymd_and_hms(2030, 1, 2, 18, 30, 0).unwrap());
    }
    #[test]
    fn reads_local_time_in_the_writers_zone() {
        let winter = parse_time("2030-01-02 18:30", now(), Tz::America__New_York).unwrap();
        assert_eq!(winter, Utc.with_ymd_and_hms(2030, 1, 2, 23, 30, 0).unwrap());
        let summer = parse_time("2030-07-02 18:30", now(), Tz::Europe__Berlin).unwrap();
        assert_eq!(summer, Utc.with_ymd_and_hms(2030, 7, 2, 16, 30, 0).unwrap());
    }
    #[test]
    fn reads_rfc3339_with_offset() {
        let time = parse_time("2030-01-02T20:30:00+02:00", now(), Tz::Asia__Tokyo).unwrap();
        assert_eq!(time, Utc.with_ymd_and_hms(2030, 1, 2, 18, 30, 0).unwrap());
    }
    #[test]
    fn skipped_local_times_are_refused() {
        // Clocks jump from 02:00 to 03:00 in New York that night.
        assert!(matches!(
            parse_time("2030-03-10 02:30", now(), Tz::America__New_York),
            Err(NegotiationError::InvalidArgument(_))
        ));
    }
    #[test]
    fn refuses_past_and_garbage() {
        assert!(matches!(
            parse_time("2029-12-31 23:59", now(), Tz::UTC),
            Err(NegotiationError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_time("tomorrow-ish", now(), Tz::UTC),
            Err(NegotiationError::InvalidArgument(_))
        ));
    }
    #[test]
    fn zones_parse_by_name() {
        assert_eq!(parse_zone(" Europe/Berlin "), Ok(Tz::Europe__Berlin));
        assert!(parse_zone("Mars/Olympus").is_err());
    }
}
