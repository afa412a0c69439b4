use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Appointment {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "StartTime", with = "feed_datetime")]
    pub start_time: NaiveDateTime,
    #[serde(rename = "EndTime", with = "feed_datetime")]
    pub end_time: NaiveDateTime,
    #[serde(rename = "AllDay", default)]
    pub all_day: bool,
    // Opaque recurrence string from the feed; never expanded here.
    #[serde(rename = "RecurrenceRule", default)]
    pub recurrence_rule: Option<String>,
    // Assigned once at load time, not part of the wire payload.
    #[serde(skip)]
    pub color: Option<String>,
}

// The feed emits ISO-8601-ish local timestamps, sometimes with an offset
// or fractional seconds. Offsets are stripped, not normalized: the wall
// clock value is kept as-is.
pub mod feed_datetime {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
    ];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            de::Error::custom(format!("unrecognized appointment timestamp: {}", raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn deserializes_feed_fields() {
        let payload = r#"{
            "Id": "12",
            "Subject": "Scrum meeting",
            "StartTime": "2017-06-15T09:00:00",
            "EndTime": "2017-06-15T10:30:00",
            "AllDay": false,
            "RecurrenceRule": null
        }"#;
        let appointment: Appointment = serde_json::from_str(payload).unwrap();
        assert_eq!(appointment.id, "12");
        assert_eq!(appointment.subject, "Scrum meeting");
        assert_eq!(
            appointment.start_time.date(),
            NaiveDate::from_ymd_opt(2017, 6, 15).unwrap()
        );
        assert!(!appointment.all_day);
        assert_eq!(appointment.recurrence_rule, None);
        assert_eq!(appointment.color, None);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let payload = r#"{
            "Id": "3",
            "Subject": "Review",
            "StartTime": "2017-06-15T09:00:00",
            "EndTime": "2017-06-15T10:00:00"
        }"#;
        let appointment: Appointment = serde_json::from_str(payload).unwrap();
        assert!(!appointment.all_day);
        assert_eq!(appointment.recurrence_rule, None);
    }

    #[test]
    fn offset_and_naive_timestamps_agree_on_wall_clock() {
        let with_offset = feed_datetime::parse("2024-01-10T14:30:00+05:30").unwrap();
        let naive = feed_datetime::parse("2024-01-10T14:30:00").unwrap();
        assert_eq!(with_offset, naive);
        assert_eq!(with_offset.hour(), 14);
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let parsed = feed_datetime::parse("2024-01-10T14:30:00.250").unwrap();
        assert_eq!(parsed.second(), 0);
    }

    #[test]
    fn garbage_timestamp_is_a_decode_error() {
        let payload = r#"{
            "Id": "9",
            "Subject": "Broken",
            "StartTime": "whenever",
            "EndTime": "2017-06-15T10:00:00"
        }"#;
        assert!(serde_json::from_str::<Appointment>(payload).is_err());
    }
}
