use rand::Rng;

use crate::models::appointment::Appointment;

// Display palette carried over from the demo feed styling. Duplicated
// entries are intentional: the pick is uniform over positions, so repeated
// colors come up proportionally more often.
pub const EVENT_PALETTE: [&str; 11] = [
    "#FF339933",
    "#FF00ABA9",
    "#FFE671B8",
    "#FF1BA1E2",
    "#FFD80073",
    "#FFA2C139",
    "#FFA2C139",
    "#FFD80073",
    "#FF339933",
    "#FFE671B8",
    "#FF00ABA9",
];

pub fn random_event_color() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..EVENT_PALETTE.len());
    EVENT_PALETTE[idx]
}

/// Tags every appointment with a palette color. Runs once, right after the
/// feed is loaded; colors are cosmetic and never affect filtering.
pub fn assign_event_colors(appointments: &mut [Appointment]) {
    for appointment in appointments.iter_mut() {
        appointment.color = Some(random_event_color().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(id: &str) -> Appointment {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        Appointment {
            id: id.to_string(),
            subject: "sample".to_string(),
            start_time: day.and_hms_opt(9, 0, 0).unwrap(),
            end_time: day.and_hms_opt(10, 0, 0).unwrap(),
            all_day: false,
            recurrence_rule: None,
            color: None,
        }
    }

    #[test]
    fn every_assigned_color_is_from_the_palette() {
        let mut appointments: Vec<Appointment> =
            (0..50).map(|i| sample(&i.to_string())).collect();
        assign_event_colors(&mut appointments);
        for appointment in &appointments {
            let color = appointment.color.as_deref().unwrap();
            assert!(EVENT_PALETTE.contains(&color), "unexpected color {}", color);
        }
    }

    #[test]
    fn random_pick_stays_in_palette() {
        for _ in 0..200 {
            assert!(EVENT_PALETTE.contains(&random_event_color()));
        }
    }
}
