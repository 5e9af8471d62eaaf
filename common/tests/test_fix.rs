// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::DateTime;
use common::{coordinates::Coordinates, fix::Fix};

fn get_fix_as_json<'a>() -> &'a str {
    r#"
    {
        "coordinates": { "latitude": 52.025833, "longitude": 11.279166 },
        "altitude": 3.0,
        "bearing": 90.0,
        "speed": 10.0,
        "accuracy": 3.0,
        "vertical_accuracy": 0.1,
        "bearing_accuracy": 0.1,
        "speed_accuracy": 0.01,
        "timestamp": 1735689600123
    }
    "#
}

fn get_fix() -> Fix {
    Fix::new(
        Coordinates::new(52.025833, 11.279166).unwrap(),
        90.0,
        10.0,
        DateTime::from_timestamp_millis(1_735_689_600_123).unwrap(),
    )
}

#[test]
pub fn deserialize_fix_from_json() {
    let fix = Fix::from_json(get_fix_as_json())
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(fix, get_fix());
}

#[test]
pub fn serialize_timestamp_as_epoch_millis() {
    let json = get_fix().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["timestamp"], 1_735_689_600_123_i64);
}

#[test]
pub fn reject_fix_with_invalid_coordinates() {
    let json = get_fix_as_json().replace("52.025833", "152.025833");
    assert!(Fix::from_json(&json).is_err());
}

#[test]
pub fn stationary_fix_uses_small_speed() {
    let fix = Fix::stationary(
        Coordinates::new(52.0, 11.0).unwrap(),
        DateTime::from_timestamp_millis(0).unwrap(),
    );
    assert_eq!(fix.speed(), 0.01);
    assert_eq!(fix.bearing(), 0.0);
    assert_eq!(fix.accuracy(), 3.0);
    assert_eq!(fix.altitude(), 3.0);
}
