// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use super::*;
use common::test_helper::route::{get_north_route, get_saved_route};

#[test]
fn saved_routes_of_empty_values() {
    assert!(saved_routes(&Values::new()).is_empty());
}

#[test]
fn saved_routes_stored_as_json_string() {
    let routes = vec![get_saved_route(), SavedRoute::new("North", get_north_route())];
    let mut values = Values::new();
    set_saved_routes(&mut values, &routes).unwrap();

    assert!(values[KEY_SAVED_ROUTES_JSON].is_string());
    assert_eq!(saved_routes(&values), routes);
}

#[test]
fn corrupt_saved_routes_load_as_empty_list() {
    let mut values = Values::new();
    values.insert(
        KEY_SAVED_ROUTES_JSON.to_string(),
        Value::from("[{\"name\": \"broken\""),
    );
    assert!(saved_routes(&values).is_empty());

    values.insert(KEY_SAVED_ROUTES_JSON.to_string(), Value::from(42));
    assert!(saved_routes(&values).is_empty());
}
