mod test_location_target;
mod test_playback_state;
mod test_tick_clock;
