mod test_geo;
mod test_route_playback;
