//! Travel modes, highway gates, and speed defaults.

/// How a query moves through the network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TravelMode {
    Walk,
    Bike,
    Drive,
}

/// What an edge costs in a query.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CostMetric {
    /// Travel time in seconds.
    Time,
    /// Distance in metres.
    Distance,
}

impl TravelMode {
    /// Highway classes routable in this mode.  A way whose `highway` value
    /// is not listed contributes no edges.
    pub fn allowed_highways(self) -> &'static [&'static str] {
        match self {
            TravelMode::Walk => &[
                "primary", "secondary", "tertiary", "residential", "living_street",
                "unclassified", "service", "pedestrian", "footway", "path", "steps", "track",
            ],
            TravelMode::Bike => &[
                "primary", "secondary", "tertiary", "residential", "living_street",
                "unclassified", "service", "cycleway", "path", "track",
            ],
            TravelMode::Drive => &[
                "motorway", "motorway_link", "trunk", "trunk_link",
                "primary", "primary_link", "secondary", "secondary_link",
                "tertiary", "tertiary_link", "residential", "living_street",
                "unclassified", "service", "road",
            ],
        }
    }

    #[inline]
    pub fn allows(self, highway: &str) -> bool {
        self.allowed_highways().contains(&highway)
    }

    /// Assumed speed in km/h for a highway class when `maxspeed` is absent
    /// or unparseable.
    pub fn default_speed_kph(self, highway: &str) -> f64 {
        match self {
            TravelMode::Walk => match highway {
                "steps" => 3.0,
                "path" => 4.0,
                _ => 5.0,
            },
            TravelMode::Bike => match highway {
                "cycleway" => 18.0,
                "path" => 12.0,
                "tertiary" => 18.0,
                "secondary" => 20.0,
                _ => 15.0,
            },
            TravelMode::Drive => match highway {
                "motorway" => 110.0,
                "motorway_link" => 80.0,
                "trunk" => 90.0,
                "trunk_link" => 50.0,
                "primary" => 60.0,
                "primary_link" => 40.0,
                "secondary" => 50.0,
                "secondary_link" => 35.0,
                "tertiary" => 40.0,
                "tertiary_link" => 30.0,
                "residential" => 30.0,
                "living_street" => 20.0,
                "unclassified" => 30.0,
                "service" => 20.0,
                _ => 30.0,
            },
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TravelMode::Walk => "walk",
            TravelMode::Bike => "bike",
            TravelMode::Drive => "drive",
        })
    }
}

/// Parse an OSM `maxspeed` value to km/h.
///
/// The numeric prefix is taken; an `mph` suffix applies the 1.60934 factor;
/// the tokens `none`, `signals`, `variable`, and `walk` yield `None` so the
/// per-class default applies.
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() || matches!(value.as_str(), "none" | "signals" | "variable" | "walk") {
        return None;
    }

    // Numeric prefix: digits with at most one decimal point, e.g. "50",
    // "30.5 mph", "60;80" all yield their leading number.
    let bytes = value.as_bytes();
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    let numeric: f64 = value[..end].parse().ok()?;

    if value.contains("mph") {
        Some(numeric * 1.609_34)
    } else {
        Some(numeric)
    }
}
