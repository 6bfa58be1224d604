//! Recognised semantic category values.
//!
//! These lists gate feature extraction: an `amenity=` value outside
//! `AMENITY_TYPES` is not an amenity feature, and so on.  They are plain
//! slices so applications can ship their own sets and call the extractors
//! directly.

/// Amenity values recognised as point features, grouped loosely by theme.
pub static AMENITY_TYPES: &[&str] = &[
    // Food and drink
    "restaurant", "fast_food", "cafe", "pub", "bar", "food_court", "ice_cream",
    "biergarten", "juice_bar",
    // Shopping
    "marketplace", "supermarket", "convenience", "department_store", "mall",
    "vending_machine", "kiosk",
    // Services and health
    "bank", "atm", "post_office", "pharmacy", "hospital", "clinic", "dentist",
    "doctors", "veterinary", "social_facility", "childcare", "nursing_home",
    "bureau_de_change",
    // Education
    "school", "university", "college", "library", "kindergarten",
    "language_school", "music_school", "driving_school",
    // Transport
    "fuel", "charging_station", "car_wash", "car_rental", "taxi", "bus_station",
    "parking", "parking_space", "parking_entrance", "bicycle_parking",
    "bicycle_rental", "bicycle_repair_station", "ferry_terminal", "car_sharing",
    // Entertainment and culture
    "cinema", "theatre", "nightclub", "casino", "arts_centre",
    "community_centre", "events_venue", "conference_centre", "planetarium",
    // Public facilities
    "toilets", "drinking_water", "shower", "bench", "waste_basket",
    "waste_disposal", "recycling", "fountain", "post_box", "telephone",
    "shelter", "clock",
    // Emergency and civic
    "police", "fire_station", "ambulance_station", "rescue_station",
    "townhall", "courthouse", "embassy", "prison",
    // Religious
    "place_of_worship", "monastery", "grave_yard", "crematorium",
];

/// Highway values recognised as line features: roads, paths, and special
/// purpose ways alike.
pub static HIGHWAY_TYPES: &[&str] = &[
    "motorway", "trunk", "primary", "secondary", "tertiary",
    "motorway_link", "trunk_link", "primary_link", "secondary_link", "tertiary_link",
    "residential", "unclassified", "service", "living_street", "road",
    "pedestrian", "footway", "steps", "path", "cycleway",
    "bus_guideway", "busway", "raceway", "track",
];

/// Building values recognised as polygon features.
pub static BUILDING_TYPES: &[&str] = &[
    "yes", "house", "residential", "apartments", "detached", "terrace",
    "semidetached_house", "commercial", "industrial", "retail", "office",
    "warehouse", "garage", "garages", "shed", "hut", "school", "university",
    "hospital", "church", "chapel", "mosque", "synagogue", "temple", "civic",
    "public", "hotel", "train_station", "stadium", "barn", "farm",
];

/// Source tags copied into feature properties.  Everything else is dropped
/// to keep feature payloads small.
pub static IMPORTANT_TAGS: &[&str] = &[
    "name", "amenity", "highway", "building", "shop", "tourism", "leisure",
    "cuisine", "opening_hours", "phone", "website", "operator", "brand",
    "addr:street", "addr:housenumber", "addr:city", "addr:postcode",
    "surface", "maxspeed", "oneway", "lanes", "access", "ref", "religion",
    "capacity", "fee",
];

/// Membership test over a category slice.
#[inline]
pub fn category_contains(set: &[&str], value: &str) -> bool {
    set.contains(&value)
}
