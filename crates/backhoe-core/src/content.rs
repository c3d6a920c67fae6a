//! Static site content.
//!
//! Page copy, the equipment categories, the serviced locations shown on the
//! map, the state name/abbreviation table, and the fill colors. Everything
//! here is immutable for the lifetime of the process.

/// A serviced city shown as a marker on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Stable identifier, used in markup (`data-location`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Two-letter state abbreviation.
    pub state: &'static str,
    /// Geographic position as `[longitude, latitude]` in degrees.
    pub coordinates: [f64; 2],
    /// Illustrative fleet size at this location.
    pub equipment_count: u32,
}

/// An equipment category tile on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Stable identifier, sent as `categoryId`.
    pub id: &'static str,
    /// Display name, sent as `categoryName`.
    pub name: &'static str,
    /// Image path under the public directory.
    pub image: &'static str,
}

/// Locations drawn on the map, in connection order.
pub const LOCATIONS: &[Location] = &[
    Location {
        id: "los-angeles",
        name: "Los Angeles",
        state: "CA",
        coordinates: [-118.243_683, 34.052_235],
        equipment_count: 254,
    },
    Location {
        id: "new-york-city",
        name: "New York City",
        state: "NY",
        coordinates: [-74.005_974, 40.712_776],
        equipment_count: 341,
    },
    Location {
        id: "chicago",
        name: "Chicago",
        state: "IL",
        coordinates: [-87.629_799, 41.878_113],
        equipment_count: 198,
    },
    Location {
        id: "houston",
        name: "Houston",
        state: "TX",
        coordinates: [-95.369_804, 29.760_427],
        equipment_count: 267,
    },
    Location {
        id: "miami",
        name: "Miami",
        state: "FL",
        coordinates: [-80.191_79, 25.761_681],
        equipment_count: 185,
    },
    Location {
        id: "denver",
        name: "Denver",
        state: "CO",
        coordinates: [-104.990_251, 39.739_236],
        equipment_count: 126,
    },
];

/// Equipment categories, in grid order.
pub const CATEGORIES: &[Category] = &[
    Category {
        id: "scissor-lift",
        name: "Scissor Lift",
        image: "/images/product1.jpg",
    },
    Category {
        id: "rough-terrain-scissor-lift",
        name: "Rough Terrain Scissor Lift",
        image: "/images/RoughTerrainScissorLift.png",
    },
    Category {
        id: "man-lift",
        name: "Man Lift",
        image: "/images/ManLift.webp",
    },
    Category {
        id: "forklift",
        name: "Forklift",
        image: "/images/forklift.jpg",
    },
    Category {
        id: "excavator",
        name: "Excavator",
        image: "/images/excavator.webp",
    },
    Category {
        id: "earthmoving-equipment",
        name: "Earthmoving Equipment",
        image: "/images/earthmoving.webp",
    },
    Category {
        id: "compaction-equipment",
        name: "Compaction Equipment",
        image: "/images/compaction.png",
    },
    Category {
        id: "boom-lift",
        name: "Boom Lift",
        image: "/images/BoomLift.webp",
    },
];

/// Look up a category by id.
pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Full state name to abbreviation, 50 states plus DC.
pub const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("District of Columbia", "DC"),
];

/// Abbreviation for a full state name.
pub fn abbreviation_for(name: &str) -> Option<&'static str> {
    STATES.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
}

/// Full state name for an abbreviation.
pub fn state_name_for(abbreviation: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, a)| *a == abbreviation)
        .map(|(n, _)| *n)
}

/// Fill for states with a serviced location.
pub const SERVICED_FILL: &str = "#FFDD94";

/// Fill for every other state.
pub const DEFAULT_FILL: &str = "#ffffff";

/// Abbreviation to fill color. A static subset of [`STATES`].
pub const STATE_COLORS: &[(&str, &str)] = &[
    ("CA", SERVICED_FILL),
    ("NY", SERVICED_FILL),
    ("IL", SERVICED_FILL),
    ("TX", SERVICED_FILL),
    ("FL", SERVICED_FILL),
    ("CO", SERVICED_FILL),
];

/// Fill color for a state as named in the topology.
///
/// The name is mapped to its abbreviation (falling back to the name itself),
/// then looked up in [`STATE_COLORS`]; anything unmapped gets [`DEFAULT_FILL`].
pub fn fill_for_state(name: &str) -> &'static str {
    let key = abbreviation_for(name).unwrap_or(name);
    STATE_COLORS
        .iter()
        .find(|(abbr, _)| *abbr == key)
        .map_or(DEFAULT_FILL, |(_, color)| *color)
}

// ── Company and page copy ────────────────────────────────────────────

pub const SITE_TITLE: &str = "BACKHOE - Construction Equipment Rentals";
pub const SITE_DESCRIPTION: &str = "Rent or buy high-quality construction equipment for your projects. Excavators, loaders, lifts and more.";

pub const COMPANY_NAME: &str = "N & N Networks";
pub const COMPANY_TAGLINE: &str = "CONSTRUCTION SERVICES";
pub const COMPANY_BLURB: &str =
    "Your trusted partner for quality equipment rentals. Serving contractors and DIY enthusiasts.";
pub const COMPANY_PHONE: &str = "(888) 350-7661";
pub const COMPANY_PHONE_INTL: &str = "+1 (888) 350-7661";
pub const COMPANY_EMAIL: &str = "info@nn-networks.com";
pub const COMPANY_ADDRESS: &[&str] = &["1833 Cheddar loop #714 Austin Texas", "#714 Austin Texas"];
pub const BUSINESS_HOURS: &[&str] = &["Monday-Saturday: 5AM EST - 5PM PDT", "Sunday: Closed"];

pub const TOP_BAR_PITCH: &str = "Join our team. Are you ready to change the game?";
pub const TOP_BAR_CALL_TO_ACTION: &str = "Contact us for opportunities";

pub const HERO_TITLE: &str = "We Don't Match The Price We Simply Beat It!!";
pub const HERO_SUBTITLE: &str = "Your one stop shop for all equipment rental needs.";

/// Rental desk reached from the phone branch of the lead modal.
pub const RENTAL_DESK_PHONE: &str = "1-800-123-4567";
pub const RENTAL_DESK_TEL: &str = "+18001234567";
pub const RENTAL_DESK_HOURS: &str = "Our team is available Monday-Friday, 8am-6pm EST.";

/// A numbered step in the "How does it work" section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub number: u8,
    pub title: &'static str,
    pub body: &'static str,
    pub image: &'static str,
}

pub const HOW_IT_WORKS: &[Step] = &[
    Step {
        number: 1,
        title: "Contact Us",
        body: "Reach out to our team through phone or email to inquire about the equipment you need to rent. Tell us what you're looking for, when you need it, and for how long. We make the initial rental process simple and straightforward.",
        image: "/images/step1.png",
    },
    Step {
        number: 2,
        title: "Let Us Handle The Rest",
        body: "After your inquiry, our dedicated team will promptly contact you to confirm details, discuss availability, and process your order. We'll handle all logistics from delivery to pickup, ensuring you get exactly what you need without any hassle.",
        image: "/images/step2.png",
    },
];

pub const MAP_HEADING: &str = "Popular locations serviced through our network.";

pub const SERVICE_AREAS_HEADING: [&str; 2] = [
    "BigRentz Equipment Rental Service Areas",
    "in the United States",
];

/// A header dropdown: title and `(label, href)` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavMenu {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

pub const NAV_MENUS: &[NavMenu] = &[
    NavMenu {
        title: "Equipment Rentals",
        items: &[
            ("Backhoes", "/products/backhoes"),
            ("Excavators", "/products/excavators"),
            ("Loaders", "/products/loaders"),
            ("Bulldozers", "/products/bulldozers"),
            ("Trenchers", "/products/trenchers"),
        ],
    },
    NavMenu {
        title: "Solutions",
        items: &[
            ("Residential Projects", "/solutions/residential"),
            ("Commercial Construction", "/solutions/commercial"),
            ("Industrial Solutions", "/solutions/industrial"),
            ("Landscaping", "/solutions/landscaping"),
        ],
    },
    NavMenu {
        title: "Company",
        items: &[
            ("Category", "/browse/category"),
            ("Brand", "/browse/brand"),
            ("Price", "/browse/price"),
            ("Popularity", "/browse/popular"),
        ],
    },
];
