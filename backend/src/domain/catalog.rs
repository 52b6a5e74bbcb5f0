//! Static service catalog and its category enumeration.
//!
//! The catalog is the source of truth for what can be booked. It ships with
//! the application and never comes from the data store; bookings reference
//! entries by [`ServiceId`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of service categories offered on the platform.
///
/// Every [`Service`] belongs to exactly one category. The wire form (store
/// rows, advisor payloads) is the display label, so parsing goes through
/// [`Category::from_label`] and is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    AcApplianceRepair,
    Cleaning,
    Plumbing,
    Electrician,
    Painting,
    MensGrooming,
    WomensBeauty,
    PestControl,
    Carpentry,
    CarRental,
    LabourSupply,
    Mistri,
    HouseHelper,
    Welding,
    RoofPanelling,
}

impl Category {
    /// Every category, in the order the storefront lists them.
    pub const ALL: [Self; 15] = [
        Self::AcApplianceRepair,
        Self::Cleaning,
        Self::Plumbing,
        Self::Electrician,
        Self::Painting,
        Self::MensGrooming,
        Self::WomensBeauty,
        Self::PestControl,
        Self::Carpentry,
        Self::CarRental,
        Self::LabourSupply,
        Self::Mistri,
        Self::HouseHelper,
        Self::Welding,
        Self::RoofPanelling,
    ];

    /// Stable display label, also used as the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::AcApplianceRepair => "AC & Appliance Repair",
            Self::Cleaning => "Cleaning",
            Self::Plumbing => "Plumbing",
            Self::Electrician => "Electrician",
            Self::Painting => "Painting",
            Self::MensGrooming => "Men's Grooming",
            Self::WomensBeauty => "Women's Beauty",
            Self::PestControl => "Pest Control",
            Self::Carpentry => "Carpentry",
            Self::CarRental => "Car Rental",
            Self::LabourSupply => "Labour Supply",
            Self::Mistri => "Mistri",
            Self::HouseHelper => "House Helper",
            Self::Welding => "Welding",
            Self::RoofPanelling => "Roof Panelling",
        }
    }

    /// Parse a label case-insensitively against the closed enumeration.
    ///
    /// Returns `None` for anything outside the set. Callers decide whether
    /// that is an error (store rows) or a fallback trigger (advisor output).
    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown service category: {raw}")))
    }
}

/// Opaque catalog entry identifier, e.g. `"plumb-03"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    id: ServiceId,
    name: String,
    description: String,
    category: Category,
    price_rupees: u32,
}

impl Service {
    /// Build a catalog entry from its parts.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        price_rupees: u32,
    ) -> Self {
        Self {
            id: ServiceId::new(id),
            name: name.into(),
            description: description.into(),
            category,
            price_rupees,
        }
    }

    pub fn id(&self) -> &ServiceId {
        &self.id
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
    pub fn category(&self) -> Category {
        self.category
    }
    pub fn price_rupees(&self) -> u32 {
        self.price_rupees
    }
}

/// The ordered, immutable list of offered services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    services: Vec<Service>,
}

impl Catalog {
    /// Wrap an explicit service list (used by tests and embedders with their
    /// own catalog data).
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self::new(builtin_services())
    }

    /// All entries in catalog order.
    pub fn services(&self) -> &[Service] {
        self.services.as_slice()
    }

    /// Entries belonging to one category, in catalog order.
    pub fn in_category(&self, category: Category) -> Vec<Service> {
        self.services
            .iter()
            .filter(|service| service.category() == category)
            .cloned()
            .collect()
    }

    /// Entries whose id appears in `ids`, in catalog order.
    ///
    /// The order of `ids` is deliberately ignored and unknown ids are
    /// dropped; ranking always follows the catalog itself.
    pub fn by_ids(&self, ids: &[ServiceId]) -> Vec<Service> {
        self.services
            .iter()
            .filter(|service| ids.contains(service.id()))
            .cloned()
            .collect()
    }
}

fn builtin_services() -> Vec<Service> {
    use Category::*;

    vec![
        Service::new(
            "ac-01",
            "AC Service & Gas Refill",
            "Split and window AC servicing with coolant top-up and filter wash.",
            AcApplianceRepair,
            799,
        ),
        Service::new(
            "ac-02",
            "Refrigerator Repair",
            "Doorstep diagnosis and repair for single and double door fridges.",
            AcApplianceRepair,
            499,
        ),
        Service::new(
            "clean-01",
            "Full Home Deep Cleaning",
            "Kitchen, bathrooms, floors and balconies scrubbed by a two-person crew.",
            Cleaning,
            3499,
        ),
        Service::new(
            "clean-02",
            "Sofa & Carpet Shampooing",
            "Machine shampooing for upholstery, mattresses and carpets.",
            Cleaning,
            999,
        ),
        Service::new(
            "plumb-01",
            "Bathroom Fitting Installation",
            "Installation of showers, commodes, geysers and wash basins.",
            Plumbing,
            599,
        ),
        Service::new(
            "plumb-02",
            "Drain & Blockage Clearing",
            "Clearing choked sinks, floor traps and sewage lines with machine rods.",
            Plumbing,
            449,
        ),
        Service::new(
            "plumb-03",
            "Tap & Pipe Leak Repair",
            "Fixing leaking taps, mixers, joints and concealed pipe seepage.",
            Plumbing,
            349,
        ),
        Service::new(
            "elec-01",
            "Wiring & Switchboard Repair",
            "Fault finding, rewiring and switchboard or MCB replacement.",
            Electrician,
            399,
        ),
        Service::new(
            "elec-02",
            "Fan & Light Installation",
            "Ceiling fan, chandelier and tube light fitting with balancing.",
            Electrician,
            249,
        ),
        Service::new(
            "paint-01",
            "Full Home Painting",
            "Two-coat emulsion painting with putty touch-up and masking.",
            Painting,
            12999,
        ),
        Service::new(
            "paint-02",
            "Wall Touch-Up & Texture",
            "Single wall repaint, texture finishes and damp patch treatment.",
            Painting,
            1999,
        ),
        Service::new(
            "groom-01",
            "Men's Haircut & Shave at Home",
            "Haircut, beard styling and hot towel shave at your doorstep.",
            MensGrooming,
            299,
        ),
        Service::new(
            "groom-02",
            "Men's Facial & Cleanup",
            "Deep cleanse facial and de-tan cleanup for men.",
            MensGrooming,
            549,
        ),
        Service::new(
            "beauty-01",
            "Salon at Home for Women",
            "Waxing, facial, manicure and pedicure by trained beauticians.",
            WomensBeauty,
            1199,
        ),
        Service::new(
            "beauty-02",
            "Bridal Makeup Package",
            "Full bridal makeup with draping, hairstyling and trial session.",
            WomensBeauty,
            8999,
        ),
        Service::new(
            "pest-01",
            "General Pest Control",
            "Gel and spray treatment for cockroaches, ants and spiders.",
            PestControl,
            899,
        ),
        Service::new(
            "pest-02",
            "Termite Treatment",
            "Drill-and-fill termite treatment with a one-year warranty.",
            PestControl,
            2499,
        ),
        Service::new(
            "carp-01",
            "Furniture Repair & Polish",
            "Hinge, handle and joint repairs plus melamine polishing.",
            Carpentry,
            449,
        ),
        Service::new(
            "carp-02",
            "Modular Wardrobe Fitting",
            "On-site assembly and alignment of modular wardrobes and kitchens.",
            Carpentry,
            1499,
        ),
        Service::new(
            "car-01",
            "Sedan with Driver (8 hrs)",
            "Chauffeur-driven sedan for city use, fuel included up to 80 km.",
            CarRental,
            2199,
        ),
        Service::new(
            "car-02",
            "Self-Drive Hatchback (24 hrs)",
            "Compact self-drive car with unlimited city kilometres.",
            CarRental,
            1799,
        ),
        Service::new(
            "labour-01",
            "Loading & Unloading Crew",
            "Two-person crew for shifting, loading and unloading goods.",
            LabourSupply,
            699,
        ),
        Service::new(
            "labour-02",
            "Construction Helper (Daily)",
            "General site helper for material movement and mixing, per day.",
            LabourSupply,
            599,
        ),
        Service::new(
            "mistri-01",
            "Masonry & Brickwork",
            "Wall construction, plastering and small civil repairs.",
            Mistri,
            799,
        ),
        Service::new(
            "mistri-02",
            "Tile & Marble Laying",
            "Floor and wall tile laying with grouting, per room.",
            Mistri,
            1899,
        ),
        Service::new(
            "helper-01",
            "Part-Time House Helper",
            "Daily sweeping, mopping and utensil help, monthly engagement.",
            HouseHelper,
            2999,
        ),
        Service::new(
            "helper-02",
            "Cook at Home (Monthly)",
            "Home-style lunch and dinner preparation for up to four people.",
            HouseHelper,
            4499,
        ),
        Service::new(
            "weld-01",
            "Gate & Grill Welding",
            "Fabrication and repair of iron gates, grills and frames.",
            Welding,
            999,
        ),
        Service::new(
            "weld-02",
            "Steel Railing Fabrication",
            "Custom stainless steel railing for stairs and balconies, per foot.",
            Welding,
            349,
        ),
        Service::new(
            "roof-01",
            "Tin Shed Installation",
            "Colour-coated tin shed structure for terraces and parking.",
            RoofPanelling,
            7999,
        ),
        Service::new(
            "roof-02",
            "Roof Sheet Replacement",
            "Replacing damaged roofing sheets with leak-proof fastening.",
            RoofPanelling,
            2999,
        ),
    ]
}
