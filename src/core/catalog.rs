//! Hazard catalog - reference hazards for machinery risk assessment
//!
//! Fifteen fixed categories, each with an ordered list of typical hazards and
//! their usual causes. Also hosts the keyword rules used to infer a category
//! from free hazard text when none was recorded.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hazard category for machinery risk assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HazardCategory {
    Mechanical,
    ElectricalElectronic,
    SlipsTripsFalls,
    Ergonomics,
    FireExplosions,
    HeatTemperature,
    NoiseVibration,
    IngressEgress,
    MaterialHandling,
    EnvironmentalHygiene,
    VentilationConfinedSpace,
    Chemical,
    FluidPressure,
    Wastes,
    #[default]
    Other,
}

impl HazardCategory {
    /// All categories in catalog order
    pub const ALL: [HazardCategory; 15] = [
        HazardCategory::Mechanical,
        HazardCategory::ElectricalElectronic,
        HazardCategory::SlipsTripsFalls,
        HazardCategory::Ergonomics,
        HazardCategory::FireExplosions,
        HazardCategory::HeatTemperature,
        HazardCategory::NoiseVibration,
        HazardCategory::IngressEgress,
        HazardCategory::MaterialHandling,
        HazardCategory::EnvironmentalHygiene,
        HazardCategory::VentilationConfinedSpace,
        HazardCategory::Chemical,
        HazardCategory::FluidPressure,
        HazardCategory::Wastes,
        HazardCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HazardCategory::Mechanical => "Mechanical",
            HazardCategory::ElectricalElectronic => "Electrical/Electronic",
            HazardCategory::SlipsTripsFalls => "Slips/Trips/Falls",
            HazardCategory::Ergonomics => "Ergonomics/Human Factors",
            HazardCategory::FireExplosions => "Fire and Explosions",
            HazardCategory::HeatTemperature => "Heat/Temperature",
            HazardCategory::NoiseVibration => "Noise/Vibration",
            HazardCategory::IngressEgress => "Ingress/Egress",
            HazardCategory::MaterialHandling => "Material Handling",
            HazardCategory::EnvironmentalHygiene => "Environmental/Industrial Hygiene",
            HazardCategory::VentilationConfinedSpace => "Ventilation/Confined Space",
            HazardCategory::Chemical => "Chemical",
            HazardCategory::FluidPressure => "Fluid/Pressure",
            HazardCategory::Wastes => "Wastes (Lean)",
            HazardCategory::Other => "Other",
        }
    }

    /// Lenient parse for stored rows; unknown labels become Other
    pub fn from_label_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for HazardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Some(category) = HazardCategory::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
        {
            return Ok(*category);
        }
        // Short forms for the command line
        match wanted.to_lowercase().as_str() {
            "mechanical" | "mech" => Ok(HazardCategory::Mechanical),
            "electrical" | "electronic" | "elec" => Ok(HazardCategory::ElectricalElectronic),
            "slips" | "falls" | "stf" => Ok(HazardCategory::SlipsTripsFalls),
            "ergonomics" | "ergo" => Ok(HazardCategory::Ergonomics),
            "fire" | "explosion" => Ok(HazardCategory::FireExplosions),
            "heat" | "temperature" | "thermal" => Ok(HazardCategory::HeatTemperature),
            "noise" | "vibration" => Ok(HazardCategory::NoiseVibration),
            "ingress" | "egress" | "access" => Ok(HazardCategory::IngressEgress),
            "handling" | "material" => Ok(HazardCategory::MaterialHandling),
            "environmental" | "hygiene" | "env" => Ok(HazardCategory::EnvironmentalHygiene),
            "ventilation" | "confined" => Ok(HazardCategory::VentilationConfinedSpace),
            "chemical" | "chem" => Ok(HazardCategory::Chemical),
            "fluid" | "pressure" => Ok(HazardCategory::FluidPressure),
            "wastes" | "waste" | "lean" => Ok(HazardCategory::Wastes),
            "other" => Ok(HazardCategory::Other),
            _ => Err(format!("Unknown hazard category: {}", s)),
        }
    }
}

/// A category selection, including the synthetic "All Categories" view.
///
/// Kept apart from [`HazardCategory`] so the view can never be stored on a
/// hazard or risk entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryView {
    All,
    Category(HazardCategory),
}

impl CategoryView {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryView::All => "All Categories",
            CategoryView::Category(c) => c.label(),
        }
    }
}

impl From<HazardCategory> for CategoryView {
    fn from(category: HazardCategory) -> Self {
        CategoryView::Category(category)
    }
}

impl FromStr for CategoryView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all categories" => Ok(CategoryView::All),
            _ => s.parse().map(CategoryView::Category),
        }
    }
}

/// A typical hazard offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HazardTemplate {
    pub name: &'static str,
    pub typical_cause: &'static str,
}

const fn t(name: &'static str, typical_cause: &'static str) -> HazardTemplate {
    HazardTemplate {
        name,
        typical_cause,
    }
}

const MECHANICAL: &[HazardTemplate] = &[
    t("Crushing", "Moving parts, heavy equipment, presses"),
    t("Cutting/Severing", "Sharp edges, blades, shears, saws"),
    t("Drawing-in/Trapping/Entanglement", "Rotating parts, conveyors, gears"),
    t("Pinch Point", "Between moving and stationary parts"),
    t("Unexpected Start", "Equipment startup, stored energy release"),
    t("Break Up During Operation", "Flying debris, component failure"),
    t("Machine Instability", "Overturning, tipping, falling equipment"),
    t("Impact", "Dropped parts, falling objects, collisions"),
    t("Abrasion", "Grinding, sanding, surface contact"),
    t("Puncture", "Sharp objects, pointed tools, fasteners"),
];

const ELECTRICAL: &[HazardTemplate] = &[
    t("Electric Shock", "Exposed wiring, faulty equipment, wet conditions"),
    t("Arc Flash", "Electrical faults, short circuits, switching operations"),
    t("Electromagnetic Interference", "Radio frequency, magnetic fields"),
    t("Static Electricity", "Friction, dry conditions, synthetic materials"),
    t("Electrical Fire", "Overheating, short circuits, overload"),
    t("Battery Explosion", "Lithium batteries, overcharging, damage"),
    t("Control System Failure", "Software bugs, hardware failure, power loss"),
    t("Electrocution", "High voltage contact, ground faults"),
    t("Electrical Burns", "Arc flash, contact burns, thermal effects"),
];

const SLIPS_TRIPS_FALLS: &[HazardTemplate] = &[
    t("Slips", "Wet floors, oil, grease, loose materials"),
    t("Trips", "Uneven surfaces, cables, tools, debris"),
    t("Falls from Height", "Ladders, platforms, elevated work areas"),
    t("Falls on Same Level", "Slippery surfaces, obstacles, poor lighting"),
    t("Falls Through Openings", "Floor openings, unguarded edges"),
    t("Stairway Falls", "Wet steps, poor lighting, missing handrails"),
    t("Ladder Falls", "Unstable footing, overreaching, improper use"),
];

const ERGONOMICS: &[HazardTemplate] = &[
    t("Repetitive Motion", "Assembly work, typing, tool operation"),
    t("Awkward Postures", "Bending, reaching, twisting, kneeling"),
    t("Heavy Lifting", "Manual material handling, equipment moving"),
    t("Forceful Exertions", "Pushing, pulling, gripping, pressing"),
    t("Vibration", "Hand tools, equipment operation, vehicle operation"),
    t("Eye Strain", "Poor lighting, screen work, detailed tasks"),
    t("Mental Fatigue", "Long shifts, complex tasks, decision making"),
    t("Stress", "High workload, time pressure, responsibility"),
];

const FIRE_EXPLOSIONS: &[HazardTemplate] = &[
    t("Fire", "Hot work, electrical faults, flammable materials"),
    t("Explosion", "Dust, gases, pressure vessels, chemical reactions"),
    t("Flash Fire", "Flammable vapors, ignition sources"),
    t("Thermal Burns", "Hot surfaces, steam, molten metal"),
    t("Smoke Inhalation", "Fire, welding fumes, chemical vapors"),
    t("Structural Collapse", "Fire damage, explosion damage"),
];

const HEAT_TEMPERATURE: &[HazardTemplate] = &[
    t("Heat Stress", "Hot environments, heavy work, protective clothing"),
    t("Thermal Burns", "Hot surfaces, steam, molten metal, welding"),
    t("Cold Stress", "Cold environments, refrigeration, outdoor work"),
    t("Frostbite", "Extreme cold, wet conditions, poor protection"),
    t("Heat Exhaustion", "High temperatures, physical exertion"),
    t("Heat Stroke", "Severe heat stress, dehydration"),
];

const NOISE_VIBRATION: &[HazardTemplate] = &[
    t("Hearing Loss", "Loud equipment, impact noise, continuous exposure"),
    t("Hand-Arm Vibration", "Power tools, equipment operation"),
    t("Whole Body Vibration", "Vehicle operation, machinery operation"),
    t("Tinnitus", "Loud noise exposure, acoustic trauma"),
    t("Communication Interference", "Background noise, hearing protection"),
];

const INGRESS_EGRESS: &[HazardTemplate] = &[
    t("Entrapment", "Confined spaces, equipment access, emergency exits"),
    t("Access Difficulties", "Poor lighting, narrow passages, obstacles"),
    t("Emergency Egress", "Blocked exits, poor signage, panic"),
    t("Vehicle Access", "Loading docks, traffic, blind spots"),
    t("Equipment Access", "Maintenance access, operator stations"),
];

const MATERIAL_HANDLING: &[HazardTemplate] = &[
    t("Manual Handling", "Lifting, carrying, pushing, pulling"),
    t("Mechanical Handling", "Cranes, forklifts, conveyors, hoists"),
    t("Storage Hazards", "Stacking, racking, falling materials"),
    t("Transportation", "Vehicle movement, loading, unloading"),
    t("Packaging", "Sharp edges, heavy packages, unstable loads"),
];

const ENVIRONMENTAL_HYGIENE: &[HazardTemplate] = &[
    t("Dust Exposure", "Grinding, sanding, material handling"),
    t("Fume Exposure", "Welding, painting, chemical processes"),
    t("Vapor Exposure", "Solvents, cleaning agents, process chemicals"),
    t("Mist Exposure", "Coolants, lubricants, process fluids"),
    t("Gas Exposure", "Compressed gases, process gases, exhaust"),
    t("Biological Hazards", "Mold, bacteria, organic materials"),
];

const VENTILATION_CONFINED: &[HazardTemplate] = &[
    t("Oxygen Deficiency", "Confined spaces, gas displacement"),
    t("Toxic Atmosphere", "Chemical vapors, process gases, decomposition"),
    t("Flammable Atmosphere", "Gas accumulation, vapor buildup"),
    t("Engulfment", "Loose materials, flowing substances"),
    t("Entrapment", "Narrow passages, equipment, structural elements"),
];

const CHEMICAL: &[HazardTemplate] = &[
    t("Chemical Burns", "Acids, bases, corrosive materials"),
    t("Chemical Inhalation", "Vapors, gases, dusts, mists"),
    t("Chemical Ingestion", "Contamination, poor hygiene"),
    t("Chemical Injection", "High pressure, sharp objects"),
    t("Allergic Reactions", "Sensitizers, allergens, irritants"),
    t("Carcinogenic Exposure", "Known carcinogens, long-term exposure"),
];

const FLUID_PRESSURE: &[HazardTemplate] = &[
    t("High Pressure", "Hydraulic systems, pneumatic systems, pressure vessels"),
    t("Fluid Injection", "High pressure fluids, hydraulic systems"),
    t("Pressure Vessel Failure", "Overpressure, corrosion, fatigue"),
    t("Fluid Leaks", "Hydraulic oil, coolant, process fluids"),
    t("Vacuum Hazards", "Vacuum systems, implosion, collapse"),
];

const WASTES: &[HazardTemplate] = &[
    t("Waste Accumulation", "Excess inventory, scrap, unused materials"),
    t("Storage Issues", "Poor organization, space constraints"),
    t("Disposal Hazards", "Waste handling, disposal processes"),
    t("Recycling Hazards", "Sorting, processing, material handling"),
];

const OTHER: &[HazardTemplate] = &[
    t("Weather Conditions", "Rain, snow, wind, extreme temperatures"),
    t("Lighting Issues", "Poor lighting, glare, shadows"),
    t("Housekeeping", "Poor organization, clutter, debris"),
    t("Maintenance", "Equipment failure, repair activities"),
    t("Training", "Inadequate training, skill gaps, inexperience"),
];

/// Templates owned by a single category
pub fn templates(category: HazardCategory) -> &'static [HazardTemplate] {
    match category {
        HazardCategory::Mechanical => MECHANICAL,
        HazardCategory::ElectricalElectronic => ELECTRICAL,
        HazardCategory::SlipsTripsFalls => SLIPS_TRIPS_FALLS,
        HazardCategory::Ergonomics => ERGONOMICS,
        HazardCategory::FireExplosions => FIRE_EXPLOSIONS,
        HazardCategory::HeatTemperature => HEAT_TEMPERATURE,
        HazardCategory::NoiseVibration => NOISE_VIBRATION,
        HazardCategory::IngressEgress => INGRESS_EGRESS,
        HazardCategory::MaterialHandling => MATERIAL_HANDLING,
        HazardCategory::EnvironmentalHygiene => ENVIRONMENTAL_HYGIENE,
        HazardCategory::VentilationConfinedSpace => VENTILATION_CONFINED,
        HazardCategory::Chemical => CHEMICAL,
        HazardCategory::FluidPressure => FLUID_PRESSURE,
        HazardCategory::Wastes => WASTES,
        HazardCategory::Other => OTHER,
    }
}

/// Hazards offered for a category view.
///
/// "All Categories" concatenates every category in catalog order; names that
/// appear in several categories are repeated.
pub fn hazards_for(view: CategoryView) -> Vec<HazardTemplate> {
    match view {
        CategoryView::Category(category) => templates(category).to_vec(),
        CategoryView::All => HazardCategory::ALL
            .iter()
            .flat_map(|c| templates(*c).iter().copied())
            .collect(),
    }
}

/// Find a template in a view by hazard name (case-insensitive)
pub fn find_template(view: CategoryView, name: &str) -> Option<HazardTemplate> {
    let wanted = name.trim();
    hazards_for(view)
        .into_iter()
        .find(|h| h.name.eq_ignore_ascii_case(wanted))
}

/// Keyword rules, evaluated in order; first match wins.
///
/// Keyword sets overlap ("control" is electrical, "vibration" is ergonomics
/// before noise), so this order must not change or saved assessments would be
/// reclassified.
const CATEGORY_RULES: &[(&[&str], HazardCategory)] = &[
    (
        &["crushing", "cutting", "drawing", "pinch", "impact", "abrasion", "puncture"],
        HazardCategory::Mechanical,
    ),
    (
        &["electric", "arc", "static", "battery", "control"],
        HazardCategory::ElectricalElectronic,
    ),
    (&["slip", "trip", "fall"], HazardCategory::SlipsTripsFalls),
    (
        &["repetitive", "awkward", "lifting", "vibration", "strain"],
        HazardCategory::Ergonomics,
    ),
    (
        &["fire", "explosion", "thermal", "smoke"],
        HazardCategory::FireExplosions,
    ),
    (
        &["heat", "cold", "temperature", "frostbite"],
        HazardCategory::HeatTemperature,
    ),
    (&["noise", "hearing", "tinnitus"], HazardCategory::NoiseVibration),
    (
        &["ingress", "egress", "entrapment", "access"],
        HazardCategory::IngressEgress,
    ),
    (
        &["handling", "storage", "transport", "packaging"],
        HazardCategory::MaterialHandling,
    ),
    (
        &["dust", "fume", "vapor", "gas", "biological"],
        HazardCategory::EnvironmentalHygiene,
    ),
    (
        &["ventilation", "confined", "oxygen", "toxic", "flammable"],
        HazardCategory::VentilationConfinedSpace,
    ),
    (
        &["chemical", "acid", "base", "corrosive", "allergic"],
        HazardCategory::Chemical,
    ),
    (
        &["pressure", "fluid", "hydraulic", "pneumatic", "vacuum"],
        HazardCategory::FluidPressure,
    ),
    (&["waste", "disposal", "recycling"], HazardCategory::Wastes),
];

/// Guess the category of a hazard from its name
pub fn infer_category(hazard_name: &str) -> HazardCategory {
    let lower = hazard_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(HazardCategory::Other)
}
