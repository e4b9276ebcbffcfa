use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// COUNTRY FUEL PROFILES
// ============================================================================

/// Static per-country reference data used to turn a benchmark crude price
/// into a local pump-price estimate. Loaded once, immutable for the process
/// lifetime, keyed by normalized lowercase country code.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFuelProfile {
    pub code: &'static str,
    pub display_name: &'static str,
    /// Fuel duty as a percentage of the pre-tax price.
    pub tax_rate_pct: f64,
    pub vat_pct: f64,
    pub currency: &'static str,
    /// Common fuel grades, most common first.
    pub fuel_names: &'static [&'static str],
    /// Multiplier on the crude price to estimate pre-tax retail.
    pub price_factor: f64,
    pub unit_label: &'static str,
    /// Liters (or gallons) per barrel.
    pub barrel_to_local_units: f64,
    pub notes: &'static str,
}

impl CountryFuelProfile {
    pub fn primary_fuel(&self) -> &'static str {
        self.fuel_names.first().copied().unwrap_or("Fuel")
    }
}

static PROFILES: Lazy<Vec<CountryFuelProfile>> = Lazy::new(|| {
    vec![
        CountryFuelProfile {
            code: "germany",
            display_name: "Germany",
            tax_rate_pct: 65.45,
            vat_pct: 19.0,
            currency: "EUR",
            fuel_names: &["Diesel", "Super E10", "Super E5", "Super Plus"],
            price_factor: 1.15,
            unit_label: "€/liter",
            barrel_to_local_units: 159.0,
            notes: "Germany has among the highest fuel taxes in Europe, with prices varying significantly across regions.",
        },
        CountryFuelProfile {
            code: "usa",
            display_name: "United States",
            tax_rate_pct: 18.4,
            vat_pct: 0.0, // federal level; states add their own sales tax
            currency: "USD",
            fuel_names: &["Regular Gasoline", "Premium Gasoline", "Diesel"],
            price_factor: 1.05,
            unit_label: "$/gallon",
            barrel_to_local_units: 42.0,
            notes: "US fuel prices vary significantly by state due to different state taxes.",
        },
        CountryFuelProfile {
            code: "uk",
            display_name: "United Kingdom",
            tax_rate_pct: 57.95,
            vat_pct: 20.0,
            currency: "GBP",
            fuel_names: &["Unleaded", "Premium Unleaded", "Diesel"],
            price_factor: 1.1,
            unit_label: "£/liter",
            barrel_to_local_units: 159.0,
            notes: "UK fuel prices include fuel duty and VAT.",
        },
    ]
});

/// Country aliases, many-to-one onto the profile codes above.
static ALIASES: &[(&str, &str)] = &[
    ("germany", "germany"),
    ("deutschland", "germany"),
    ("usa", "usa"),
    ("united states", "usa"),
    ("america", "usa"),
    ("us", "usa"),
    ("uk", "uk"),
    ("united kingdom", "uk"),
    ("britain", "uk"),
    ("england", "uk"),
];

/// Look up a profile by its normalized code. Unknown codes simply yield
/// `None`; callers drop the retail enrichment rather than erroring.
pub fn lookup(code: &str) -> Option<&'static CountryFuelProfile> {
    PROFILES.iter().find(|p| p.code == code)
}

/// Map a country mention (any casing, alias or code) to its profile code.
pub fn normalize_country(text: &str) -> Option<&'static str> {
    let lowered = text.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, code)| *code)
}

/// All registered profile codes, in registry order.
pub fn known_codes() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|p| p.code)
}

static ALIAS_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    ALIASES
        .iter()
        .map(|(alias, code)| {
            (Regex::new(&format!(r"\b{}\b", alias)).unwrap(), *code)
        })
        .collect()
});

/// Scan free text for any known country code or alias as a standalone word
/// and return the matching profile code.
pub fn find_country_mention(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    ALIAS_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&lowered))
        .map(|(_, code)| *code)
}
