use crate::models::RetailQuote;
use crate::profiles::CountryFuelProfile;

/// Estimate the tax-and-VAT-inclusive retail fuel price for a country from
/// a benchmark crude price in USD per barrel.
///
/// The operations apply in a fixed order: retail factor, barrel→local-unit
/// conversion, fuel duty, VAT, then the USD→local FX rate. Callers without
/// a live rate pass 1.0 (or a fixed approximation) and record its
/// provenance separately.
pub fn convert(
    benchmark_usd: f64,
    profile: &CountryFuelProfile,
    fx_rate_usd_to_local: f64,
) -> RetailQuote {
    let mut local = (benchmark_usd * profile.price_factor) / profile.barrel_to_local_units;
    local *= 1.0 + profile.tax_rate_pct / 100.0;
    local *= 1.0 + profile.vat_pct / 100.0;
    local *= fx_rate_usd_to_local;

    RetailQuote {
        price: (local * 100.0).round() / 100.0,
        unit_label: profile.unit_label.to_string(),
        country: profile.display_name.to_string(),
        primary_fuel: profile.primary_fuel().to_string(),
        currency: profile.currency.to_string(),
        tax_rate_pct: profile.tax_rate_pct,
        vat_pct: profile.vat_pct,
    }
}
