//! The four compliance rules

pub mod comfort;
pub mod iso_who;
pub mod rt60;
pub mod zone_noise;

pub use comfort::ComfortScoreRule;
pub use iso_who::IsoWhoRule;
pub use rt60::Rt60Rule;
pub use zone_noise::ZoneNoiseRule;

const PASS: &str = "✅";
const FAIL: &str = "❌";

fn mark(passed: bool) -> &'static str {
    if passed {
        PASS
    } else {
        FAIL
    }
}
