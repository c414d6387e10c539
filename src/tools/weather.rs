// ABOUTME: WeatherTool - deterministic simulated weather lookup.
// ABOUTME: Conditions are keyed on a hash of the location; no network access.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use chrono::Local;

use crate::tool::Tool;

const CONDITIONS: [&str; 5] = ["sunny", "partly cloudy", "rainy", "windy", "overcast"];

/// Pick a temperature/condition pair for a location.
///
/// Selection depends only on the location hash, so repeated lookups for
/// the same location within one process agree; the timestamp in the
/// rendered output is display-only.
fn simulate(location: &str) -> (i64, &'static str) {
    let mut hasher = DefaultHasher::new();
    location.hash(&mut hasher);
    let r = (hasher.finish() % 100) as i64;

    let temps = [22 + r % 5, 25 + r % 4, 18 + r % 6];
    let temp = temps[(r % temps.len() as i64) as usize];
    let cond = CONDITIONS[(r % CONDITIONS.len() as i64) as usize];
    (temp, cond)
}

/// Tool for simulated weather lookups.
#[derive(Default)]
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Returns simulated weather for a location."
    }

    async fn invoke(&self, input: &str) -> Result<String, anyhow::Error> {
        let (temp, cond) = simulate(input);
        let now = Local::now().format("%Y-%m-%d %H:%M");
        Ok(format!(
            "Weather for {} at {}: {}°C, {}.",
            input, now, temp, cond
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_location_same_conditions() {
        assert_eq!(simulate("Berlin"), simulate("Berlin"));
        assert_eq!(simulate("Osaka"), simulate("Osaka"));
    }

    #[test]
    fn test_temperature_in_simulated_range() {
        for location in ["Berlin", "Osaka", "La Paz", ""] {
            let (temp, cond) = simulate(location);
            assert!((18..=28).contains(&temp), "temp {} out of range", temp);
            assert!(CONDITIONS.contains(&cond));
        }
    }

    #[tokio::test]
    async fn test_report_is_stable_modulo_timestamp() {
        let tool = WeatherTool;
        let first = tool.invoke("Berlin").await.unwrap();
        let second = tool.invoke("Berlin").await.unwrap();

        assert!(first.starts_with("Weather for Berlin at "));
        // Everything after the timestamp (temperature and condition)
        // must agree between calls.
        let tail = |s: &str| s.split(": ").nth(1).map(str::to_string);
        assert_eq!(tail(&first).unwrap(), tail(&second).unwrap());
    }
}
