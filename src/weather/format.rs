//! Turning a weather reading into localized HTML.

use chrono::{DateTime, Utc};

use super::client::{CurrentWeather, WeatherError};
use crate::i18n::{self, get_text_with};
use crate::utils::html_escape;

/// Words kept lowercase inside city names ("Rio de Janeiro").
const LOWERCASE_PARTICLES: &[&str] = &["de", "da", "do", "del", "y", "of"];

/// Emoji for an OpenWeatherMap icon code.
pub fn weather_emoji(icon: &str) -> &'static str {
    match icon {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅️",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" => "🌦️",
        "09n" | "10d" | "10n" => "🌧️",
        "11d" | "11n" => "🌩️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => "❓",
    }
}

/// Title-case a city name, keeping particles lowercase after the first word.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            if index > 0 && LOWERCASE_PARTICLES.contains(&lower.as_str()) {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first letter, lowercase the rest.
fn capitalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The two texts offered for one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    /// Short message: temperatures and conditions.
    pub compact: String,
    /// Long message: adds wind and humidity.
    pub detailed: String,
}

/// Build both report texts for `query` at time `now`.
pub fn build_report(
    query: &str,
    weather: &CurrentWeather,
    lang: &str,
    now: DateTime<Utc>,
) -> Result<WeatherReport, WeatherError> {
    let condition = weather.condition()?;
    let local = now.with_timezone(&i18n::timezone(lang));

    let city = html_escape(&title_case(query));
    let country = weather.sys.country.clone().unwrap_or_default();
    let emoji = weather_emoji(&condition.icon);
    let description = html_escape(&capitalize(&condition.description));
    let temperature = round(weather.main.temp);
    let feels_like = round(weather.main.feels_like);
    let temp_max = round(weather.main.temp_max);
    let temp_min = round(weather.main.temp_min);
    let wind = round(weather.wind.speed);
    let humidity = weather.main.humidity.to_string();
    let time = local.format("%H:%M:%S").to_string();
    let date = local.format(&i18n::get_text(lang, "weather.date_format")).to_string();

    let args: [(&str, &str); 12] = [
        ("city", &city),
        ("country", &country),
        ("emoji", emoji),
        ("description", &description),
        ("temperature", &temperature),
        ("feels_like", &feels_like),
        ("temp_max", &temp_max),
        ("temp_min", &temp_min),
        ("wind", &wind),
        ("humidity", &humidity),
        ("time", &time),
        ("date", &date),
    ];

    Ok(WeatherReport {
        compact: get_text_with(lang, "weather.compact", &args),
        detailed: get_text_with(lang, "weather.detailed", &args),
        city,
        country,
    })
}

fn round(value: f64) -> String {
    format!("{}", value.round() as i64)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::super::client::{Condition, MainReadings, Sys, Wind};
    use super::*;

    fn sample() -> CurrentWeather {
        CurrentWeather {
            name: "Rio de Janeiro".to_string(),
            main: MainReadings {
                temp: 29.6,
                feels_like: 33.4,
                temp_min: 27.2,
                temp_max: 31.5,
                humidity: 70,
            },
            weather: vec![Condition {
                description: "NUVENS dispersas".to_string(),
                icon: "03d".to_string(),
            }],
            wind: Wind { speed: 4.4 },
            sys: Sys { country: Some("BR".to_string()) },
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("rio DE janeiro"), "Rio de Janeiro");
        assert_eq!(title_case("de  haag"), "De Haag");
        assert_eq!(title_case("são paulo"), "São Paulo");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_weather_emoji() {
        assert_eq!(weather_emoji("01n"), "🌙");
        assert_eq!(weather_emoji("10d"), "🌧️");
        assert_eq!(weather_emoji("99x"), "❓");
    }

    #[test]
    fn test_build_report() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap();
        let report = build_report("rio de janeiro", &sample(), "pt", now).unwrap();

        assert_eq!(report.city, "Rio de Janeiro");
        assert_eq!(report.country, "BR");
        assert!(report.compact.contains("30"));
        assert!(report.compact.contains("Nuvens dispersas"));
        assert!(report.detailed.contains("70"));
        // 15:00 UTC is 12:00 in São Paulo
        assert!(report.detailed.contains("12:00:00"));
        assert!(!report.detailed.contains('{'));
    }

    #[test]
    fn test_report_escapes_query() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap();
        let report = build_report("<b>x</b>", &sample(), "en", now).unwrap();
        assert!(report.city.contains("&lt;"));
    }
}
