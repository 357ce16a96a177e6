//! BMKG forecast payload and the normalized per-slot forecast record

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layout BMKG uses for `local_datetime` / `utc_datetime`
pub const BMKG_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Western Indonesia Time (WIB), the default zone for BMKG locations
pub const WIB_OFFSET_SECONDS: i32 = 7 * 3600;

// ============================================================================
// Raw provider payload
// ============================================================================

/// Top-level BMKG `prakiraan-cuaca` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BmkgPayload {
    #[serde(default)]
    pub lokasi: Option<BmkgLocation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub data: Vec<BmkgDataEntry>,
}

/// Location block attached to a BMKG response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BmkgLocation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub adm1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub adm2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub adm3: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub adm4: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub provinsi: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub kotkab: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub kecamatan: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub desa: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timezone: Option<String>,
}

/// One entry of the `data` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BmkgDataEntry {
    #[serde(default)]
    pub lokasi: Option<BmkgLocation>,
    /// Per-day arrays of 3-hourly slots
    #[serde(default, deserialize_with = "lenient_days")]
    pub cuaca: Vec<Vec<BmkgSlot>>,
}

/// A single forecast slot using BMKG's short field codes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BmkgSlot {
    #[serde(default, deserialize_with = "lenient_string")]
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub local_datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub utc_datetime: Option<String>,
    /// Temperature (°C)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub t: Option<f64>,
    /// Precipitation (mm)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tp: Option<f64>,
    /// Wind speed (km/h)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ws: Option<f64>,
    /// Wind direction (compass text)
    #[serde(default, deserialize_with = "lenient_string")]
    pub wd: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wd_deg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wd_to: Option<String>,
    /// Relative humidity (%)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hu: Option<f64>,
    /// Total cloud cover (%)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tcc: Option<f64>,
    /// Visibility (m)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vs_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weather: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather_desc_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time_index: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub analysis_date: Option<String>,
}

impl BmkgPayload {
    /// Location block, preferring the top-level one
    pub fn location(&self) -> Option<&BmkgLocation> {
        self.lokasi
            .as_ref()
            .or_else(|| self.data.first().and_then(|entry| entry.lokasi.as_ref()))
    }

    /// Per-day slot arrays of the first data entry
    pub fn days(&self) -> &[Vec<BmkgSlot>] {
        self.data
            .first()
            .map(|entry| entry.cuaca.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the payload carries any forecast days at all
    pub fn has_forecast(&self) -> bool {
        !self.days().is_empty()
    }

    /// UTC offset of the location; WIB when unknown
    pub fn utc_offset(&self) -> FixedOffset {
        let seconds = self
            .location()
            .and_then(|l| l.timezone.as_deref())
            .and_then(timezone_offset_seconds)
            .unwrap_or(WIB_OFFSET_SECONDS);
        FixedOffset::east_opt(seconds)
            .or_else(|| FixedOffset::east_opt(WIB_OFFSET_SECONDS))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Parse a BMKG response body. Returns `None` when the text is not JSON.
pub fn parse_payload(json: &str) -> Option<BmkgPayload> {
    serde_json::from_str(json).ok()
}

// ============================================================================
// Normalized slot
// ============================================================================

/// Uniform per-slot forecast record consumed by the alert engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSlot {
    pub timestamp: DateTime<Utc>,
    pub rainfall_mm: f64,
    pub wind_kmh: f64,
    pub visibility_m: Option<f64>,
    pub description: String,
    pub humidity_pct: Option<f64>,
    pub temperature_c: Option<f64>,
    pub wind_direction: Option<String>,
}

impl ForecastSlot {
    /// A dry, calm slot with unknown visibility
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            rainfall_mm: 0.0,
            wind_kmh: 0.0,
            visibility_m: None,
            description: String::new(),
            humidity_pct: None,
            temperature_c: None,
            wind_direction: None,
        }
    }

    pub fn with_rainfall(mut self, rainfall_mm: f64) -> Self {
        self.rainfall_mm = rainfall_mm.max(0.0);
        self
    }

    pub fn with_wind(mut self, wind_kmh: f64) -> Self {
        self.wind_kmh = wind_kmh.max(0.0);
        self
    }

    pub fn with_visibility(mut self, visibility_m: f64) -> Self {
        self.visibility_m = Some(visibility_m.max(0.0));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive substring check against the weather description
    pub fn description_contains(&self, needle: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    pub fn temperature_f(&self) -> Option<i64> {
        self.temperature_c.map(celsius_to_fahrenheit)
    }
}

/// Convert °C to whole °F the way BMKG consumers display it
pub fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i64
}

/// Flatten a BMKG payload into normalized slots.
///
/// Never fails: a payload without `data[0].cuaca` yields an empty vector and
/// slots without a parseable timestamp are skipped.
pub fn normalize(payload: &BmkgPayload) -> Vec<ForecastSlot> {
    let offset = payload.utc_offset();

    payload
        .days()
        .iter()
        .flatten()
        .filter_map(|slot| normalize_slot(slot, offset))
        .collect()
}

/// Normalize a single provider slot
pub fn normalize_slot(slot: &BmkgSlot, offset: FixedOffset) -> Option<ForecastSlot> {
    let timestamp = slot_timestamp(slot, offset)?;

    Some(ForecastSlot {
        timestamp,
        rainfall_mm: non_negative(slot.tp),
        wind_kmh: non_negative(slot.ws),
        visibility_m: slot.vs.filter(|v| v.is_finite()).map(|v| v.max(0.0)),
        description: slot.weather_desc.clone().unwrap_or_default(),
        humidity_pct: slot.hu,
        temperature_c: slot.t,
        wind_direction: slot.wd.clone(),
    })
}

/// Resolve the absolute time of a slot.
///
/// `utc_datetime` wins; otherwise `local_datetime` is read in the location's
/// zone. RFC 3339 strings are accepted in either field.
pub fn slot_timestamp(slot: &BmkgSlot, offset: FixedOffset) -> Option<DateTime<Utc>> {
    if let Some(utc) = slot.utc_datetime.as_deref().and_then(parse_utc) {
        return Some(utc);
    }
    slot.local_datetime
        .as_deref()
        .and_then(|local| parse_local(local, offset))
}

fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value.trim(), BMKG_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_local(value: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value.trim(), BMKG_DATETIME_FORMAT).ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// UTC offset in seconds for a BMKG timezone label.
///
/// Understands the three Indonesian IANA zones and literal `+HHMM` / `+HH:MM`.
pub fn timezone_offset_seconds(label: &str) -> Option<i32> {
    let label = label.trim();
    match label {
        "Asia/Jakarta" | "Asia/Pontianak" | "WIB" => return Some(7 * 3600),
        "Asia/Makassar" | "WITA" => return Some(8 * 3600),
        "Asia/Jayapura" | "WIT" => return Some(9 * 3600),
        _ => {}
    }

    let (sign, rest) = match label.chars().next()? {
        '+' => (1, &label[1..]),
        '-' => (-1, &label[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    Some(sign * (hours * 3600 + minutes * 60))
}

fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

// ============================================================================
// Lenient field decoding
// ============================================================================

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_vec<'de, D>(deserializer: D) -> Result<Vec<BmkgDataEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_days<'de, D>(deserializer: D) -> Result<Vec<Vec<BmkgSlot>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(days) = value else {
        return Ok(Vec::new());
    };

    Ok(days
        .into_iter()
        .map(|day| match day {
            serde_json::Value::Array(slots) => slots
                .into_iter()
                .filter_map(|slot| serde_json::from_value(slot).ok())
                .collect(),
            _ => Vec::new(),
        })
        .collect())
}
