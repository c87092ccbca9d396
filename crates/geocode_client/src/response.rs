use serde_json::Value;
use shared::domain::{Coordinate, GeocodeResult};

use crate::GeocodeError;

/// Turns a raw rupantor payload into a [`GeocodeResult`].
///
/// Coordinates may arrive as JSON numbers or numeric strings. Anything that is
/// missing, non-finite, or outside the valid degree range is rejected here so
/// that invalid points never reach the geometry or the map.
pub fn parse_geocode_response(query: &str, payload: Value) -> Result<GeocodeResult, GeocodeError> {
    let geocoded = match payload.get("geocoded_address") {
        Some(Value::Object(fields)) if !fields.is_empty() => fields,
        _ => return Err(GeocodeError::AddressNotFound(query.to_string())),
    };

    let latitude = degrees(geocoded.get("latitude"), "latitude")?;
    let longitude = degrees(geocoded.get("longitude"), "longitude")?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeocodeError::MalformedResponse(format!(
            "latitude {latitude} out of range"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeocodeError::MalformedResponse(format!(
            "longitude {longitude} out of range"
        )));
    }

    let address = geocoded
        .get("Address")
        .or_else(|| geocoded.get("address"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let confidence = payload
        .get("confidence_score_percentage")
        .and_then(number);

    Ok(GeocodeResult {
        origin: Coordinate::new(latitude, longitude),
        address,
        confidence,
        raw: payload,
    })
}

fn degrees(value: Option<&Value>, field: &str) -> Result<f64, GeocodeError> {
    let value = value
        .ok_or_else(|| GeocodeError::MalformedResponse(format!("missing {field}")))?;
    match number(value) {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(GeocodeError::MalformedResponse(format!(
            "{field} is not a number: {value}"
        ))),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
