//! Theme colour conversion
//!
//! Theme colours arrive as CSS strings: either hex literals, which are used
//! as-is, or functional `hsl(H, S%, L%)` notation, which is converted to a
//! `#rrggbb` triplet with the canonical HSL colour-space formula.

use crate::{Error, Result};

/// Resolve a theme colour, converting functional HSL to hex
///
/// Anything that is not HSL is returned exactly as given.
pub fn parse_if_hsl(css: &str) -> Result<String> {
    if css.contains("hsl") {
        hsl_to_hex(css.trim())
    } else {
        Ok(css.to_string())
    }
}

/// Split `hsl(H, S%, L%)` into its three numeric components
pub fn parse_hsl(raw: &str) -> Result<(f64, f64, f64)> {
    let malformed = || Error::MalformedColor(raw.to_string());

    let (_, args) = raw.split_once('(').ok_or_else(malformed)?;
    let (args, _) = args.split_once(')').ok_or_else(malformed)?;

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let [h, s, l] = parts.as_slice() else {
        return Err(malformed());
    };

    let number = |part: &str, unit: &str| -> Result<f64> {
        let digits = part.strip_suffix(unit).unwrap_or(part).trim();
        match digits.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(malformed()),
        }
    };

    Ok((number(h, "deg")?, number(s, "%")?, number(l, "%")?))
}

/// Convert `hsl(H, S%, L%)` to `#rrggbb`
pub fn hsl_to_hex(raw: &str) -> Result<String> {
    let (h, s, l) = parse_hsl(raw)?;
    let [r, g, b] = hsl_to_rgb(h, s, l);
    Ok(format!("#{}", hex::encode([r, g, b])))
}

/// Canonical HSL to RGB, hue in degrees, saturation and lightness in percent
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let l = l / 100.0;
    let a = s * l.min(1.0 - l) / 100.0;

    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        // f64::round rounds half away from zero
        (255.0 * color).round().clamp(0.0, 255.0) as u8
    };

    [channel(0.0), channel(8.0), channel(4.0)]
}
