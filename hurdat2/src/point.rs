//! Point géographique WGS84 et parsing des coordonnées HURDAT2
//!
//! Les coordonnées HURDAT2 sont des magnitudes décimales suivies d'une lettre
//! cardinale (`29.1N`, `90.2W`). `S` et `W` donnent une valeur négative.

use crate::Hurdat2Error;

/// Latitude maximale acceptée (degrés décimaux)
pub const MAX_LATITUDE: f64 = 90.0;

/// Point géographique en degrés décimaux WGS84
///
/// La longitude est toujours renormalisée dans `(-180, 180]` à la
/// construction. Une latitude hors de `[-90, 90]` est une erreur, jamais
/// normalisée.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    latitude: f64,
    longitude: f64,
}

impl Point {
    /// Crée un point depuis des degrés décimaux bruts
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Hurdat2Error> {
        if !latitude.is_finite() || latitude.abs() > MAX_LATITUDE {
            return Err(Hurdat2Error::Validation(format!(
                "latitude {latitude} out of range [-90, 90]"
            )));
        }
        Ok(Self {
            latitude,
            longitude: normalize_longitude(longitude),
        })
    }

    /// Crée un point depuis les deux champs coordonnées d'une ligne HURDAT2
    ///
    /// # Example
    ///
    /// ```
    /// use hurdat2::Point;
    ///
    /// let p = Point::from_hurdat2("29.1N", "90.2W").unwrap();
    /// assert_eq!(p.latitude(), 29.1);
    /// assert_eq!(p.longitude(), -90.2);
    /// ```
    pub fn from_hurdat2(lat: &str, lon: &str) -> Result<Self, Hurdat2Error> {
        let latitude = parse_coordinate(lat, Axis::Latitude)?;
        let longitude = parse_coordinate(lon, Axis::Longitude)?;
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Représentation Well-Known Text, consommée par le moteur spatial
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.longitude, self.latitude)
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(p: Point) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

/// Axe d'une coordonnée directionnelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Lettres cardinales valides pour cet axe (la négative en second)
    fn letters(self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }
}

/// Parse une coordonnée directionnelle en degrés décimaux signés
///
/// `S`/`W` rendent la valeur négative, `N`/`E` la laissent positive.
fn parse_coordinate(coord: &str, axis: Axis) -> Result<f64, Hurdat2Error> {
    let coord = coord.trim();

    let Some(last) = coord.chars().last() else {
        return Err(Hurdat2Error::coordinate(coord, "empty coordinate"));
    };
    let letter = last.to_ascii_uppercase();

    let (positive, negative) = axis.letters();
    if letter != positive && letter != negative {
        return Err(Hurdat2Error::coordinate(
            coord,
            format!("expected trailing {positive} or {negative}, got {letter:?}"),
        ));
    }

    let magnitude = &coord[..coord.len() - last.len_utf8()];
    let value: f64 = fast_parse_f64(magnitude.trim()).ok_or_else(|| {
        Hurdat2Error::coordinate(coord, format!("unparsable magnitude {magnitude:?}"))
    })?;

    if letter == negative {
        Ok(-value)
    } else {
        Ok(value)
    }
}

/// Renormalise une longitude dans l'intervalle canonique `(-180, 180]`
///
/// Modulo mathématique (résultat toujours positif avant l'offset), donc
/// `200 -> -160` et `-200 -> 160`. La valeur frontière `-180` produite par
/// la formule est repliée sur `+180`.
pub fn normalize_longitude(lon: f64) -> f64 {
    let normalized = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if normalized == -180.0 {
        180.0
    } else {
        normalized
    }
}

/// Parse f64 via fast-float (format simple: digits.digits)
#[inline]
fn fast_parse_f64(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    fast_float::parse(s).ok()
}
