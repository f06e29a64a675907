//! Proximity query builder and search repository.
//!
//! This module generates the within-radius WHERE fragment shared by both
//! search variants, conjoining the spherical-distance predicate with any
//! optional attribute predicates, and executes the assembled queries
//! against PostGIS.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use sightdex_core::{
    defaults::METERS_PER_MILE, Error, GeoPoint, Result, SightingPin, SightingSearchRepository,
    SightingSearchRequest, SpeciesSearchRequest, TimeOfDay, WeatherCondition,
};

/// Type-safe parameter binding for dynamically assembled SQL.
#[derive(Debug, Clone)]
pub enum QueryParam {
    /// Double-precision parameter.
    Float(f64),
    /// Integer parameter.
    Int(i32),
    /// String parameter.
    String(String),
}

/// Optional attribute predicates shared by both search variants.
///
/// Catalog predicates (`pokemon_type`, `rarity`) only make sense for the
/// species-name variant; the sightings variant leaves them unset.
#[derive(Debug, Clone, Default)]
pub struct ProximityFilter {
    /// Weather equality on the sighting row.
    pub weather: Option<String>,
    /// Species type equality on the catalog row.
    pub pokemon_type: Option<String>,
    /// Species rarity equality on the catalog row.
    pub rarity: Option<String>,
    /// Lower CP bound against `stats_cp.max_cp`.
    pub min_cp: Option<i32>,
    /// Upper CP bound against `stats_cp.max_cp`.
    pub max_cp: Option<i32>,
}

impl ProximityFilter {
    /// True when at least one CP bound is active.
    ///
    /// Callers use this to decide whether the `stats_cp` join is needed
    /// at all; species without a stats row must not vanish from results
    /// when no CP filter was requested.
    pub fn has_cp_bound(&self) -> bool {
        cp_bound(self.min_cp).is_some() || cp_bound(self.max_cp).is_some()
    }
}

/// Normalize a CP bound: absent and explicit zero both mean "no filter".
fn cp_bound(value: Option<i32>) -> Option<i32> {
    value.filter(|&v| v != 0)
}

/// Normalize a string predicate: absent and empty both mean "no filter".
fn text_filter(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Generates the WHERE clause fragment for proximity search.
///
/// The fragment always starts with the spherical-distance predicate
/// (center longitude, center latitude, radius in miles, in that
/// parameter order) and appends the active attribute predicates in a
/// fixed order: species type, rarity, weather, CP lower bound, CP upper
/// bound. Placeholders are numbered past `param_offset` so the fragment
/// can be spliced after already-bound leading parameters.
///
/// # Example
///
/// ```rust,ignore
/// use sightdex_db::proximity::{ProximityFilter, ProximityQueryBuilder};
/// use sightdex_core::GeoPoint;
///
/// let center = GeoPoint { latitude: 37.7749, longitude: -122.4194 };
/// let builder = ProximityQueryBuilder::new(center, 5.0, ProximityFilter::default(), 1);
/// let (sql, params) = builder.build();
/// // sql: "(ST_Distance(ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography, ..."
/// // params: [Float(-122.4194), Float(37.7749), Float(5.0)]
/// ```
pub struct ProximityQueryBuilder {
    center: GeoPoint,
    radius_miles: f64,
    filter: ProximityFilter,
    param_offset: usize,
}

impl ProximityQueryBuilder {
    /// Create a new builder.
    ///
    /// # Parameters
    ///
    /// * `center` - Already-geocoded search center
    /// * `radius_miles` - Great-circle radius in statute miles
    /// * `filter` - Optional attribute predicates
    /// * `param_offset` - Number of parameters already bound ahead of the fragment
    pub fn new(
        center: GeoPoint,
        radius_miles: f64,
        filter: ProximityFilter,
        param_offset: usize,
    ) -> Self {
        Self {
            center,
            radius_miles,
            filter,
            param_offset,
        }
    }

    /// Build the WHERE clause fragment.
    ///
    /// Returns a tuple of:
    /// - SQL fragment with `$n` placeholders, clauses joined by AND
    /// - Query parameters in the order they appear in the SQL
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        // Distance predicate first: ST_MakePoint takes (longitude, latitude),
        // ST_Distance over geography yields meters.
        clauses.push(format!(
            "(ST_Distance(ST_SetSRID(ST_MakePoint(${}, ${}), 4326)::geography, \
             ST_SetSRID(ST_MakePoint(s.longitude, s.latitude), 4326)::geography) / {}) <= ${}",
            param_idx + 1,
            param_idx + 2,
            METERS_PER_MILE,
            param_idx + 3
        ));
        params.push(QueryParam::Float(self.center.longitude));
        params.push(QueryParam::Float(self.center.latitude));
        params.push(QueryParam::Float(self.radius_miles));
        param_idx += 3;

        if let Some(pokemon_type) = text_filter(self.filter.pokemon_type.as_deref()) {
            param_idx += 1;
            clauses.push(format!("p.type = ${}", param_idx));
            params.push(QueryParam::String(pokemon_type.to_string()));
        }

        if let Some(rarity) = text_filter(self.filter.rarity.as_deref()) {
            param_idx += 1;
            clauses.push(format!("p.rarity = ${}", param_idx));
            params.push(QueryParam::String(rarity.to_string()));
        }

        if let Some(weather) = text_filter(self.filter.weather.as_deref()) {
            param_idx += 1;
            clauses.push(format!("s.weather = ${}", param_idx));
            params.push(QueryParam::String(weather.to_string()));
        }

        if let Some(min_cp) = cp_bound(self.filter.min_cp) {
            param_idx += 1;
            clauses.push(format!("sc.max_cp >= ${}", param_idx));
            params.push(QueryParam::Int(min_cp));
        }

        if let Some(max_cp) = cp_bound(self.filter.max_cp) {
            param_idx += 1;
            clauses.push(format!("sc.max_cp <= ${}", param_idx));
            params.push(QueryParam::Int(max_cp));
        }

        (clauses.join(" AND "), params)
    }
}

/// PostGIS-backed proximity search over sightings.
pub struct PgSightingSearchRepository {
    pool: Pool<Postgres>,
}

impl PgSightingSearchRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SightingSearchRepository for PgSightingSearchRepository {
    async fn sightings_within_radius(
        &self,
        req: SightingSearchRequest,
    ) -> Result<Vec<SightingPin>> {
        let filter = ProximityFilter {
            weather: req.weather.clone(),
            min_cp: req.min_cp,
            max_cp: req.max_cp,
            ..Default::default()
        };

        // $1 is the species name; the proximity fragment starts at $2
        let builder = ProximityQueryBuilder::new(req.center, req.radius_miles, filter, 1);
        let (where_clause, params) = builder.build();

        let sql = format!(
            "SELECT s.sighting_id AS id, s.latitude, s.longitude, s.weather, s.appeared_time_of_day \
             FROM pokemon p \
             JOIN stats_cp sc ON sc.pokemon_id = p.pokemon_id \
             JOIN sightings s ON s.pokemon_id = p.pokemon_id \
             WHERE p.pokemon_name = $1 AND {}",
            where_clause
        );

        let mut q = sqlx::query(&sql).bind(&req.pokemon_name);
        for param in &params {
            q = match param {
                QueryParam::Float(v) => q.bind(v),
                QueryParam::Int(v) => q.bind(v),
                QueryParam::String(s) => q.bind(s),
            };
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        Ok(rows.into_iter().map(map_row_to_pin).collect())
    }

    async fn species_within_radius(&self, req: SpeciesSearchRequest) -> Result<Vec<String>> {
        let filter = ProximityFilter {
            weather: req.weather.clone(),
            pokemon_type: req.pokemon_type.clone(),
            rarity: req.rarity.clone(),
            min_cp: req.min_cp,
            max_cp: req.max_cp,
        };

        // Without an active CP bound the stats join is skipped entirely so
        // species lacking a stats row still show up.
        let stats_join = if filter.has_cp_bound() {
            "JOIN stats_cp sc ON sc.pokemon_id = p.pokemon_id "
        } else {
            ""
        };

        let builder = ProximityQueryBuilder::new(req.center, req.radius_miles, filter, 0);
        let (where_clause, params) = builder.build();

        let sql = format!(
            "SELECT DISTINCT p.pokemon_name \
             FROM pokemon p \
             {}JOIN sightings s ON s.pokemon_id = p.pokemon_id \
             WHERE {} \
             ORDER BY p.pokemon_name",
            stats_join, where_clause
        );

        let mut q = sqlx::query(&sql);
        for param in &params {
            q = match param {
                QueryParam::Float(v) => q.bind(v),
                QueryParam::Int(v) => q.bind(v),
                QueryParam::String(s) => q.bind(s),
            };
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        Ok(rows.into_iter().map(|r| r.get("pokemon_name")).collect())
    }
}

fn map_row_to_pin(row: PgRow) -> SightingPin {
    let weather: String = row.get("weather");
    let time_of_day: String = row.get("appeared_time_of_day");
    SightingPin {
        id: row.get("id"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        weather: WeatherCondition::from_name(&weather).unwrap_or(WeatherCondition::Clear),
        appeared_time_of_day: TimeOfDay::from_name(&time_of_day).unwrap_or(TimeOfDay::Morning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sf_center() -> GeoPoint {
        GeoPoint {
            latitude: 37.7749,
            longitude: -122.4194,
        }
    }

    #[test]
    fn test_distance_only_fragment() {
        let builder =
            ProximityQueryBuilder::new(sf_center(), 5.0, ProximityFilter::default(), 0);
        let (sql, params) = builder.build();

        assert_eq!(
            sql,
            "(ST_Distance(ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, \
             ST_SetSRID(ST_MakePoint(s.longitude, s.latitude), 4326)::geography) / 1609.34) <= $3"
        );
        assert_eq!(params.len(), 3);
        match &params[0] {
            QueryParam::Float(lng) => assert!((*lng - (-122.4194)).abs() < f64::EPSILON),
            _ => panic!("Expected Float param for longitude"),
        }
        match &params[1] {
            QueryParam::Float(lat) => assert!((*lat - 37.7749).abs() < f64::EPSILON),
            _ => panic!("Expected Float param for latitude"),
        }
        match &params[2] {
            QueryParam::Float(radius) => assert!((*radius - 5.0).abs() < f64::EPSILON),
            _ => panic!("Expected Float param for radius"),
        }
    }

    #[test]
    fn test_weather_filter() {
        let filter = ProximityFilter {
            weather: Some("Rain".to_string()),
            ..Default::default()
        };
        let builder = ProximityQueryBuilder::new(sf_center(), 5.0, filter, 0);
        let (sql, params) = builder.build();

        assert!(sql.contains(" AND s.weather = $4"));
        assert_eq!(params.len(), 4);
        match &params[3] {
            QueryParam::String(s) => assert_eq!(s, "Rain"),
            _ => panic!("Expected String param for weather"),
        }
    }

    #[test]
    fn test_empty_weather_emits_no_clause() {
        let filter = ProximityFilter {
            weather: Some(String::new()),
            ..Default::default()
        };
        let builder = ProximityQueryBuilder::new(sf_center(), 5.0, filter, 0);
        let (sql, params) = builder.build();

        assert!(!sql.contains("s.weather"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_cp_bounds() {
        let filter = ProximityFilter {
            min_cp: Some(50),
            max_cp: Some(100),
            ..Default::default()
        };
        let builder = ProximityQueryBuilder::new(sf_center(), 5.0, filter, 0);
        let (sql, params) = builder.build();

        assert!(sql.contains("sc.max_cp >= $4"));
        assert!(sql.contains("sc.max_cp <= $5"));
        assert_eq!(params.len(), 5);
        match &params[3] {
            QueryParam::Int(v) => assert_eq!(*v, 50),
            _ => panic!("Expected Int param for min CP"),
        }
        match &params[4] {
            QueryParam::Int(v) => assert_eq!(*v, 100),
            _ => panic!("Expected Int param for max CP"),
        }
    }

    #[test]
    fn test_zero_cp_bound_is_ignored() {
        let filter = ProximityFilter {
            min_cp: Some(0),
            max_cp: Some(0),
            ..Default::default()
        };
        assert!(!filter.has_cp_bound());

        let builder = ProximityQueryBuilder::new(sf_center(), 5.0, filter, 0);
        let (sql, params) = builder.build();

        assert!(!sql.contains("sc.max_cp"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_catalog_filters() {
        let filter = ProximityFilter {
            pokemon_type: Some("Electric".to_string()),
            rarity: Some("Rare".to_string()),
            ..Default::default()
        };
        let builder = ProximityQueryBuilder::new(sf_center(), 2.0, filter, 0);
        let (sql, params) = builder.build();

        assert!(sql.contains("p.type = $4"));
        assert!(sql.contains("p.rarity = $5"));
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_combined_filters_keep_fixed_order() {
        let filter = ProximityFilter {
            weather: Some("Clear".to_string()),
            pokemon_type: Some("Water".to_string()),
            rarity: Some("Common".to_string()),
            min_cp: Some(10),
            max_cp: Some(2000),
        };
        let builder = ProximityQueryBuilder::new(sf_center(), 5.0, filter, 0);
        let (sql, params) = builder.build();

        // type, rarity, weather, min CP, max CP after the three distance params
        assert!(sql.contains("p.type = $4"));
        assert!(sql.contains("p.rarity = $5"));
        assert!(sql.contains("s.weather = $6"));
        assert!(sql.contains("sc.max_cp >= $7"));
        assert!(sql.contains("sc.max_cp <= $8"));
        assert_eq!(params.len(), 8);
        match &params[3] {
            QueryParam::String(s) => assert_eq!(s, "Water"),
            _ => panic!("Expected String param for type"),
        }
        match &params[7] {
            QueryParam::Int(v) => assert_eq!(*v, 2000),
            _ => panic!("Expected Int param for max CP"),
        }
    }

    #[test]
    fn test_param_offset() {
        let filter = ProximityFilter {
            weather: Some("Snow".to_string()),
            ..Default::default()
        };

        // Start with offset 1 (simulating the species-name parameter)
        let builder = ProximityQueryBuilder::new(sf_center(), 5.0, filter, 1);
        let (sql, params) = builder.build();

        assert!(sql.contains("ST_MakePoint($2, $3)"));
        assert!(sql.contains("<= $4"));
        assert!(sql.contains("s.weather = $5"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_has_cp_bound() {
        assert!(!ProximityFilter::default().has_cp_bound());
        assert!(ProximityFilter {
            min_cp: Some(50),
            ..Default::default()
        }
        .has_cp_bound());
        assert!(ProximityFilter {
            max_cp: Some(900),
            ..Default::default()
        }
        .has_cp_bound());
        assert!(!ProximityFilter {
            min_cp: Some(0),
            ..Default::default()
        }
        .has_cp_bound());
    }
}
