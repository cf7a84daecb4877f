// retail-etl-core/src/application/resolve.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{error, info, instrument, warn};

use crate::domain::dimension::LocationKey;
use crate::domain::error::DomainError;
use crate::domain::fact::FactRecord;
use crate::domain::order::DatedOrder;
use crate::domain::outcome::{ForeignKey, RejectReason, Screened};
use crate::domain::schema::{LOCATION_KEYS, SEGMENT_KEYS, SHIP_MODE_KEYS};
use crate::error::EtlError;
use crate::ports::{SqlValue, Warehouse};

/// Natural key to surrogate id, rebuilt from storage on every run.
#[derive(Debug, Clone, Default)]
pub struct KeyMaps {
    pub ship_modes: HashMap<String, i64>,
    pub segments: HashMap<String, i64>,
    pub locations: HashMap<LocationKey, i64>,
}

pub struct KeyResolver;

impl KeyResolver {
    /// Reads the three surrogate-keyed dimensions. Any query failure aborts:
    /// a partial map would silently drop valid facts.
    #[instrument(skip(warehouse))]
    pub async fn build(warehouse: &dyn Warehouse) -> Result<KeyMaps, EtlError> {
        let maps = Self::fetch_all(warehouse).await.map_err(|e| {
            error!(error = %e, "Error fetching key mappings");
            e
        })?;
        info!(
            ship_modes = maps.ship_modes.len(),
            segments = maps.segments.len(),
            locations = maps.locations.len(),
            "Key maps built"
        );
        Ok(maps)
    }

    async fn fetch_all(warehouse: &dyn Warehouse) -> Result<KeyMaps, EtlError> {
        let mut maps = KeyMaps::default();

        for row in warehouse.fetch_rows(SHIP_MODE_KEYS).await? {
            let (key, id) = text_and_id("dim_ship_mode", &row)?;
            maps.ship_modes.entry(key).or_insert(id);
        }
        for row in warehouse.fetch_rows(SEGMENT_KEYS).await? {
            let (key, id) = text_and_id("dim_segment", &row)?;
            maps.segments.entry(key).or_insert(id);
        }
        for row in warehouse.fetch_rows(LOCATION_KEYS).await? {
            let (key, id) = location_and_id(&row)?;
            maps.locations.entry(key).or_insert(id);
        }
        Ok(maps)
    }
}

fn shape_error(table: &str, detail: String) -> EtlError {
    EtlError::Domain(DomainError::DimensionShape {
        table: table.to_string(),
        detail,
    })
}

fn id_at(table: &str, row: &[SqlValue], index: usize) -> Result<i64, EtlError> {
    row.get(index)
        .and_then(SqlValue::as_i64)
        .ok_or_else(|| shape_error(table, format!("expected an integer id in column {index}")))
}

// Nullable text columns map to the empty string, which is what the loader writes.
fn text_at(row: &[SqlValue], index: usize) -> String {
    row.get(index)
        .and_then(SqlValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn text_and_id(table: &str, row: &[SqlValue]) -> Result<(String, i64), EtlError> {
    match row.first() {
        Some(SqlValue::Text(key)) => Ok((key.clone(), id_at(table, row, 1)?)),
        other => Err(shape_error(table, format!("expected a text key, got {other:?}"))),
    }
}

// Row layout: postal_code, city, state, country, region, location_id
fn location_and_id(row: &[SqlValue]) -> Result<(LocationKey, i64), EtlError> {
    let postal_code = match row.first() {
        Some(SqlValue::Int(p)) => Some(*p),
        Some(SqlValue::Null) | None => None,
        Some(other) => {
            return Err(shape_error(
                "dim_location",
                format!("expected an integer postal code, got {other:?}"),
            ));
        }
    };
    let key = LocationKey {
        postal_code,
        city: text_at(row, 1),
        state: text_at(row, 2),
        country: text_at(row, 3),
        region: text_at(row, 4),
    };
    Ok((key, id_at("dim_location", row, 5)?))
}

impl KeyMaps {
    /// Attaches surrogate ids. A row with any unresolved key is rejected whole.
    pub fn resolve(&self, rows: &[DatedOrder]) -> Screened<FactRecord> {
        let mut screened = Screened::default();
        let mut unmapped: BTreeMap<ForeignKey, BTreeSet<String>> = BTreeMap::new();

        for row in rows {
            let r = &row.record;
            let location = LocationKey::of(r);

            let ship_mode_id = self.ship_modes.get(&r.ship_mode).copied();
            let segment_id = self.segments.get(&r.segment).copied();
            let location_id = self.locations.get(&location).copied();

            match (ship_mode_id, segment_id, location_id) {
                (Some(ship_mode_id), Some(segment_id), Some(location_id)) => {
                    screened.accept(FactRecord {
                        order_id: r.order_id,
                        product_id: r.product_id.clone(),
                        ship_mode_id,
                        segment_id,
                        location_id,
                        order_date: row.date,
                        cost_price: r.cost_price,
                        list_price: r.list_price,
                        quantity: r.quantity,
                        discount_percent: r.discount_percent,
                        discount: r.discount,
                        sale_price: r.sale_price,
                        profit: r.profit,
                    });
                }
                _ => {
                    let mut missing = Vec::new();
                    if ship_mode_id.is_none() {
                        missing.push(ForeignKey::ShipModeId);
                        unmapped
                            .entry(ForeignKey::ShipModeId)
                            .or_default()
                            .insert(r.ship_mode.clone());
                    }
                    if segment_id.is_none() {
                        missing.push(ForeignKey::SegmentId);
                        unmapped
                            .entry(ForeignKey::SegmentId)
                            .or_default()
                            .insert(r.segment.clone());
                    }
                    if location_id.is_none() {
                        missing.push(ForeignKey::LocationId);
                        unmapped
                            .entry(ForeignKey::LocationId)
                            .or_default()
                            .insert(location.to_string());
                    }
                    screened.reject(row.line, r.order_id, RejectReason::UnresolvedKeys(missing));
                }
            }
        }

        for (column, keys) in &unmapped {
            let listed: Vec<&str> = keys.iter().map(String::as_str).collect();
            warn!(
                column = column.column(),
                distinct = keys.len(),
                "Unmapped records: {}",
                listed.join("; ")
            );
        }
        info!(
            remaining = screened.accepted.len(),
            "Remaining records after mapping."
        );
        screened
    }
}
