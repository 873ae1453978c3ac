use crate::db::{Store, StoreError};
use crate::entities::{locations, prelude::*};
use crate::models::Location;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::info;

use super::parse_created_at;

fn map_location(m: locations::Model) -> Location {
    Location {
        id: m.id,
        search_query: m.search_query,
        formatted_query: m.formatted_query,
        latitude: m.latitude,
        longitude: m.longitude,
        created_at: parse_created_at(&m.created_at),
    }
}

impl Store {
    /// Look up a location row by the raw search text. Location rows have no
    /// TTL, so age is irrelevant here.
    pub async fn find_location(&self, search_query: &str) -> Result<Option<Location>, StoreError> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(search_query))
            .one(&self.conn)
            .await?;

        Ok(row.map(map_location))
    }

    pub async fn insert_location(
        &self,
        search_query: &str,
        formatted_query: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Location, StoreError> {
        let created_at = Utc::now();

        let active_model = locations::ActiveModel {
            search_query: Set(search_query.to_string()),
            formatted_query: Set(formatted_query.to_string()),
            latitude: Set(latitude),
            longitude: Set(longitude),
            created_at: Set(created_at.to_rfc3339()),
            ..Default::default()
        };

        let res = Locations::insert(active_model).exec(&self.conn).await?;
        info!("Cached location '{}' as id {}", search_query, res.last_insert_id);

        Ok(Location {
            id: res.last_insert_id,
            search_query: search_query.to_string(),
            formatted_query: formatted_query.to_string(),
            latitude,
            longitude,
            created_at,
        })
    }
}
