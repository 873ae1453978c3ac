//! `ResourceStore` implementations, one per cached resource table.
//!
//! The cache protocol in `services::cache` is generic over the record type;
//! these impls supply the per-kind field mapping between normalized records
//! and their sea-orm entities. `insert_all` persists each record's own
//! `created_at` so a whole fetched batch shares one freshness window.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::{Store, StoreError};
use crate::entities::{meetups, movies, prelude::*, reviews, trails, weather_forecasts};
use crate::models::{Forecast, Meetup, Movie, Review, Trail};
use crate::services::cache::ResourceStore;

use super::parse_created_at;

#[async_trait]
impl ResourceStore<Forecast> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Forecast>, StoreError> {
        let rows = WeatherForecasts::find()
            .filter(weather_forecasts::Column::LocationId.eq(location_id))
            .order_by_asc(weather_forecasts::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Forecast {
                forecast: m.forecast,
                time: m.time,
                created_at: parse_created_at(&m.created_at),
            })
            .collect())
    }

    async fn insert_all(&self, location_id: i32, records: &[Forecast]) -> Result<(), StoreError> {
        for r in records {
            let active_model = weather_forecasts::ActiveModel {
                forecast: Set(r.forecast.clone()),
                time: Set(r.time.clone()),
                created_at: Set(r.created_at.to_rfc3339()),
                location_id: Set(location_id),
                ..Default::default()
            };
            WeatherForecasts::insert(active_model).exec(&self.conn).await?;
        }
        Ok(())
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<(), StoreError> {
        WeatherForecasts::delete_many()
            .filter(weather_forecasts::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Meetup> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Meetup>, StoreError> {
        let rows = Meetups::find()
            .filter(meetups::Column::LocationId.eq(location_id))
            .order_by_asc(meetups::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Meetup {
                link: m.link,
                name: m.name,
                creation_date: m.creation_date,
                host: m.host,
                created_at: parse_created_at(&m.created_at),
            })
            .collect())
    }

    async fn insert_all(&self, location_id: i32, records: &[Meetup]) -> Result<(), StoreError> {
        for r in records {
            let active_model = meetups::ActiveModel {
                link: Set(r.link.clone()),
                name: Set(r.name.clone()),
                creation_date: Set(r.creation_date.clone()),
                host: Set(r.host.clone()),
                created_at: Set(r.created_at.to_rfc3339()),
                location_id: Set(location_id),
                ..Default::default()
            };
            Meetups::insert(active_model).exec(&self.conn).await?;
        }
        Ok(())
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<(), StoreError> {
        Meetups::delete_many()
            .filter(meetups::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Movie> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Movie>, StoreError> {
        let rows = Movies::find()
            .filter(movies::Column::LocationId.eq(location_id))
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Movie {
                title: m.title,
                overview: m.overview,
                average_votes: m.average_votes,
                image_url: m.image_url,
                popularity: m.popularity,
                released_on: m.released_on,
                created_at: parse_created_at(&m.created_at),
            })
            .collect())
    }

    async fn insert_all(&self, location_id: i32, records: &[Movie]) -> Result<(), StoreError> {
        for r in records {
            let active_model = movies::ActiveModel {
                title: Set(r.title.clone()),
                overview: Set(r.overview.clone()),
                average_votes: Set(r.average_votes),
                image_url: Set(r.image_url.clone()),
                popularity: Set(r.popularity),
                released_on: Set(r.released_on.clone()),
                created_at: Set(r.created_at.to_rfc3339()),
                location_id: Set(location_id),
                ..Default::default()
            };
            Movies::insert(active_model).exec(&self.conn).await?;
        }
        Ok(())
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<(), StoreError> {
        Movies::delete_many()
            .filter(movies::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Review> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Review>, StoreError> {
        let rows = Reviews::find()
            .filter(reviews::Column::LocationId.eq(location_id))
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Review {
                name: m.name,
                image_url: m.image_url,
                price: m.price,
                rating: m.rating,
                url: m.url,
                created_at: parse_created_at(&m.created_at),
            })
            .collect())
    }

    async fn insert_all(&self, location_id: i32, records: &[Review]) -> Result<(), StoreError> {
        for r in records {
            let active_model = reviews::ActiveModel {
                name: Set(r.name.clone()),
                image_url: Set(r.image_url.clone()),
                price: Set(r.price.clone()),
                rating: Set(r.rating),
                url: Set(r.url.clone()),
                created_at: Set(r.created_at.to_rfc3339()),
                location_id: Set(location_id),
                ..Default::default()
            };
            Reviews::insert(active_model).exec(&self.conn).await?;
        }
        Ok(())
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<(), StoreError> {
        Reviews::delete_many()
            .filter(reviews::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Trail> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Trail>, StoreError> {
        let rows = Trails::find()
            .filter(trails::Column::LocationId.eq(location_id))
            .order_by_asc(trails::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|m| Trail {
                name: m.name,
                location: m.location,
                length: m.length,
                stars: m.stars,
                star_votes: m.star_votes,
                summary: m.summary,
                trail_url: m.trail_url,
                condition: m.condition,
                condition_date: m.condition_date,
                condition_time: m.condition_time,
                created_at: parse_created_at(&m.created_at),
            })
            .collect())
    }

    async fn insert_all(&self, location_id: i32, records: &[Trail]) -> Result<(), StoreError> {
        for r in records {
            let active_model = trails::ActiveModel {
                name: Set(r.name.clone()),
                location: Set(r.location.clone()),
                length: Set(r.length),
                stars: Set(r.stars),
                star_votes: Set(r.star_votes),
                summary: Set(r.summary.clone()),
                trail_url: Set(r.trail_url.clone()),
                condition: Set(r.condition.clone()),
                condition_date: Set(r.condition_date.clone()),
                condition_time: Set(r.condition_time.clone()),
                created_at: Set(r.created_at.to_rfc3339()),
                location_id: Set(location_id),
                ..Default::default()
            };
            Trails::insert(active_model).exec(&self.conn).await?;
        }
        Ok(())
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<(), StoreError> {
        Trails::delete_many()
            .filter(trails::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}
