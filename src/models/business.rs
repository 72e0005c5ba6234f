use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::business::{Business as DomainBusiness, UNCATEGORIZED};
use crate::domain::types::{
    Address, BusinessId, BusinessName, CategoryId, Coordinates, Email, ImagePath, PhoneNumber,
    PriceRange, Rating, ReviewCount, Slug, TypeConstraintError, UserId, ViewCount, WebsiteUrl,
};
use crate::models::{from_json, to_json};

/// Diesel model representing the `businesses` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::businesses)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category_id: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: String,
    pub rating: f64,
    pub review_count: i32,
    pub view_count: i32,
    pub image_url: Option<String>,
    pub images: String,
    pub is_active: bool,
    pub is_pending: bool,
    pub is_featured: bool,
    pub is_verified: bool,
    pub is_premium: bool,
    pub business_hours: String,
    pub social_media: String,
    pub custom_fields: String,
    pub owner_id: Option<String>,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<NaiveDateTime>,
    pub date_added: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

/// Full row written on insert and on update.
///
/// `id` is skipped by the changeset, so updates never move a record.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::businesses)]
#[diesel(treat_none_as_null = true)]
pub struct NewBusiness {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category_id: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: String,
    pub rating: f64,
    pub review_count: i32,
    pub view_count: i32,
    pub image_url: Option<String>,
    pub images: String,
    pub is_active: bool,
    pub is_pending: bool,
    pub is_featured: bool,
    pub is_verified: bool,
    pub is_premium: bool,
    pub business_hours: String,
    pub social_media: String,
    pub custom_fields: String,
    pub owner_id: Option<String>,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<NaiveDateTime>,
    pub date_added: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

/// A business row together with the name of its category, if the category exists.
pub type BusinessWithCategory = (Business, Option<String>);

impl TryFrom<BusinessWithCategory> for DomainBusiness {
    type Error = TypeConstraintError;

    fn try_from((business, category): BusinessWithCategory) -> Result<Self, Self::Error> {
        let coordinates = match (business.latitude, business.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)?),
            _ => None,
        };

        Ok(Self {
            id: BusinessId::new(business.id)?,
            name: BusinessName::new(business.name)?,
            slug: Slug::new(business.slug)?,
            category_id: CategoryId::new(business.category_id)?,
            category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            description: business.description,
            short_description: business.short_description,
            address: Address::new(business.address)?,
            coordinates,
            phone: business.phone.map(PhoneNumber::new).transpose()?,
            email: business.email.map(Email::new).transpose()?,
            website: business.website.map(WebsiteUrl::new).transpose()?,
            price_range: PriceRange::try_from(business.price_range)?,
            rating: Rating::new(business.rating)?,
            review_count: ReviewCount::new(business.review_count)?,
            view_count: ViewCount::new(business.view_count)?,
            image_url: business.image_url.map(ImagePath::new).transpose()?,
            images: from_json("images", &business.images)?,
            is_active: business.is_active,
            is_pending: business.is_pending,
            is_featured: business.is_featured,
            is_verified: business.is_verified,
            is_premium: business.is_premium,
            business_hours: from_json("business_hours", &business.business_hours)?,
            social_media: from_json("social_media", &business.social_media)?,
            custom_fields: from_json("custom_fields", &business.custom_fields)?,
            owner_id: business.owner_id.map(UserId::new).transpose()?,
            claimed_by: business.claimed_by.map(UserId::new).transpose()?,
            claimed_at: business.claimed_at,
            date_added: business.date_added,
            last_updated: business.last_updated,
        })
    }
}

impl TryFrom<&DomainBusiness> for NewBusiness {
    type Error = serde_json::Error;

    fn try_from(business: &DomainBusiness) -> Result<Self, Self::Error> {
        Ok(Self {
            id: business.id.to_string(),
            name: business.name.to_string(),
            slug: business.slug.to_string(),
            category_id: business.category_id.to_string(),
            description: business.description.clone(),
            short_description: business.short_description.clone(),
            address: business.address.to_string(),
            latitude: business.coordinates.map(|c| c.lat),
            longitude: business.coordinates.map(|c| c.lng),
            phone: business.phone.as_ref().map(ToString::to_string),
            email: business.email.as_ref().map(ToString::to_string),
            website: business.website.as_ref().map(ToString::to_string),
            price_range: business.price_range.as_str().to_string(),
            rating: business.rating.get(),
            review_count: business.review_count.get(),
            view_count: business.view_count.get(),
            image_url: business.image_url.as_ref().map(ToString::to_string),
            images: to_json(&business.images)?,
            is_active: business.is_active,
            is_pending: business.is_pending,
            is_featured: business.is_featured,
            is_verified: business.is_verified,
            is_premium: business.is_premium,
            business_hours: to_json(&business.business_hours)?,
            social_media: to_json(&business.social_media)?,
            custom_fields: to_json(&business.custom_fields)?,
            owner_id: business.owner_id.as_ref().map(ToString::to_string),
            claimed_by: business.claimed_by.as_ref().map(ToString::to_string),
            claimed_at: business.claimed_at,
            date_added: business.date_added,
            last_updated: business.last_updated,
        })
    }
}
