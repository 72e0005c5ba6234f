use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::business::{BusinessHours, BusinessPatch, NewBusiness, SocialMedia};
use crate::domain::query::{SearchRequest, SortBy};
use crate::domain::types::{
    Address, BusinessName, CategoryId, Coordinates, Email, ImagePath, PhoneNumber, PriceRange,
    TypeConstraintError, UserId, WebsiteUrl,
};
use crate::forms::non_blank;

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct CoordinatesForm {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl TryFrom<CoordinatesForm> for Coordinates {
    type Error = TypeConstraintError;

    fn try_from(value: CoordinatesForm) -> Result<Self, Self::Error> {
        Coordinates::new(value.lat, value.lng)
    }
}

fn parse_images(images: Vec<String>) -> Result<Vec<ImagePath>, TypeConstraintError> {
    images
        .into_iter()
        .filter(|i| !i.trim().is_empty())
        .map(ImagePath::new)
        .collect()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub category_id: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub description: Option<String>,
    #[validate(length(max = 300))]
    pub short_description: Option<String>,
    #[validate(nested)]
    pub coordinates: Option<CoordinatesForm>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub business_hours: BusinessHours,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, Value>,
    pub owner_id: Option<String>,
}

/// A validated business submission.
///
/// Custom fields stay loose until the service checks them against the stored
/// definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBusinessPayload {
    pub business: NewBusiness,
    pub custom_fields: BTreeMap<String, Value>,
}

#[derive(Debug, Error)]
pub enum CreateBusinessFormError {
    #[error("Business form validation failed: {0}")]
    Validation(String),
    #[error("Business form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateBusinessFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateBusinessFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateBusinessForm> for CreateBusinessPayload {
    type Error = CreateBusinessFormError;

    fn try_from(value: CreateBusinessForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let mut business = NewBusiness::new(
            BusinessName::new(value.name)?,
            CategoryId::new(value.category_id)?,
            Address::new(value.address)?,
        );
        business.description = non_blank(value.description);
        business.short_description = non_blank(value.short_description);
        business.coordinates = value.coordinates.map(Coordinates::try_from).transpose()?;
        business.phone = non_blank(value.phone).map(PhoneNumber::new).transpose()?;
        business.email = non_blank(value.email).map(Email::new).transpose()?;
        business.website = non_blank(value.website).map(WebsiteUrl::new).transpose()?;
        business.price_range = match non_blank(value.price_range) {
            Some(price_range) => PriceRange::try_from(price_range)?,
            None => PriceRange::default(),
        };
        business.image_url = non_blank(value.image_url).map(ImagePath::new).transpose()?;
        business.images = parse_images(value.images)?;
        business.business_hours = value.business_hours;
        business.social_media = value.social_media;
        business.owner_id = non_blank(value.owner_id).map(UserId::new).transpose()?;

        Ok(Self {
            business,
            custom_fields: value.custom_fields,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessForm {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub category_id: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 300))]
    pub short_description: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(nested)]
    pub coordinates: Option<CoordinatesForm>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: Option<String>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_premium: Option<bool>,
    pub business_hours: Option<BusinessHours>,
    pub social_media: Option<SocialMedia>,
    pub custom_fields: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBusinessPayload {
    pub patch: BusinessPatch,
    pub custom_fields: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Error)]
pub enum UpdateBusinessFormError {
    #[error("Business update validation failed: {0}")]
    Validation(String),
    #[error("Business update contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateBusinessFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateBusinessFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateBusinessForm> for UpdateBusinessPayload {
    type Error = UpdateBusinessFormError;

    fn try_from(value: UpdateBusinessForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let patch = BusinessPatch {
            name: value.name.map(BusinessName::new).transpose()?,
            category_id: value.category_id.map(CategoryId::new).transpose()?,
            description: value.description,
            short_description: value.short_description,
            address: value.address.map(Address::new).transpose()?,
            coordinates: value.coordinates.map(Coordinates::try_from).transpose()?,
            phone: non_blank(value.phone).map(PhoneNumber::new).transpose()?,
            email: non_blank(value.email).map(Email::new).transpose()?,
            website: non_blank(value.website).map(WebsiteUrl::new).transpose()?,
            price_range: non_blank(value.price_range)
                .map(PriceRange::try_from)
                .transpose()?,
            image_url: non_blank(value.image_url).map(ImagePath::new).transpose()?,
            images: value.images.map(parse_images).transpose()?,
            is_active: value.is_active,
            is_featured: value.is_featured,
            is_verified: value.is_verified,
            is_premium: value.is_premium,
            business_hours: value.business_hours,
            social_media: value.social_media,
            custom_fields: None,
        };

        Ok(Self {
            patch,
            custom_fields: value.custom_fields,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBusinessForm {
    #[validate(length(min = 1))]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimBusinessPayload {
    pub user_id: UserId,
}

#[derive(Debug, Error)]
pub enum ClaimBusinessFormError {
    #[error("Claim form validation failed: {0}")]
    Validation(String),
    #[error("Claim form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ClaimBusinessFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ClaimBusinessFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ClaimBusinessForm> for ClaimBusinessPayload {
    type Error = ClaimBusinessFormError;

    fn try_from(value: ClaimBusinessForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            user_id: UserId::new(value.user_id)?,
        })
    }
}

/// Query string accepted by the business search endpoint.
///
/// List parameters are comma separated: `categoryIds=cafes,bars`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchBusinessesQuery {
    pub query: Option<String>,
    pub category_ids: Option<String>,
    pub price_ranges: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub featured: Option<bool>,
    pub verified: Option<bool>,
    #[validate(range(min = 0.0))]
    pub radius: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Error)]
pub enum SearchBusinessesQueryError {
    #[error("Search parameters are invalid: {0}")]
    Validation(String),
    #[error("Search parameters contain invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SearchBusinessesQueryError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SearchBusinessesQueryError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn split_list(value: Option<String>) -> impl Iterator<Item = String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}

impl TryFrom<SearchBusinessesQuery> for SearchRequest {
    type Error = SearchBusinessesQueryError;

    fn try_from(value: SearchBusinessesQuery) -> Result<Self, Self::Error> {
        value.validate()?;

        let near = match (value.lat, value.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)?),
            (None, None) => None,
            _ => {
                return Err(SearchBusinessesQueryError::Validation(
                    "lat and lng must be given together".to_string(),
                ));
            }
        };

        Ok(SearchRequest {
            query: non_blank(value.query),
            category_ids: split_list(value.category_ids)
                .map(CategoryId::new)
                .collect::<Result<BTreeSet<_>, _>>()?,
            price_ranges: split_list(value.price_ranges)
                .map(PriceRange::try_from)
                .collect::<Result<BTreeSet<_>, _>>()?,
            rating: value.rating,
            featured: value.featured,
            verified: value.verified,
            radius: value.radius,
            near,
            sort_by: non_blank(value.sort_by)
                .map(|s| SortBy::try_from(s.as_str()))
                .transpose()?,
            page: value.page,
            limit: value.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form() -> CreateBusinessForm {
        serde_json::from_value(serde_json::json!({
            "name": "Corner Cafe",
            "categoryId": "cafes",
            "address": "1 Flinders Lane, Melbourne VIC 3000",
            "email": "",
            "website": "https://corner.example.com",
            "priceRange": "$$",
            "customFields": { "cuisineType": "Cafe" }
        }))
        .unwrap()
    }

    #[test]
    fn create_form_builds_new_business() {
        let payload: CreateBusinessPayload = create_form().try_into().unwrap();
        assert_eq!(payload.business.name.as_str(), "Corner Cafe");
        assert_eq!(payload.business.price_range, PriceRange::Moderate);
        assert!(payload.business.email.is_none());
        assert_eq!(payload.custom_fields.len(), 1);
    }

    #[test]
    fn create_form_requires_name() {
        let mut form = create_form();
        form.name = String::new();
        let result: Result<CreateBusinessPayload, _> = form.try_into();
        assert!(matches!(result, Err(CreateBusinessFormError::Validation(_))));
    }

    #[test]
    fn create_form_rejects_bad_email() {
        let mut form = create_form();
        form.email = Some("not-an-email".into());
        let result: Result<CreateBusinessPayload, _> = form.try_into();
        assert!(matches!(
            result,
            Err(CreateBusinessFormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn create_form_rejects_out_of_range_coordinates() {
        let mut form = create_form();
        form.coordinates = Some(CoordinatesForm {
            lat: 120.0,
            lng: 0.0,
        });
        let result: Result<CreateBusinessPayload, _> = form.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn update_form_leaves_missing_fields_unset() {
        let form = UpdateBusinessForm {
            is_featured: Some(true),
            ..Default::default()
        };
        let payload: UpdateBusinessPayload = form.try_into().unwrap();
        assert_eq!(payload.patch.is_featured, Some(true));
        assert!(payload.patch.name.is_none());
        assert!(payload.custom_fields.is_none());
    }

    #[test]
    fn search_query_parses_lists_and_sort() {
        let query = SearchBusinessesQuery {
            category_ids: Some("cafes, bars".into()),
            price_ranges: Some("$,$$".into()),
            sort_by: Some("rating".into()),
            lat: Some(-37.8136),
            lng: Some(144.9631),
            radius: Some(1.0),
            ..Default::default()
        };
        let request: SearchRequest = query.try_into().unwrap();
        assert_eq!(request.category_ids.len(), 2);
        assert_eq!(request.price_ranges.len(), 2);
        assert_eq!(request.sort_by, Some(SortBy::Rating));
        assert!(request.near.is_some());
    }

    #[test]
    fn search_query_rejects_unknown_sort() {
        let query = SearchBusinessesQuery {
            sort_by: Some("popularity".into()),
            ..Default::default()
        };
        let result: Result<SearchRequest, _> = query.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn search_query_requires_both_coordinates() {
        let query = SearchBusinessesQuery {
            lat: Some(-37.8),
            ..Default::default()
        };
        let result: Result<SearchRequest, _> = query.try_into();
        assert!(result.is_err());
    }
}
