//! WordPress REST API source.
//!
//! Listings live in a `businesses` post type with their details in ACF fields.
//! ACF returns numbers as strings more often than not, so every numeric field
//! is read leniently.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::business::{
    Business, BusinessFilters, BusinessHours, DayHours, NewBusiness, SocialMedia,
    SubmittedBusiness, UNCATEGORIZED,
};
use crate::domain::category::Category;
use crate::domain::custom_field::CustomFields;
use crate::domain::query::SearchRequest;
use crate::domain::types::{
    Address, BusinessCount, BusinessId, BusinessName, BusinessStatus, CategoryIcon, CategoryId,
    CategoryName, Coordinates, Email, ImagePath, PhoneNumber, PriceRange, Rating, ReviewCount,
    Slug, TypeConstraintError, ViewCount, WebsiteUrl,
};
use crate::models::config::ContentApiConfig;
use crate::pagination::Page;
use crate::search;

use super::{FetchError, FetchResult, FetchStrategy};

/// WordPress caps `per_page` at 100.
const MAX_PER_PAGE: usize = 100;
/// Upper bound on pages walked by a search.
const MAX_SEARCH_PAGES: usize = 10;
const DEFAULT_ICON: &str = "🍽️";

#[derive(Debug, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

#[derive(Debug, Deserialize)]
struct WpCategory {
    id: u64,
    name: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WpAcf {
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    email: Option<String>,
    latitude: Option<Value>,
    longitude: Option<Value>,
    rating: Option<Value>,
    review_count: Option<Value>,
    hours: Option<Value>,
    photos: Option<Value>,
    featured: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WpBusiness {
    id: u64,
    title: Rendered,
    #[serde(default)]
    content: Option<Rendered>,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    categories: Vec<u64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    modified: Option<String>,
    // ACF answers `false` instead of an object when no fields are set.
    #[serde(default, deserialize_with = "acf_or_empty")]
    acf: WpAcf,
}

#[derive(Debug, Deserialize)]
struct WpCreated {
    id: u64,
}

fn acf_or_empty<'de, D>(deserializer: D) -> Result<WpAcf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(WpAcf::default()),
    }
}

/// Removes markup tags and decodes the handful of entities WordPress emits.
pub(crate) fn strip_html(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&amp;", "&")
        .replace("&#038;", "&")
        .replace("&#8217;", "'")
        .replace("&#039;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

/// Reads a number sent either as JSON number or as numeric string.
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn lenient_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "yes"),
        _ => false,
    }
}

fn parse_wp_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Turns `{"monday": "7:00 AM - 5:00 PM", "sunday": "Closed"}` into hours.
fn parse_hours(value: Option<&Value>) -> BusinessHours {
    let Some(Value::Object(days)) = value else {
        return BusinessHours::new();
    };
    days.iter()
        .filter_map(|(day, hours)| {
            let hours = hours.as_str()?.trim();
            let entry = if hours.eq_ignore_ascii_case("closed") {
                DayHours {
                    open: String::new(),
                    close: String::new(),
                    closed: true,
                }
            } else {
                let (open, close) = hours.split_once('-')?;
                DayHours {
                    open: open.trim().to_string(),
                    close: close.trim().to_string(),
                    closed: false,
                }
            };
            Some((day.to_lowercase(), entry))
        })
        .collect()
}

fn parse_photos(value: Option<&Value>) -> Vec<ImagePath> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) => ImagePath::new(url.as_str()).ok(),
                Value::Object(image) => image
                    .get("url")
                    .and_then(Value::as_str)
                    .and_then(|url| ImagePath::new(url).ok()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn optional<T>(
    raw: Option<String>,
    build: impl FnOnce(String) -> Result<T, TypeConstraintError>,
) -> Option<T> {
    raw.filter(|s| !s.trim().is_empty()).and_then(|s| build(s).ok())
}

impl WpCategory {
    fn into_category(self, now: NaiveDateTime) -> Result<Category, TypeConstraintError> {
        let name = strip_html(&self.name);
        let slug = Slug::new(self.slug.as_str()).or_else(|_| Slug::from_text(&name))?;
        let description = strip_html(&self.description);
        Ok(Category {
            id: CategoryId::new(self.id.to_string())?,
            name: CategoryName::new(name)?,
            slug,
            icon: CategoryIcon::new(DEFAULT_ICON)?,
            description: Some(description).filter(|d| !d.is_empty()),
            parent_id: None,
            count: BusinessCount::new(i32::try_from(self.count.max(0)).unwrap_or(i32::MAX))?,
            is_active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

impl WpBusiness {
    fn into_business(
        self,
        labels: &HashMap<CategoryId, String>,
        now: NaiveDateTime,
    ) -> Result<Business, TypeConstraintError> {
        let name = strip_html(&self.title.rendered);
        let category_id = CategoryId::new(
            self.categories
                .first()
                .map(u64::to_string)
                .unwrap_or_else(|| "1".to_string()),
        )?;
        let category = labels
            .get(&category_id)
            .cloned()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let description = self
            .content
            .map(|c| strip_html(&c.rendered))
            .filter(|d| !d.is_empty());
        let acf = self.acf;

        let coordinates = match (
            lenient_number(acf.latitude.as_ref()),
            lenient_number(acf.longitude.as_ref()),
        ) {
            (Some(lat), Some(lng)) if lat != 0.0 || lng != 0.0 => Coordinates::new(lat, lng).ok(),
            _ => None,
        };
        let rating = lenient_number(acf.rating.as_ref())
            .and_then(|r| Rating::new(r).ok())
            .unwrap_or_default();
        let review_count = lenient_number(acf.review_count.as_ref())
            .and_then(|c| ReviewCount::new(c as i32).ok())
            .unwrap_or_default();
        let images = parse_photos(acf.photos.as_ref());
        let date_added = parse_wp_date(self.date.as_deref()).unwrap_or(now);

        Ok(Business {
            id: BusinessId::new(self.id.to_string())?,
            slug: Slug::new(self.slug.as_str()).or_else(|_| Slug::from_text(&name))?,
            name: BusinessName::new(name)?,
            category_id,
            category,
            short_description: description
                .as_deref()
                .map(|d| d.chars().take(150).collect()),
            description,
            address: Address::new(acf.address.unwrap_or_default())?,
            coordinates,
            phone: optional(acf.phone, PhoneNumber::new),
            email: optional(acf.email, Email::new),
            website: optional(acf.website, WebsiteUrl::new),
            price_range: PriceRange::default(),
            rating,
            review_count,
            view_count: ViewCount::default(),
            image_url: images.first().cloned(),
            images,
            is_active: self.status == "publish",
            is_pending: matches!(self.status.as_str(), "draft" | "pending"),
            is_featured: lenient_bool(acf.featured.as_ref()),
            is_verified: false,
            is_premium: false,
            business_hours: parse_hours(acf.hours.as_ref()),
            social_media: SocialMedia::default(),
            custom_fields: CustomFields::default(),
            owner_id: None,
            claimed_by: None,
            claimed_at: None,
            date_added,
            last_updated: parse_wp_date(self.modified.as_deref()).unwrap_or(date_added),
        })
    }
}

/// Request body for a moderated listing submission.
/// WordPress term ids are integers; ids that are not stay as strings.
fn category_term(id: &CategoryId) -> Value {
    match id.as_str().parse::<u64>() {
        Ok(term) => json!(term),
        Err(_) => json!(id.as_str()),
    }
}

fn submission_body(business: &NewBusiness) -> Value {
    let hours: BTreeMap<&str, String> = business
        .business_hours
        .iter()
        .map(|(day, hours)| {
            let label = if hours.closed {
                "Closed".to_string()
            } else {
                format!("{} - {}", hours.open, hours.close)
            };
            (day.as_str(), label)
        })
        .collect();

    json!({
        "title": business.name.as_str(),
        "content": business.description.as_deref().unwrap_or_default(),
        "status": "draft",
        "categories": [category_term(&business.category_id)],
        "acf": {
            "address": business.address.as_str(),
            "phone": business.phone.as_ref().map(|p| p.as_str()),
            "website": business.website.as_ref().map(|w| w.as_str()),
            "email": business.email.as_ref().map(|e| e.as_str()),
            "latitude": business.coordinates.map(|c| c.lat),
            "longitude": business.coordinates.map(|c| c.lng),
            "hours": hours,
            "photos": &business.images,
        }
    })
}

/// Fetches content from a WordPress site.
#[derive(Debug, Clone)]
pub struct RemoteStrategy {
    client: reqwest::Client,
    base_url: String,
    read_timeout: Duration,
    write_timeout: Duration,
    default_limit: usize,
}

impl RemoteStrategy {
    pub fn from_config(config: &ContentApiConfig, default_limit: usize) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            default_limit,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FetchResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .timeout(self.read_timeout)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> FetchResult<T> {
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        if status == StatusCode::NO_CONTENT {
            return Err(FetchError::Empty);
        }

        let body = resp.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::Empty);
        }
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Category id to display name, used to label fetched businesses.
    async fn category_labels(&self) -> FetchResult<HashMap<CategoryId, String>> {
        Ok(self
            .get_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name.into_inner()))
            .collect())
    }

    /// Walks result pages of `per_page` posts until a short page, at most
    /// `max_pages` of them.
    async fn fetch_posts(
        &self,
        query: &[(&str, String)],
        per_page: usize,
        max_pages: usize,
    ) -> FetchResult<Vec<WpBusiness>> {
        let mut posts = Vec::new();
        for page in 1..=max_pages {
            let mut paged = query.to_vec();
            paged.push(("per_page", per_page.to_string()));
            paged.push(("page", page.to_string()));

            let batch: Vec<WpBusiness> = match self.get("/wp/v2/businesses", &paged).await {
                Ok(batch) => batch,
                // WordPress answers 400 for a page past the last one.
                Err(FetchError::Status(400)) if page > 1 => break,
                Err(e) => return Err(e),
            };
            let short = batch.len() < per_page;
            posts.extend(batch);
            if short {
                break;
            }
        }
        Ok(posts)
    }

    async fn fetch_businesses(
        &self,
        query: &[(&str, String)],
        per_page: usize,
        max_pages: usize,
    ) -> FetchResult<Vec<Business>> {
        let labels = self.category_labels().await?;
        let posts = self.fetch_posts(query, per_page, max_pages).await?;
        if posts.is_empty() {
            return Err(FetchError::Empty);
        }

        let now = Utc::now().naive_utc();
        let received = posts.len();
        let businesses: Vec<Business> = posts
            .into_iter()
            .filter_map(|post| {
                let id = post.id;
                match post.into_business(&labels, now) {
                    Ok(business) => Some(business),
                    Err(e) => {
                        log::warn!("Skipping remote business {id}: {e}");
                        None
                    }
                }
            })
            .collect();

        if businesses.is_empty() {
            return Err(FetchError::Decode(format!(
                "none of {received} businesses could be read"
            )));
        }
        Ok(businesses)
    }
}

#[async_trait]
impl FetchStrategy for RemoteStrategy {
    fn name(&self) -> &'static str {
        "content API"
    }

    async fn get_categories(&self) -> FetchResult<Vec<Category>> {
        let raw: Vec<WpCategory> = self
            .get("/wp/v2/categories", &[("per_page", MAX_PER_PAGE.to_string())])
            .await?;
        if raw.is_empty() {
            return Err(FetchError::Empty);
        }

        let now = Utc::now().naive_utc();
        raw.into_iter()
            .zip(0..)
            .map(|(category, sort_order)| {
                category
                    .into_category(now)
                    .map(|c| Category { sort_order, ..c })
                    .map_err(|e| FetchError::Decode(e.to_string()))
            })
            .collect()
    }

    async fn get_businesses(&self, filters: &BusinessFilters) -> FetchResult<Vec<Business>> {
        let mut query = Vec::new();
        if let Some(category) = &filters.category {
            query.push(("categories", category.to_string()));
        }
        match filters.status {
            Some(BusinessStatus::Active) => query.push(("status", "publish".to_string())),
            Some(BusinessStatus::Pending) => query.push(("status", "draft,pending".to_string())),
            _ => {}
        }
        let per_page = filters.limit.unwrap_or(MAX_PER_PAGE).clamp(1, MAX_PER_PAGE);

        let businesses = self.fetch_businesses(&query, per_page, 1).await?;
        Ok(businesses
            .into_iter()
            .filter(|b| filters.matches(b))
            .collect())
    }

    /// Text matching is left to the local engine: the remote `search`
    /// parameter ignores ACF fields such as the address.
    async fn search_businesses(&self, request: &SearchRequest) -> FetchResult<Page<Business>> {
        let mut query = vec![("status", "publish".to_string())];
        if !request.category_ids.is_empty() {
            let ids: Vec<&str> = request.category_ids.iter().map(|c| c.as_str()).collect();
            query.push(("categories", ids.join(",")));
        }

        let businesses = self
            .fetch_businesses(&query, MAX_PER_PAGE, MAX_SEARCH_PAGES)
            .await?;
        Ok(search::search_businesses(
            &businesses,
            request,
            self.default_limit,
        ))
    }

    async fn submit_business(&self, business: &NewBusiness) -> FetchResult<SubmittedBusiness> {
        let url = format!("{}/wp/v2/businesses", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&submission_body(business))
            .timeout(self.write_timeout)
            .send()
            .await?;
        let created: WpCreated = Self::handle_response(resp).await?;

        let id = BusinessId::new(created.id.to_string())
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(SubmittedBusiness {
            id,
            submission: business.clone(),
            status: BusinessStatus::Pending,
        })
    }
}
