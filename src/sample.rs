//! Built-in "Melbourne Eats" sample directory.
//!
//! Serves two purposes: it is the data set returned by the local fallback when
//! the content API is unreachable, and it seeds an empty store on first start.
//! Everything here is deterministic so fallback answers are stable.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::blog_post::BlogPost;
use crate::domain::business::{Business, BusinessHours, DayHours, SocialMedia};
use crate::domain::category::Category;
use crate::domain::custom_field::{
    CustomFieldDefinition, CustomFieldEntity, CustomFieldKind, CustomFieldValidation,
    CustomFieldValue, CustomFields,
};
use crate::domain::types::{
    Address, BlogPostId, BlogTitle, BusinessCount, BusinessId, BusinessName, CategoryIcon,
    CategoryId, CategoryName, Coordinates, CustomFieldId, CustomFieldKey, Email, ImagePath,
    PersonName, PhoneNumber, PriceRange, Rating, ReviewCount, Slug, TypeConstraintError, UserId,
    UserRole, ViewCount, WebsiteUrl,
};
use crate::domain::user::User;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    BlogPostWriter, BusinessReader, BusinessWriter, CategoryWriter, CustomFieldWriter, UserWriter,
};

pub const SITE_NAME: &str = "Melbourne Eats";
pub const BLOG_AUTHOR: &str = "Melbourne Eats Team";

/// id, name, icon, advisory count
const CATEGORIES: [(&str, &str, &str, i32); 6] = [
    ("fine-dining", "Fine Dining", "🍽️", 12),
    ("casual-dining", "Casual Dining", "🍕", 24),
    ("cafes", "Cafes", "☕", 18),
    ("fast-food", "Fast Food", "🍔", 15),
    ("asian-cuisine", "Asian Cuisine", "🥢", 20),
    ("bars-pubs", "Bars & Pubs", "🍺", 16),
];

struct SampleBusiness {
    id: &'static str,
    name: &'static str,
    category_id: &'static str,
    rating: f64,
    review_count: i32,
    address: &'static str,
    price_range: &'static str,
    image_url: &'static str,
    phone: &'static str,
    email: &'static str,
    website: &'static str,
    description: &'static str,
    coordinates: (f64, f64),
    featured: bool,
    verified: bool,
    premium: bool,
    cuisine: &'static str,
    meal_price: f64,
    booking_required: bool,
    dietary: &'static [&'static str],
}

const BUSINESSES: [SampleBusiness; 8] = [
    SampleBusiness {
        id: "1",
        name: "The Local Bistro",
        category_id: "fine-dining",
        rating: 4.8,
        review_count: 127,
        address: "123 Collins Street, Melbourne VIC 3000",
        price_range: "$$$",
        image_url: "/images/fine-dining-restaurant.png",
        phone: "+61 3 9123 4567",
        email: "info@localbistro.com.au",
        website: "https://localbistro.com.au",
        description: "An intimate fine dining experience featuring modern Australian cuisine with French influences.",
        coordinates: (-37.8150, 144.9700),
        featured: true,
        verified: true,
        premium: false,
        cuisine: "French",
        meal_price: 85.0,
        booking_required: true,
        dietary: &["Vegetarian", "Gluten-Free"],
    },
    SampleBusiness {
        id: "2",
        name: "Mario's Pizza Palace",
        category_id: "casual-dining",
        rating: 4.5,
        review_count: 89,
        address: "456 Brunswick Street, Fitzroy VIC 3065",
        price_range: "$$",
        image_url: "/images/pizza-restaurant.png",
        phone: "+61 3 9876 5432",
        email: "hello@mariospizza.com.au",
        website: "https://mariospizza.com.au",
        description: "Authentic wood-fired pizzas made with fresh, locally sourced ingredients.",
        coordinates: (-37.7990, 144.9780),
        featured: false,
        verified: false,
        premium: false,
        cuisine: "Italian",
        meal_price: 30.0,
        booking_required: false,
        dietary: &["Vegetarian"],
    },
    SampleBusiness {
        id: "3",
        name: "Brew & Bean Cafe",
        category_id: "cafes",
        rating: 4.6,
        review_count: 156,
        address: "789 Chapel Street, South Yarra VIC 3141",
        price_range: "$",
        image_url: "/images/cozy-cafe.png",
        phone: "+61 3 9555 0123",
        email: "info@brewandbean.com.au",
        website: "https://brewandbean.com.au",
        description: "Specialty coffee roasters serving artisanal brews and fresh pastries in a cozy atmosphere.",
        coordinates: (-37.8390, 144.9930),
        featured: false,
        verified: true,
        premium: false,
        cuisine: "American",
        meal_price: 18.0,
        booking_required: false,
        dietary: &["Vegan", "Dairy-Free"],
    },
    SampleBusiness {
        id: "4",
        name: "Dragon Palace",
        category_id: "asian-cuisine",
        rating: 4.7,
        review_count: 203,
        address: "321 Little Bourke Street, Melbourne VIC 3000",
        price_range: "$$",
        image_url: "/images/asian-restaurant.png",
        phone: "+61 3 9888 7777",
        email: "bookings@dragonpalace.com.au",
        website: "https://dragonpalace.com.au",
        description: "Traditional Cantonese cuisine with modern presentation in the heart of Chinatown.",
        coordinates: (-37.8118, 144.9668),
        featured: true,
        verified: true,
        premium: false,
        cuisine: "Chinese",
        meal_price: 45.0,
        booking_required: true,
        dietary: &["Vegetarian", "Halal"],
    },
    SampleBusiness {
        id: "5",
        name: "The Crafty Pint",
        category_id: "bars-pubs",
        rating: 4.4,
        review_count: 92,
        address: "654 Smith Street, Collingwood VIC 3066",
        price_range: "$$",
        image_url: "/images/pub-bar.png",
        phone: "+61 3 9777 8888",
        email: "info@craftypint.com.au",
        website: "https://craftypint.com.au",
        description: "Craft beer specialists with rotating taps and hearty pub meals.",
        coordinates: (-37.7995, 144.9840),
        featured: false,
        verified: false,
        premium: false,
        cuisine: "American",
        meal_price: 35.0,
        booking_required: false,
        dietary: &[],
    },
    SampleBusiness {
        id: "6",
        name: "Burger Junction",
        category_id: "fast-food",
        rating: 4.2,
        review_count: 78,
        address: "987 High Street, Prahran VIC 3181",
        price_range: "$",
        image_url: "/images/fine-dining-restaurant.png",
        phone: "+61 3 9444 3333",
        email: "orders@burgerjunction.com.au",
        website: "https://burgerjunction.com.au",
        description: "Gourmet burgers made with premium ingredients and house-made sauces.",
        coordinates: (-37.8490, 144.9930),
        featured: false,
        verified: false,
        premium: false,
        cuisine: "American",
        meal_price: 20.0,
        booking_required: false,
        dietary: &["Gluten-Free"],
    },
    SampleBusiness {
        id: "7",
        name: "Healthy Harvest Cafe",
        category_id: "cafes",
        rating: 4.5,
        review_count: 134,
        address: "246 Toorak Road, South Yarra VIC 3141",
        price_range: "$$",
        image_url: "/images/healthy-cafe.png",
        phone: "+61 3 9222 1111",
        email: "hello@healthyharvest.com.au",
        website: "https://healthyharvest.com.au",
        description: "Fresh, organic meals and cold-pressed juices for health-conscious diners.",
        coordinates: (-37.8400, 144.9920),
        featured: false,
        verified: true,
        premium: false,
        cuisine: "American",
        meal_price: 25.0,
        booking_required: false,
        dietary: &["Vegetarian", "Vegan", "Gluten-Free"],
    },
    SampleBusiness {
        id: "8",
        name: "Waterfront Grill",
        category_id: "fine-dining",
        rating: 4.9,
        review_count: 167,
        address: "1 Southbank Promenade, Southbank VIC 3006",
        price_range: "$$$$",
        image_url: "/images/waterfront-restaurant.png",
        phone: "+61 3 9111 2222",
        email: "reservations@waterfrontgrill.com.au",
        website: "https://waterfrontgrill.com.au",
        description: "Premium steakhouse with stunning river views and an extensive wine list.",
        coordinates: (-37.8210, 144.9640),
        featured: true,
        verified: true,
        premium: true,
        cuisine: "American",
        meal_price: 120.0,
        booking_required: true,
        dietary: &["Gluten-Free"],
    },
];

/// id, title, slug, excerpt, featured image, category, business id, business name, read time, views
const BLOG_POSTS: [(
    &str,
    &str,
    &str,
    &str,
    &str,
    &str,
    &str,
    &str,
    &str,
    i32,
); 6] = [
    (
        "1",
        "How The Local Bistro Survived COVID and Became Stronger",
        "local-bistro-covid-survival-story",
        "Behind the scenes with owner Sarah Martinez as she shares the incredible journey of adapting during the pandemic and emerging with a thriving business.",
        "/images/blog/local-bistro-story.png",
        "Success Stories",
        "1",
        "The Local Bistro",
        "3 min read",
        842,
    ),
    (
        "2",
        "Meet the Chef: Dragon Palace's Secret Family Recipes",
        "dragon-palace-family-recipes",
        "Chef Wong opens up about the traditional recipes passed down through four generations and how they've adapted them for Melbourne palates.",
        "/images/blog/dragon-palace-chef.png",
        "Chef Spotlight",
        "4",
        "Dragon Palace",
        "4 min read",
        615,
    ),
    (
        "3",
        "Farm to Table: Green Garden Cafe's Sustainability Story",
        "green-garden-farm-to-table",
        "Discover how this local cafe sources 90% of ingredients from within 50km and their impact on the local farming community.",
        "/images/blog/green-garden-sustainability.png",
        "Sustainability",
        "7",
        "Healthy Harvest Cafe",
        "5 min read",
        433,
    ),
    (
        "4",
        "The Art of Mixology: Behind the Bar at Rooftop Lounge",
        "rooftop-lounge-mixology-secrets",
        "Master mixologist James Chen reveals the secrets behind the city's most innovative cocktails and the inspiration for his signature drinks.",
        "/images/blog/rooftop-bar-mixology.png",
        "Behind the Scenes",
        "5",
        "The Crafty Pint",
        "4 min read",
        390,
    ),
    (
        "5",
        "Rising at Dawn: The Artisan Bakery's Daily Ritual",
        "artisan-bakery-daily-ritual",
        "Follow baker Maria Santos through her 4 AM routine as she crafts the perfect sourdough and pastries that keep customers coming back.",
        "/images/blog/artisan-bakery-craft.png",
        "Artisan Craft",
        "3",
        "Brew & Bean Cafe",
        "6 min read",
        276,
    ),
    (
        "6",
        "Mediterranean Traditions in Melbourne: A Family Legacy",
        "mediterranean-traditions-family-legacy",
        "Three generations of the Rossi family share how they've preserved authentic Mediterranean flavors while embracing Australian influences.",
        "/images/blog/mediterranean-traditions.png",
        "Cultural Heritage",
        "2",
        "Mario's Pizza Palace",
        "5 min read",
        158,
    ),
];

/// id, email, name, role
const USERS: [(&str, &str, &str, UserRole); 3] = [
    ("1", "admin@example.com", "Admin User", UserRole::Admin),
    ("2", "owner@example.com", "Business Owner", UserRole::BusinessOwner),
    ("3", "user@example.com", "Regular User", UserRole::User),
];

fn at(year: i32, month: u32, day: u32) -> Result<NaiveDateTime, TypeConstraintError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .ok_or_else(|| TypeConstraintError::InvalidValue(format!("date {year}-{month}-{day}")))
}

fn default_hours() -> BusinessHours {
    let day = |open: &str, close: &str| DayHours {
        open: open.to_string(),
        close: close.to_string(),
        closed: false,
    };
    BusinessHours::from([
        ("monday".to_string(), day("09:00", "22:00")),
        ("tuesday".to_string(), day("09:00", "22:00")),
        ("wednesday".to_string(), day("09:00", "22:00")),
        ("thursday".to_string(), day("09:00", "22:00")),
        ("friday".to_string(), day("09:00", "23:00")),
        ("saturday".to_string(), day("08:00", "23:00")),
        ("sunday".to_string(), day("08:00", "21:00")),
    ])
}

fn social_handle(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn blog_content(title: &str, excerpt: &str) -> String {
    format!(
        "# {title}\n\n{excerpt}\n\n## About the Business\n\nThe featured business in this story \
         represents the best of what our local community has to offer.\n\n## Visit Today\n\n\
         Support local, and discover the amazing businesses in your neighborhood."
    )
}

/// The complete sample data set.
#[derive(Debug, Clone)]
pub struct SampleDirectory {
    pub categories: Vec<Category>,
    pub businesses: Vec<Business>,
    pub blog_posts: Vec<BlogPost>,
    pub users: Vec<User>,
    pub custom_fields: Vec<CustomFieldDefinition>,
}

impl SampleDirectory {
    /// Builds the sample records.
    pub fn load() -> Result<Self, TypeConstraintError> {
        let categories = Self::categories()?;
        let businesses = Self::businesses(&categories)?;
        Ok(Self {
            blog_posts: Self::blog_posts()?,
            users: Self::users()?,
            custom_fields: Self::custom_fields()?,
            categories,
            businesses,
        })
    }

    fn categories() -> Result<Vec<Category>, TypeConstraintError> {
        let created = at(2024, 1, 1)?;
        CATEGORIES
            .iter()
            .zip(0..)
            .map(|(&(id, name, icon, count), sort_order)| {
                Ok(Category {
                    id: CategoryId::new(id)?,
                    name: CategoryName::new(name)?,
                    slug: Slug::from_text(name)?,
                    icon: CategoryIcon::new(icon)?,
                    description: Some(format!(
                        "Discover the best {} in your area",
                        name.to_lowercase()
                    )),
                    parent_id: None,
                    count: BusinessCount::new(count)?,
                    is_active: true,
                    sort_order,
                    created_at: created,
                    updated_at: created,
                })
            })
            .collect()
    }

    fn businesses(categories: &[Category]) -> Result<Vec<Business>, TypeConstraintError> {
        BUSINESSES
            .iter()
            .zip(1u32..)
            .map(|(sample, day)| {
                let category_id = CategoryId::new(sample.category_id)?;
                let category = categories
                    .iter()
                    .find(|c| c.id == category_id)
                    .map(|c| c.name.to_string())
                    .unwrap_or_else(|| crate::domain::business::UNCATEGORIZED.to_string());
                let handle = social_handle(sample.name);
                let added = at(2024, 1, day)?;

                let mut typed = BTreeMap::new();
                typed.insert(
                    "cuisineType".to_string(),
                    CustomFieldValue::Select(sample.cuisine.to_string()),
                );
                typed.insert(
                    "averageMealPrice".to_string(),
                    CustomFieldValue::Number(sample.meal_price),
                );
                typed.insert(
                    "bookingRequired".to_string(),
                    CustomFieldValue::Boolean(sample.booking_required),
                );
                typed.insert(
                    "dietaryOptions".to_string(),
                    CustomFieldValue::Multiselect(
                        sample.dietary.iter().map(|d| d.to_string()).collect(),
                    ),
                );

                let short_description: String = sample.description.chars().take(150).collect();
                let image = ImagePath::new(sample.image_url)?;

                Ok(Business {
                    id: BusinessId::new(sample.id)?,
                    name: BusinessName::new(sample.name)?,
                    slug: Slug::from_text(sample.name)?,
                    category_id,
                    category,
                    description: Some(sample.description.to_string()),
                    short_description: Some(short_description),
                    address: Address::new(sample.address)?,
                    coordinates: Some(Coordinates::new(sample.coordinates.0, sample.coordinates.1)?),
                    phone: Some(PhoneNumber::new(sample.phone)?),
                    email: Some(Email::new(sample.email)?),
                    website: Some(WebsiteUrl::new(sample.website)?),
                    price_range: PriceRange::try_from(sample.price_range)?,
                    rating: Rating::new(sample.rating)?,
                    review_count: ReviewCount::new(sample.review_count)?,
                    view_count: ViewCount::default(),
                    image_url: Some(image.clone()),
                    images: vec![image],
                    is_active: true,
                    is_pending: false,
                    is_featured: sample.featured,
                    is_verified: sample.verified,
                    is_premium: sample.premium,
                    business_hours: default_hours(),
                    social_media: SocialMedia {
                        facebook: Some(format!("https://facebook.com/{handle}")),
                        instagram: Some(format!("https://instagram.com/{handle}")),
                        ..Default::default()
                    },
                    custom_fields: CustomFields {
                        typed,
                        extra: BTreeMap::new(),
                    },
                    owner_id: Some(UserId::new("2")?),
                    claimed_by: None,
                    claimed_at: None,
                    date_added: added,
                    last_updated: added,
                })
            })
            .collect()
    }

    fn blog_posts() -> Result<Vec<BlogPost>, TypeConstraintError> {
        let tags: BTreeSet<String> = ["local business", "community", "featured story"]
            .into_iter()
            .map(str::to_string)
            .collect();

        BLOG_POSTS
            .iter()
            .enumerate()
            .map(
                |(
                    index,
                    &(
                        id,
                        title,
                        slug,
                        excerpt,
                        image,
                        category,
                        business_id,
                        business_name,
                        read_time,
                        views,
                    ),
                )| {
                    // Four days apart, newest first.
                    let published = at(2024, 6, 28 - 4 * index as u32)?;
                    Ok(BlogPost {
                        id: BlogPostId::new(id)?,
                        title: BlogTitle::new(title)?,
                        slug: Slug::new(slug)?,
                        excerpt: excerpt.to_string(),
                        content: blog_content(title, excerpt),
                        featured_image: Some(ImagePath::new(image)?),
                        images: Vec::new(),
                        author: PersonName::new(BLOG_AUTHOR)?,
                        author_id: Some(UserId::new("1")?),
                        category: category.to_string(),
                        tags: tags.clone(),
                        business_id: Some(BusinessId::new(business_id)?),
                        business_name: Some(business_name.to_string()),
                        read_time: read_time.to_string(),
                        is_published: true,
                        is_featured: index < 3,
                        view_count: ViewCount::new(views)?,
                        publish_date: published,
                        last_updated: published,
                    })
                },
            )
            .collect()
    }

    fn users() -> Result<Vec<User>, TypeConstraintError> {
        let joined = at(2024, 1, 1)?;
        USERS
            .iter()
            .map(|&(id, email, name, role)| {
                Ok(User {
                    id: UserId::new(id)?,
                    email: Email::new(email)?,
                    name: PersonName::new(name)?,
                    role,
                    is_active: true,
                    date_joined: joined,
                })
            })
            .collect()
    }

    fn custom_fields() -> Result<Vec<CustomFieldDefinition>, TypeConstraintError> {
        let options = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        let definition = |id: &str,
                          key: &str,
                          name: &str,
                          kind: CustomFieldKind,
                          options: Vec<String>,
                          validation: CustomFieldValidation,
                          display_order: i32,
                          is_searchable: bool|
         -> Result<CustomFieldDefinition, TypeConstraintError> {
            Ok(CustomFieldDefinition {
                id: CustomFieldId::new(id)?,
                key: CustomFieldKey::new(key)?,
                name: name.to_string(),
                kind,
                required: false,
                options,
                validation,
                display_order,
                is_searchable,
                is_filterable: true,
                entity_type: CustomFieldEntity::Business,
            })
        };

        Ok(vec![
            definition(
                "cuisine-type",
                "cuisineType",
                "Cuisine Type",
                CustomFieldKind::Select,
                options(&[
                    "Italian", "Chinese", "Japanese", "Mexican", "Indian", "Thai", "French",
                    "American",
                ]),
                CustomFieldValidation::default(),
                1,
                true,
            )?,
            definition(
                "average-meal-price",
                "averageMealPrice",
                "Average Meal Price",
                CustomFieldKind::Number,
                Vec::new(),
                CustomFieldValidation {
                    min: Some(5.0),
                    max: Some(200.0),
                    message: Some("Price must be between $5 and $200".to_string()),
                },
                2,
                false,
            )?,
            definition(
                "booking-required",
                "bookingRequired",
                "Booking Required",
                CustomFieldKind::Boolean,
                Vec::new(),
                CustomFieldValidation::default(),
                3,
                false,
            )?,
            definition(
                "dietary-options",
                "dietaryOptions",
                "Dietary Options",
                CustomFieldKind::Multiselect,
                options(&[
                    "Vegetarian",
                    "Vegan",
                    "Gluten-Free",
                    "Halal",
                    "Kosher",
                    "Dairy-Free",
                ]),
                CustomFieldValidation::default(),
                4,
                true,
            )?,
        ])
    }
}

/// Treats a uniqueness conflict as "already stored".
fn insert_missing(result: RepositoryResult<usize>) -> RepositoryResult<usize> {
    match result {
        Err(RepositoryError::Conflict(_)) => Ok(0),
        other => other,
    }
}

/// Loads the sample directory into a store without businesses.
///
/// Returns `false` without writing anything when the store already holds
/// businesses. Records left behind by an interrupted earlier seed are kept
/// and skipped.
pub fn seed_store<R>(repo: &R, sample: &SampleDirectory) -> RepositoryResult<bool>
where
    R: BusinessReader
        + BusinessWriter
        + CategoryWriter
        + UserWriter
        + CustomFieldWriter
        + BlogPostWriter,
{
    if repo.count_businesses()? > 0 {
        return Ok(false);
    }

    for user in &sample.users {
        insert_missing(repo.create_user(user))?;
    }
    for category in &sample.categories {
        insert_missing(repo.create_category(&category.clone().into()))?;
    }
    for definition in &sample.custom_fields {
        insert_missing(repo.create_custom_field(definition))?;
    }
    for business in &sample.businesses {
        insert_missing(repo.create_business(business))?;
    }
    for post in &sample.blog_posts {
        insert_missing(repo.create_blog_post(post))?;
    }

    log::info!(
        "Seeded {} businesses, {} categories and {} blog posts",
        sample.businesses.len(),
        sample.categories.len(),
        sample.blog_posts.len()
    );
    Ok(true)
}
