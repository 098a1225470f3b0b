use actix_web::{web, HttpResponse, Result};
use askama::Template;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[allow(unused_imports)]
use crate::filters;
use crate::{
    booking::{whatsapp_link, BookingForm},
    models::{
        icon_glyph, Faq, GalleryRow, OfferRow, ReviewRow, ServiceRow, FALLBACK_GALLERY,
        FALLBACK_REVIEWS, FALLBACK_SERVICES, FAQS, TABLE_APPOINTMENTS, TABLE_GALLERY,
        TABLE_OFFERS, TABLE_REVIEWS, TABLE_SERVICES,
    },
    state::AppState,
    store::{Query, Row, StoreError},
    templates::{render, render_with},
};

#[derive(Clone, Debug)]
pub struct ServiceCard {
    pub name: String,
    pub description: String,
    pub price: String,
    pub glyph: &'static str,
    pub selected: bool,
}

#[derive(Clone, Debug)]
pub struct OfferCard {
    pub title: String,
    pub description: String,
    pub discount_code: String,
    pub expiry_date: String,
    pub has_expiry: bool,
}

#[derive(Clone, Debug)]
pub struct ReviewCard {
    pub name: String,
    pub role: String,
    pub text: String,
    pub rating: i64,
}

/// Everything the marketing page shows, with fallbacks already applied.
#[derive(Clone, Debug)]
pub struct HomeContent {
    pub services: Vec<ServiceCard>,
    pub offers: Vec<OfferCard>,
    pub gallery: Vec<String>,
    pub reviews: Vec<ReviewCard>,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    content: HomeContent,
    faqs: &'static [Faq],
    form: BookingForm,
    errors: Vec<String>,
    salon_phone: String,
    salon_address: String,
    whatsapp_url: String,
}

#[derive(Template)]
#[template(path = "booking_confirmed.html")]
struct BookingConfirmedTemplate {
    name: String,
    whatsapp_url: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/book").route(web::post().to(create_booking)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse> {
    let content = load_home_content(&state).await;
    Ok(render(home_template(&state, content, BookingForm::default(), Vec::new())))
}

async fn create_booking(
    state: web::Data<AppState>,
    form: web::Form<BookingForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        let content = load_home_content(&state).await;
        return Ok(render_with(
            HttpResponse::UnprocessableEntity(),
            home_template(&state, content, form, errors),
        ));
    }

    let appointment = match serde_json::to_value(form.to_appointment()) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Could not encode appointment: {err}");
            return Ok(HttpResponse::InternalServerError().finish());
        }
    };

    if let Err(err) = state.store.insert(TABLE_APPOINTMENTS, appointment).await {
        log::error!("Booking insert failed: {err}");
        let content = load_home_content(&state).await;
        let message = err.to_string();
        return Ok(render_with(
            HttpResponse::InternalServerError(),
            home_template(&state, content, form, vec![message]),
        ));
    }

    log::info!("New appointment requested for {}", form.service);
    let whatsapp_url = whatsapp_link(&state.settings.salon.phone, Some(&form.summary()));
    Ok(render(BookingConfirmedTemplate {
        name: form.name.trim().to_string(),
        whatsapp_url,
    }))
}

fn home_template(
    state: &AppState,
    mut content: HomeContent,
    form: BookingForm,
    errors: Vec<String>,
) -> HomeTemplate {
    for service in &mut content.services {
        service.selected = service.name == form.service;
    }
    HomeTemplate {
        content,
        faqs: &FAQS,
        form,
        errors,
        salon_phone: state.settings.salon.phone.clone(),
        salon_address: state.settings.salon.address.clone(),
        whatsapp_url: whatsapp_link(&state.settings.salon.phone, None),
    }
}

async fn load_home_content(state: &AppState) -> HomeContent {
    let active = Query::new().eq("is_active", "true");
    let everything = Query::new();
    let (services, offers, gallery, reviews) = futures::join!(
        state.store.select(TABLE_SERVICES, &active),
        state.store.select(TABLE_OFFERS, &active),
        state.store.select(TABLE_GALLERY, &everything),
        state.store.select(TABLE_REVIEWS, &everything),
    );

    HomeContent::resolve(
        decode_rows(TABLE_SERVICES, services),
        decode_rows(TABLE_OFFERS, offers),
        decode_rows(TABLE_GALLERY, gallery),
        decode_rows(TABLE_REVIEWS, reviews),
    )
}

/// A failed read counts as empty so the page falls back instead of breaking.
fn decode_rows<T: DeserializeOwned>(table: &str, result: Result<Vec<Row>, StoreError>) -> Vec<T> {
    match result {
        Ok(rows) => rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(Value::Object(row)).ok())
            .collect(),
        Err(err) => {
            log::warn!("Falling back for {table}: {err}");
            Vec::new()
        }
    }
}

impl HomeContent {
    pub fn resolve(
        services: Vec<ServiceRow>,
        offers: Vec<OfferRow>,
        gallery: Vec<GalleryRow>,
        reviews: Vec<ReviewRow>,
    ) -> Self {
        let services = if services.is_empty() {
            FALLBACK_SERVICES
                .iter()
                .map(|service| ServiceCard {
                    name: service.name.to_string(),
                    description: service.description.to_string(),
                    price: service.price.to_string(),
                    glyph: icon_glyph(Some(service.icon)),
                    selected: false,
                })
                .collect()
        } else {
            services
                .into_iter()
                .map(|service| ServiceCard {
                    glyph: icon_glyph(service.icon.as_deref()),
                    name: service.name,
                    description: service.description,
                    price: service.price,
                    selected: false,
                })
                .collect()
        };

        let offers = offers
            .into_iter()
            .map(|offer| {
                let expiry_date = offer.expiry_date.unwrap_or_default();
                OfferCard {
                    title: offer.title,
                    description: offer.description,
                    discount_code: offer.discount_code,
                    has_expiry: !expiry_date.trim().is_empty(),
                    expiry_date,
                }
            })
            .collect();

        let gallery: Vec<String> = gallery
            .into_iter()
            .map(|image| image.image_url)
            .filter(|url| !url.trim().is_empty())
            .collect();
        let gallery = if gallery.is_empty() {
            FALLBACK_GALLERY.iter().map(|url| url.to_string()).collect()
        } else {
            gallery
        };

        let reviews = if reviews.is_empty() {
            FALLBACK_REVIEWS
                .iter()
                .map(|review| ReviewCard {
                    name: review.name.to_string(),
                    role: review.role.to_string(),
                    text: review.text.to_string(),
                    rating: review.rating,
                })
                .collect()
        } else {
            reviews
                .into_iter()
                .map(|review| ReviewCard {
                    name: review.name,
                    role: review.role,
                    text: review.text,
                    rating: review.rating,
                })
                .collect()
        };

        Self {
            services,
            offers,
            gallery,
            reviews,
        }
    }
}
