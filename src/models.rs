use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const TABLE_APPOINTMENTS: &str = "appointments";
pub const TABLE_SERVICES: &str = "services";
pub const TABLE_OFFERS: &str = "offers";
pub const TABLE_GALLERY: &str = "gallery";
pub const TABLE_REVIEWS: &str = "reviews";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row written by the public booking form.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub name: String,
    pub phone: String,
    pub service: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub notes: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentRow {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub service: String,
    #[serde(deserialize_with = "lenient_string")]
    pub appointment_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub appointment_time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRow {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfferRow {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub discount_code: String,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryRow {
    #[serde(deserialize_with = "lenient_string")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewRow {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: i64,
}

/// Accepts strings, numbers and nulls for columns whose type varies between projects.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v.round() as i64))
            .unwrap_or_default(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|v| v.round() as i64)
            .unwrap_or_default(),
        _ => 0,
    })
}

pub struct FallbackService {
    pub name: &'static str,
    pub price: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const FALLBACK_SERVICES: [FallbackService; 4] = [
    FallbackService {
        name: "Haircut & Styling",
        price: "₹500+",
        icon: "Scissors",
        description: "Precision cuts tailored to your face shape and style.",
    },
    FallbackService {
        name: "Hair Coloring",
        price: "₹1500+",
        icon: "Sparkles",
        description: "Vibrant shades and professional techniques for a stunning look.",
    },
    FallbackService {
        name: "Facial & Skincare",
        price: "₹1200+",
        icon: "Heart",
        description: "Rejuvenating treatments for glowing, healthy skin.",
    },
    FallbackService {
        name: "Manicure & Pedicure",
        price: "₹800+",
        icon: "Award",
        description: "Pamper your hands and feet with our premium spa services.",
    },
];

pub const FALLBACK_GALLERY: [&str; 3] = [
    "https://images.unsplash.com/photo-1521590832167-7bcbfaa6381f?auto=format&fit=crop&q=80&w=800",
    "https://images.unsplash.com/photo-1562322140-8baeececf3df?auto=format&fit=crop&q=80&w=800",
    "https://images.unsplash.com/photo-1522335789203-aabd1fc54bc9?auto=format&fit=crop&q=80&w=800",
];

pub struct FallbackReview {
    pub name: &'static str,
    pub role: &'static str,
    pub text: &'static str,
    pub rating: i64,
}

pub const FALLBACK_REVIEWS: [FallbackReview; 3] = [
    FallbackReview {
        name: "Priya Sharma",
        role: "Regular Client",
        text: "The best salon in Thane! The staff is professional and the ambiance is truly luxury.",
        rating: 5,
    },
    FallbackReview {
        name: "Rahul Mehta",
        role: "Business Owner",
        text: "Excellent beard grooming and haircut. Highly recommend for men who want a sharp look.",
        rating: 5,
    },
    FallbackReview {
        name: "Anjali Gupta",
        role: "Fashion Blogger",
        text: "Their bridal makeup is out of this world. I felt like a queen on my wedding day!",
        rating: 5,
    },
];

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub static FAQS: [Faq; 4] = [
    Faq {
        question: "What are your opening hours?",
        answer: "We are open from 10:00 AM to 9:00 PM, Tuesday to Sunday. We are closed on Mondays.",
    },
    Faq {
        question: "Do I need to book in advance?",
        answer: "While we accept walk-ins, we highly recommend booking in advance to ensure your preferred slot.",
    },
    Faq {
        question: "Do you offer home services?",
        answer: "Currently, we only offer services at our studio in Thane to ensure the highest quality experience.",
    },
    Faq {
        question: "What products do you use?",
        answer: "We use only premium, professional-grade products from brands like L'Oréal, Schwarzkopf, and O3+.",
    },
];

/// Glyph for a service's icon reference; unknown references get scissors.
pub fn icon_glyph(icon: Option<&str>) -> &'static str {
    match icon.unwrap_or_default() {
        "Sparkles" => "✨",
        "Heart" => "♥",
        "Award" => "🏅",
        "Star" => "★",
        _ => "✂",
    }
}
