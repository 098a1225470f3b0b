use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::{AppointmentStatus, NewAppointment};

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

pub const INVALID_PHONE: &str = "Please enter a valid 10-digit phone number";

/// Fields posted by the public booking form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

impl BookingForm {
    /// Every problem with the form, in display order. Empty means the form can be submitted.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Full name is required.".to_string());
        }
        if !is_valid_phone(&self.phone) {
            errors.push(INVALID_PHONE.to_string());
        }
        if self.service.trim().is_empty() {
            errors.push("Please select a service.".to_string());
        }
        if self.date.trim().is_empty() {
            errors.push("Please pick a date.".to_string());
        }
        if self.time.trim().is_empty() {
            errors.push("Please pick a time.".to_string());
        }
        errors
    }

    pub fn to_appointment(&self) -> NewAppointment {
        NewAppointment {
            name: self.name.trim().to_string(),
            phone: self.phone.clone(),
            service: self.service.clone(),
            appointment_date: self.date.clone(),
            appointment_time: self.time.clone(),
            notes: self.notes.trim().to_string(),
            status: AppointmentStatus::Pending,
        }
    }

    /// The message prefilled in the salon's WhatsApp chat.
    pub fn summary(&self) -> String {
        let notes = self.notes.trim();
        let notes = if notes.is_empty() { "N/A" } else { notes };
        format!(
            "Hi GlowUp, I want to book an appointment.\nName: {}\nPhone: {}\nService: {}\nDate: {}\nTime: {}\nNotes: {}",
            self.name.trim(),
            self.phone,
            self.service,
            self.date,
            self.time,
            notes
        )
    }
}

pub fn whatsapp_link(salon_phone: &str, message: Option<&str>) -> String {
    match message {
        Some(text) => format!("https://wa.me/{salon_phone}?text={}", urlencoding::encode(text)),
        None => format!("https://wa.me/{salon_phone}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BookingForm {
        BookingForm {
            name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            service: "Hair Coloring".to_string(),
            date: "2026-10-20".to_string(),
            time: "15:30".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn phone_must_be_exactly_ten_digits() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone("98765 43210"));
        assert!(!is_valid_phone("+919876543210"));
        assert!(!is_valid_phone("98765abcde"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("٠١٢٣٤٥٦٧٨٩"));
        assert!(!is_valid_phone("９８７６５４３２１０"));
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(form().validate().is_empty());
    }

    #[test]
    fn bad_phone_is_reported() {
        let mut form = form();
        form.phone = "12345".to_string();
        assert_eq!(form.validate(), vec![INVALID_PHONE.to_string()]);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = BookingForm::default().validate();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn summary_uses_na_for_empty_notes() {
        let summary = form().summary();
        assert_eq!(
            summary,
            "Hi GlowUp, I want to book an appointment.\nName: Asha Rao\nPhone: 9876543210\nService: Hair Coloring\nDate: 2026-10-20\nTime: 15:30\nNotes: N/A"
        );
    }

    #[test]
    fn appointment_starts_pending() {
        let mut form = form();
        form.notes = "  window seat ".to_string();
        let appointment = form.to_appointment();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.appointment_time, "15:30");
        assert_eq!(appointment.notes, "window seat");
    }

    #[test]
    fn whatsapp_link_encodes_message() {
        let link = whatsapp_link("9167676133", Some("Hi GlowUp,\nName: A&B"));
        assert_eq!(link, "https://wa.me/9167676133?text=Hi%20GlowUp%2C%0AName%3A%20A%26B");
        assert_eq!(whatsapp_link("9167676133", None), "https://wa.me/9167676133");
    }
}
